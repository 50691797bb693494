use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clerk_agent::provider::OpenAiCompatClient;
use clerk_agent::runtime::AgentRuntime;
use clerk_agent::scoring::LlmRelevanceScorer;
use clerk_agent::tools::{ProductDetailsTool, SearchProductsTool, ToolRegistry};
use clerk_core::config::{AppConfig, ScoringMode};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::{build_store, load_config};

fn init_logging(config: &AppConfig) {
    use clerk_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn run(config_path: Option<PathBuf>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("config validation failed: {error}");
            return ExitCode::from(2);
        }
    };
    init_logging(&config);

    if let Err(error) = config.require_api_key() {
        eprintln!("{error}");
        return ExitCode::from(2);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("failed to start async runtime: {error}");
            return ExitCode::from(1);
        }
    };

    match runtime.block_on(chat_loop(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("chat session failed: {error:#}");
            ExitCode::from(1)
        }
    }
}

async fn chat_loop(config: AppConfig) -> anyhow::Result<()> {
    let store = Arc::new(build_store(&config.catalog)?);
    let client: Arc<dyn clerk_agent::llm::LlmClient> =
        Arc::new(OpenAiCompatClient::from_config(&config.llm)?);

    let mut tools = ToolRegistry::default();
    match config.llm.scoring {
        ScoringMode::Off => tools.register(SearchProductsTool::substring(store.clone())),
        ScoringMode::Model => tools.register(SearchProductsTool::scored(
            store.clone(),
            Arc::new(LlmRelevanceScorer::new(client.clone())),
            config.llm.score_threshold,
            config.llm.max_candidates,
        )),
    }
    tools.register(ProductDetailsTool::new(store.clone()));

    let mut agent = AgentRuntime::new(client, tools, config.chat.history_limit);

    tracing::info!(
        model = %config.llm.model,
        scoring = ?config.llm.scoring,
        products = store.len(),
        "chat session started"
    );

    println!("Welcome to Clerk. Ask about products, or type `exit` to leave.");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(b"\nyou> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            // EOF: stdin closed, end the session cleanly.
            println!();
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if config.chat.exit_keywords.iter().any(|keyword| keyword.eq_ignore_ascii_case(input)) {
            println!("\nassistant> Goodbye! Happy shopping.");
            break;
        }

        let outcome = agent.handle_turn(input).await;
        println!("\nassistant> {}", outcome.reply);
    }

    Ok(())
}
