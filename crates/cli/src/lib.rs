pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "clerk",
    about = "Clerk shopping-assistant CLI",
    long_about = "Chat with the catalog assistant, run offline catalog lookups, and inspect configuration and readiness.",
    after_help = "Examples:\n  clerk chat\n  clerk search \"wireless earbuds\"\n  clerk show 1001\n  clerk doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Path to a clerk.toml config file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start the interactive shopping-assistant chat loop")]
    Chat,
    #[command(about = "Search the catalog offline (no model calls)")]
    Search { query: String },
    #[command(about = "Show one product record by id")]
    Show { product_id: String },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog readability, and model credential presence")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat => return commands::chat::run(cli.config),
        Command::Search { query } => commands::search::run(cli.config, &query),
        Command::Show { product_id } => commands::show::run(cli.config, &product_id),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(cli.config) }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(cli.config, json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
