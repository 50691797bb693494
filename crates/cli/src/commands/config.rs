use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use toml::Value;

use super::load_config;

pub fn run(config_path: Option<PathBuf>) -> String {
    let config = match load_config(config_path.clone()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let doc = config_file_doc.as_ref();
    let file = config_file_path.as_deref();

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "llm.model",
        &config.llm.model,
        field_source("llm.model", &["CLERK_LLM_MODEL"], doc, file),
    ));
    lines.push(render_line(
        "llm.base_url",
        &config.llm.base_url,
        field_source("llm.base_url", &["CLERK_LLM_BASE_URL"], doc, file),
    ));

    let api_key = config
        .llm
        .api_key
        .as_ref()
        .map(|key| redact_secret(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(render_line(
        "llm.api_key",
        &api_key,
        field_source("llm.api_key", &["CLERK_LLM_API_KEY", "DEEPSEEK_API_KEY"], doc, file),
    ));

    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        field_source("llm.timeout_secs", &["CLERK_LLM_TIMEOUT_SECS"], doc, file),
    ));
    lines.push(render_line(
        "llm.scoring",
        &format!("{:?}", config.llm.scoring),
        field_source("llm.scoring", &["CLERK_LLM_SCORING"], doc, file),
    ));
    lines.push(render_line(
        "llm.score_threshold",
        &config.llm.score_threshold.to_string(),
        field_source("llm.score_threshold", &["CLERK_LLM_SCORE_THRESHOLD"], doc, file),
    ));
    lines.push(render_line(
        "llm.max_candidates",
        &config.llm.max_candidates.to_string(),
        field_source("llm.max_candidates", &["CLERK_LLM_MAX_CANDIDATES"], doc, file),
    ));

    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<builtin>".to_string());
    lines.push(render_line(
        "catalog.path",
        &catalog_path,
        field_source("catalog.path", &["CLERK_CATALOG_PATH"], doc, file),
    ));

    lines.push(render_line(
        "chat.exit_keywords",
        &config.chat.exit_keywords.join(","),
        field_source("chat.exit_keywords", &["CLERK_CHAT_EXIT_KEYWORDS"], doc, file),
    ));
    lines.push(render_line(
        "chat.history_limit",
        &config.chat.history_limit.to_string(),
        field_source("chat.history_limit", &["CLERK_CHAT_HISTORY_LIMIT"], doc, file),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source("logging.level", &["CLERK_LOGGING_LEVEL", "CLERK_LOG_LEVEL"], doc, file),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        field_source("logging.format", &["CLERK_LOGGING_FORMAT", "CLERK_LOG_FORMAT"], doc, file),
    ));

    lines.join("\n")
}

fn detect_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then_some(path);
    }

    let root = PathBuf::from("clerk.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/clerk.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    for env_key in env_keys {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_secret(secret: &str) -> String {
    let trimmed = secret.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
