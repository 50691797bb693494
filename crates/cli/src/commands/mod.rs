pub mod chat;
pub mod config;
pub mod doctor;
pub mod search;
pub mod show;

use std::path::PathBuf;

use clerk_core::catalog::{CatalogError, ProductStore};
use clerk_core::config::{AppConfig, CatalogConfig, ConfigError, LoadOptions};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    // An explicitly named config file must exist; discovery may come up empty.
    let require_file = config_path.is_some();
    AppConfig::load(LoadOptions { config_path, require_file, ..LoadOptions::default() })
}

pub(crate) fn build_store(catalog: &CatalogConfig) -> Result<ProductStore, CatalogError> {
    match &catalog.path {
        Some(path) => ProductStore::from_file(path),
        None => Ok(ProductStore::builtin()),
    }
}
