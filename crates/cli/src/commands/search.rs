use std::path::PathBuf;

use serde_json::json;

use super::{build_store, load_config, CommandResult};

/// Offline catalog search: deterministic substring matching only, no model
/// calls regardless of the configured scoring mode.
pub fn run(config_path: Option<PathBuf>, query: &str) -> CommandResult {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("search", "config_validation", error.to_string(), 2)
        }
    };

    let store = match build_store(&config.catalog) {
        Ok(store) => store,
        Err(error) => return CommandResult::failure("search", "catalog", error.to_string(), 2),
    };

    let results = store
        .search(query)
        .into_iter()
        .map(|product| {
            json!({
                "id": product.id.0,
                "name": product.name,
                "price": product.price_display(),
                "stock": product.stock,
                "description": product.description,
            })
        })
        .collect::<Vec<_>>();

    let payload = json!({
        "command": "search",
        "status": "ok",
        "query": query,
        "count": results.len(),
        "results": results,
    });

    match serde_json::to_string_pretty(&payload) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("search", "serialization", error.to_string(), 1),
    }
}
