use std::path::PathBuf;

use clerk_core::domain::product::ProductId;
use serde_json::json;

use super::{build_store, load_config, CommandResult};

pub fn run(config_path: Option<PathBuf>, product_id: &str) -> CommandResult {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("show", "config_validation", error.to_string(), 2)
        }
    };

    let store = match build_store(&config.catalog) {
        Ok(store) => store,
        Err(error) => return CommandResult::failure("show", "catalog", error.to_string(), 2),
    };

    let Some(product) = store.get(&ProductId(product_id.to_string())) else {
        return CommandResult::failure(
            "show",
            "product_not_found",
            format!("no product with id `{product_id}`"),
            1,
        );
    };

    let payload = json!({
        "command": "show",
        "status": "ok",
        "product": {
            "id": product.id.0,
            "name": product.name,
            "price": product.price_display(),
            "stock": product.stock,
            "description": product.description,
        },
    });

    match serde_json::to_string_pretty(&payload) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("show", "serialization", error.to_string(), 1),
    }
}
