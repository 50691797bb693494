use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use clerk_core::catalog::{ProductStore, RelevanceScorer};
use clerk_core::config::ScoringMode;
use clerk_core::domain::product::{Product, ProductId};

use crate::interpreter::{DETAILS_TOOL, SEARCH_TOOL};

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    async fn execute(&self, input: Value) -> Result<Value>;
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub async fn dispatch(&self, name: &str, input: Value) -> Result<Value> {
        let tool =
            self.tools.get(name).ok_or_else(|| anyhow!("unknown tool `{name}`"))?;
        tool.execute(input).await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn product_json(product: &Product) -> Value {
    json!({
        "id": product.id.0,
        "name": product.name,
        "price": product.price_display(),
        "stock": product.stock,
        "description": product.description,
    })
}

/// `search_products`: substring search by default, model-scored search when
/// the scoring mode says so and a scorer is wired in.
pub struct SearchProductsTool {
    store: Arc<ProductStore>,
    scoring: ScoringMode,
    scorer: Option<Arc<dyn RelevanceScorer>>,
    score_threshold: u8,
    max_candidates: usize,
}

impl SearchProductsTool {
    pub fn substring(store: Arc<ProductStore>) -> Self {
        Self {
            store,
            scoring: ScoringMode::Off,
            scorer: None,
            score_threshold: 0,
            max_candidates: 0,
        }
    }

    pub fn scored(
        store: Arc<ProductStore>,
        scorer: Arc<dyn RelevanceScorer>,
        score_threshold: u8,
        max_candidates: usize,
    ) -> Self {
        Self {
            store,
            scoring: ScoringMode::Model,
            scorer: Some(scorer),
            score_threshold,
            max_candidates,
        }
    }
}

#[async_trait]
impl Tool for SearchProductsTool {
    fn name(&self) -> &'static str {
        SEARCH_TOOL
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let search_term = input
            .get("search_term")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("search_products requires a `search_term` string"))?;

        let results = match (self.scoring, &self.scorer) {
            (ScoringMode::Model, Some(scorer)) => self
                .store
                .search_scored(search_term, scorer.as_ref(), self.score_threshold, self.max_candidates)
                .await
                .iter()
                .map(|scored| product_json(&scored.product))
                .collect::<Vec<_>>(),
            _ => self
                .store
                .search(search_term)
                .into_iter()
                .map(product_json)
                .collect::<Vec<_>>(),
        };

        Ok(json!({ "count": results.len(), "results": results }))
    }
}

/// `get_product_details`: exact id lookup. A miss is reported in the result
/// payload, never retried.
pub struct ProductDetailsTool {
    store: Arc<ProductStore>,
}

impl ProductDetailsTool {
    pub fn new(store: Arc<ProductStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ProductDetailsTool {
    fn name(&self) -> &'static str {
        DETAILS_TOOL
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let product_id = input
            .get("product_id")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("get_product_details requires a `product_id` string"))?;

        match self.store.get(&ProductId(product_id.to_string())) {
            Some(product) => Ok(json!({ "found": true, "product": product_json(product) })),
            None => Ok(json!({ "found": false, "product_id": product_id })),
        }
    }
}
