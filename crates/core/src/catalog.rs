use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::domain::product::{Product, ProductId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
    #[error("duplicate product id `{0}` in catalog")]
    DuplicateId(String),
    #[error("invalid price for product `{id}`: {price}")]
    InvalidPrice { id: String, price: f64 },
    #[error("catalog contains no products")]
    Empty,
}

#[derive(Debug, Error)]
#[error("relevance scoring failed: {0}")]
pub struct ScoringError(pub String);

/// Per-candidate relevance scoring against a free-text query.
///
/// The production implementation lives in the agent crate and delegates both
/// query expansion and candidate scoring to the hosted model. The store only
/// requires the trait, so tests can score deterministically.
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    /// Rewrite a raw user query into search keywords.
    async fn expand_query(&self, query: &str) -> Result<String, ScoringError>;

    /// Score one candidate against the (expanded) query on a 0-10 scale.
    async fn score(&self, product: &Product, query: &str) -> Result<u8, ScoringError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredProduct {
    pub product: Product,
    pub score: u8,
}

/// In-memory product catalog, loaded once at startup and immutable afterwards.
#[derive(Clone, Debug, Default)]
pub struct ProductStore {
    products: Vec<Product>,
}

/// Shape of one record in the catalog file. The file itself is a JSON object
/// keyed by product id; prices are major units and converted to cents here.
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    name: String,
    price: f64,
    stock: u32,
    #[serde(default)]
    description: Option<String>,
}

/// The catalog file as raw entries. A map representation would collapse a
/// repeated id to its last record; keeping every entry lets the duplicate
/// check in `ProductStore::new` see the repeat.
struct CatalogDocument(Vec<(String, CatalogRecord)>);

impl<'de> Deserialize<'de> for CatalogDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = CatalogDocument;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of product id to product record")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, CatalogRecord>()? {
                    entries.push(entry);
                }
                Ok(CatalogDocument(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl ProductStore {
    pub fn new(mut products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen_ids = BTreeSet::new();
        for product in &products {
            if !seen_ids.insert(product.id.0.clone()) {
                return Err(CatalogError::DuplicateId(product.id.0.clone()));
            }
        }

        products.sort_by(|left, right| left.id.0.cmp(&right.id.0));
        Ok(Self { products })
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;

        let document: CatalogDocument = serde_json::from_str(&raw)
            .map_err(|source| CatalogError::ParseFile { path: path.to_path_buf(), source })?;

        let mut products = Vec::with_capacity(document.0.len());
        for (id, record) in document.0 {
            if !record.price.is_finite() || record.price < 0.0 {
                return Err(CatalogError::InvalidPrice { id, price: record.price });
            }
            products.push(Product {
                id: ProductId(id),
                name: record.name,
                price_cents: (record.price * 100.0).round() as i64,
                stock: record.stock,
                description: record.description,
            });
        }

        Self::new(products)
    }

    /// The hard-coded demo catalog used when no catalog file is configured.
    pub fn builtin() -> Self {
        let products = vec![
            Product {
                id: ProductId("1001".to_string()),
                name: "Laptop".to_string(),
                price_cents: 599_900,
                stock: 10,
                description: Some("14-inch ultrabook with 16 GB RAM".to_string()),
            },
            Product {
                id: ProductId("1002".to_string()),
                name: "Smartphone".to_string(),
                price_cents: 399_900,
                stock: 20,
                description: Some("6.1-inch phone with dual cameras".to_string()),
            },
            Product {
                id: ProductId("1003".to_string()),
                name: "Wireless Earbuds".to_string(),
                price_cents: 99_900,
                stock: 50,
                description: Some("Noise-cancelling earbuds with charging case".to_string()),
            },
        ];

        // The inline catalog is a fixed literal; its ids are unique.
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// Case-insensitive substring search over name and description.
    /// Results keep the store's id ordering.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.products
            .iter()
            .filter(|product| {
                product.name.to_lowercase().contains(&needle)
                    || product
                        .description
                        .as_ref()
                        .is_some_and(|description| description.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Model-scored search: expand the query once, then score each candidate
    /// and keep those at or above the threshold. A failed expansion falls
    /// back to the raw query; a failed candidate score skips that candidate.
    pub async fn search_scored(
        &self,
        query: &str,
        scorer: &dyn RelevanceScorer,
        threshold: u8,
        max_candidates: usize,
    ) -> Vec<ScoredProduct> {
        let raw = query.trim();
        if raw.is_empty() {
            return Vec::new();
        }

        let expanded = match scorer.expand_query(raw).await {
            Ok(keywords) if !keywords.trim().is_empty() => keywords,
            _ => raw.to_string(),
        };

        let mut results = Vec::new();
        for product in self.products.iter().take(max_candidates) {
            match scorer.score(product, &expanded).await {
                Ok(score) if score >= threshold => {
                    results.push(ScoredProduct { product: product.clone(), score });
                }
                Ok(_) => {}
                Err(_) => continue,
            }
        }

        results.sort_by(|left, right| {
            right.score.cmp(&left.score).then_with(|| left.product.id.0.cmp(&right.product.id.0))
        });
        results
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::domain::product::{Product, ProductId};

    use super::{CatalogError, ProductStore, RelevanceScorer, ScoringError};

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: name.to_string(),
            price_cents: 10_000,
            stock: 5,
            description: None,
        }
    }

    #[test]
    fn substring_search_is_case_insensitive() {
        let store = ProductStore::builtin();
        let hits = store.search("LAPTOP");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ProductId("1001".to_string()));
    }

    #[test]
    fn search_also_matches_description() {
        let store = ProductStore::builtin();
        let hits = store.search("noise-cancelling");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Wireless Earbuds");
    }

    #[test]
    fn blank_query_returns_no_results() {
        let store = ProductStore::builtin();
        assert!(store.search("   ").is_empty());
    }

    #[test]
    fn exact_id_lookup_misses_cleanly() {
        let store = ProductStore::builtin();
        assert!(store.get(&ProductId("1001".to_string())).is_some());
        assert!(store.get(&ProductId("9999".to_string())).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = ProductStore::new(vec![product("1", "One"), product("1", "Other")]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(ref id)) if id == "1"));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(ProductStore::new(Vec::new()), Err(CatalogError::Empty)));
    }

    #[test]
    fn duplicate_ids_in_file_are_rejected() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err| err.to_string())?;
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"{
  "1001": {"name": "Laptop", "price": 5999, "stock": 10},
  "1001": {"name": "Impostor", "price": 1, "stock": 1}
}"#,
        )
        .map_err(|err| err.to_string())?;

        assert!(matches!(
            ProductStore::from_file(&path),
            Err(CatalogError::DuplicateId(ref id)) if id == "1001"
        ));
        Ok(())
    }

    #[test]
    fn file_load_converts_prices_to_cents() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err| err.to_string())?;
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"{
  "2001": {"name": "Desk Lamp", "price": 49.5, "stock": 12, "description": "warm LED"},
  "2002": {"name": "Mouse", "price": 25, "stock": 30}
}"#,
        )
        .map_err(|err| err.to_string())?;

        let store = ProductStore::from_file(&path)
            .map_err(|err| format!("catalog load failed: {err}"))?;
        assert_eq!(store.len(), 2);

        let lamp = store
            .get(&ProductId("2001".to_string()))
            .ok_or_else(|| "lamp should be present".to_string())?;
        assert_eq!(lamp.price_cents, 4_950);
        assert_eq!(lamp.description.as_deref(), Some("warm LED"));

        let mouse = store
            .get(&ProductId("2002".to_string()))
            .ok_or_else(|| "mouse should be present".to_string())?;
        assert_eq!(mouse.price_cents, 2_500);
        assert!(mouse.description.is_none());
        Ok(())
    }

    #[test]
    fn malformed_file_reports_parse_error() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err| err.to_string())?;
        let path = dir.path().join("products.json");
        fs::write(&path, "not json").map_err(|err| err.to_string())?;

        assert!(matches!(
            ProductStore::from_file(&path),
            Err(CatalogError::ParseFile { .. })
        ));
        Ok(())
    }

    #[test]
    fn negative_price_is_rejected() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err| err.to_string())?;
        let path = dir.path().join("products.json");
        fs::write(&path, r#"{"3001": {"name": "Broken", "price": -1, "stock": 1}}"#)
            .map_err(|err| err.to_string())?;

        assert!(matches!(
            ProductStore::from_file(&path),
            Err(CatalogError::InvalidPrice { .. })
        ));
        Ok(())
    }

    struct FixedScorer;

    #[async_trait]
    impl RelevanceScorer for FixedScorer {
        async fn expand_query(&self, query: &str) -> Result<String, ScoringError> {
            Ok(format!("{query} keywords"))
        }

        async fn score(&self, product: &Product, _query: &str) -> Result<u8, ScoringError> {
            match product.id.0.as_str() {
                "1001" => Ok(9),
                "1002" => Err(ScoringError("model returned garbage".to_string())),
                _ => Ok(0),
            }
        }
    }

    #[tokio::test]
    async fn scored_search_keeps_threshold_and_skips_failures() {
        let store = ProductStore::builtin();
        let results = store.search_scored("portable computer", &FixedScorer, 1, 50).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product.id, ProductId("1001".to_string()));
        assert_eq!(results[0].score, 9);
    }

    #[tokio::test]
    async fn scored_search_respects_candidate_cap() {
        let store = ProductStore::builtin();
        let results = store.search_scored("anything", &FixedScorer, 0, 0).await;
        assert!(results.is_empty());
    }
}
