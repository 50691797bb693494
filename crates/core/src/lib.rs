pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod intent;

pub use catalog::{CatalogError, ProductStore, RelevanceScorer, ScoredProduct, ScoringError};
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use intent::{IntentClassifier, UserIntent};
