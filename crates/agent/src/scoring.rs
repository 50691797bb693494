use std::sync::Arc;

use async_trait::async_trait;

use clerk_core::catalog::{RelevanceScorer, ScoringError};
use clerk_core::domain::product::Product;

use crate::llm::{ChatMessage, LlmClient};

/// Model-backed relevance scorer: one completion to expand the query into
/// keywords, then one completion per candidate for a 0-10 score. Score
/// replies are parsed leniently because the model rarely answers with a
/// bare number.
pub struct LlmRelevanceScorer {
    client: Arc<dyn LlmClient>,
}

impl LlmRelevanceScorer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    async fn ask(&self, prompt: String) -> Result<String, ScoringError> {
        self.client
            .complete(&[ChatMessage::user(prompt)])
            .await
            .map_err(|error| ScoringError(error.to_string()))
    }
}

#[async_trait]
impl RelevanceScorer for LlmRelevanceScorer {
    async fn expand_query(&self, query: &str) -> Result<String, ScoringError> {
        let prompt = format!(
            "Analyze this user query and extract the most relevant product search keywords.\nQuery: {query}\nAnswer in the form: keyword1, keyword2, keyword3"
        );
        let reply = self.ask(prompt).await?;
        Ok(reply.trim().to_string())
    }

    async fn score(&self, product: &Product, query: &str) -> Result<u8, ScoringError> {
        let description = product.description.as_deref().unwrap_or("");
        let prompt = format!(
            "Rate how well this product matches the query on a scale of 0-10.\nProduct: {} {}\nQuery: {}\nAnswer with the score only.",
            product.name, description, query
        );
        let reply = self.ask(prompt).await?;
        parse_score(&reply)
            .ok_or_else(|| ScoringError(format!("unparseable score reply `{}`", reply.trim())))
    }
}

/// Accepts "7", "Score: 7", "7/10", "7 out of 10" and similar shapes:
/// the first digit run after the last colon, clamped to 10.
fn parse_score(reply: &str) -> Option<u8> {
    let trimmed = reply.trim();
    let tail = trimmed.rsplit([':', '\u{ff1a}']).next().unwrap_or(trimmed);

    let digits: String =
        tail.chars().skip_while(|ch| !ch.is_ascii_digit()).take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    digits.parse::<u8>().ok().map(|score| score.min(10))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use clerk_core::catalog::RelevanceScorer;
    use clerk_core::domain::product::{Product, ProductId};

    use crate::llm::{ChatMessage, LlmClient};

    use super::{parse_score, LlmRelevanceScorer};

    #[test]
    fn lenient_score_parsing_accepts_common_shapes() {
        assert_eq!(parse_score("7"), Some(7));
        assert_eq!(parse_score("Score: 7"), Some(7));
        assert_eq!(parse_score("7/10"), Some(7));
        assert_eq!(parse_score("I would say 8 out of 10"), Some(8));
        assert_eq!(parse_score("score\u{ff1a}9"), Some(9));
        assert_eq!(parse_score("fifteen"), None);
        assert_eq!(parse_score("42"), Some(10));
    }

    struct ScriptedClient {
        reply: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
            if self.fail {
                Err(anyhow!("endpoint unavailable"))
            } else {
                Ok(self.reply.to_string())
            }
        }
    }

    fn product() -> Product {
        Product {
            id: ProductId("1001".to_string()),
            name: "Laptop".to_string(),
            price_cents: 599_900,
            stock: 10,
            description: Some("ultrabook".to_string()),
        }
    }

    #[tokio::test]
    async fn score_goes_through_the_model() -> Result<(), String> {
        let scorer =
            LlmRelevanceScorer::new(Arc::new(ScriptedClient { reply: "Score: 6", fail: false }));
        let score = scorer
            .score(&product(), "portable computer")
            .await
            .map_err(|err| err.to_string())?;
        assert_eq!(score, 6);
        Ok(())
    }

    #[tokio::test]
    async fn client_failure_surfaces_as_scoring_error() {
        let scorer = LlmRelevanceScorer::new(Arc::new(ScriptedClient { reply: "", fail: true }));
        let result = scorer.expand_query("anything").await;
        assert!(result.is_err());
    }
}
