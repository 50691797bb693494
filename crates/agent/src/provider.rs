use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use clerk_core::config::LlmConfig;

use crate::llm::{ChatMessage, LlmClient};

/// Chat client for OpenAI-compatible completion endpoints
/// (`POST {base_url}/chat/completions` with bearer auth).
pub struct OpenAiCompatClient {
    api_key: SecretString,
    base_url: String,
    model: String,
    client: Client,
}

impl OpenAiCompatClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .context("llm.api_key is not configured")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|message| WireMessage {
                    role: message.role.as_str(),
                    content: &message.content,
                })
                .collect(),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("chat completion request failed")?;

        let response = response
            .error_for_status()
            .context("chat completion returned an error status")?;

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .context("chat completion response was not valid JSON")?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| anyhow!("chat completion response contained no assistant text"))
    }
}
