use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use clerk_core::errors::ApplicationError;
use clerk_core::intent::IntentClassifier;

use crate::interpreter::{self, ModelOutput, ToolCall};
use crate::llm::{ChatMessage, LlmClient};
use crate::memory::ConversationMemory;
use crate::prompt::{self, PromptBuilder};
use crate::tools::ToolRegistry;

const MALFORMED_CALL_REPLY: &str =
    "I had trouble reading the assistant's tool call. Please try rephrasing your request.";
const NO_RESULTS_REPLY: &str =
    "I could not find any matching products. Try different keywords.";

#[derive(Clone, Debug)]
pub struct ToolTrace {
    pub tool: &'static str,
    pub argument: String,
    pub result: Value,
}

#[derive(Clone, Debug)]
pub struct TurnOutcome {
    pub reply: String,
    pub tool_trace: Option<ToolTrace>,
    pub correlation_id: String,
}

/// One conversation's orchestrator. Every turn is: assemble prompt, one
/// chat call, interpret, maybe one tool dispatch plus one summarization
/// call, append memory. Failures never escape a turn; they become a
/// user-facing apology and the loop continues.
pub struct AgentRuntime {
    client: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    prompt: PromptBuilder,
    memory: ConversationMemory,
    classifier: IntentClassifier,
}

impl AgentRuntime {
    pub fn new(client: Arc<dyn LlmClient>, tools: ToolRegistry, history_limit: usize) -> Self {
        Self {
            client,
            tools,
            prompt: PromptBuilder::new(),
            memory: ConversationMemory::new(history_limit),
            classifier: IntentClassifier::new(),
        }
    }

    pub fn history_len(&self) -> usize {
        self.memory.len()
    }

    pub async fn handle_turn(&mut self, user_text: &str) -> TurnOutcome {
        let correlation_id = Uuid::new_v4().to_string();
        let intent = self.classifier.classify(user_text);
        info!(correlation_id = %correlation_id, intent = ?intent, "turn started");

        let (reply, tool_trace) = match self.run_turn(user_text, &correlation_id).await {
            Ok(outcome) => outcome,
            Err(turn_error) => {
                error!(correlation_id = %correlation_id, error = %turn_error, "turn failed");
                let interface = ApplicationError::Integration(turn_error.to_string())
                    .into_interface(correlation_id.clone());
                (interface.user_message().to_string(), None)
            }
        };

        self.memory.record_user(user_text);
        self.memory.record_assistant(&reply);

        TurnOutcome { reply, tool_trace, correlation_id }
    }

    async fn run_turn(
        &self,
        user_text: &str,
        correlation_id: &str,
    ) -> Result<(String, Option<ToolTrace>)> {
        let messages = self.prompt.messages(&self.memory, user_text);
        let output = self.client.complete(&messages).await?;

        match interpreter::interpret(&output) {
            Err(interpret_error) => {
                warn!(
                    correlation_id = %correlation_id,
                    error = %interpret_error,
                    "model output could not be interpreted"
                );
                Ok((MALFORMED_CALL_REPLY.to_string(), None))
            }
            Ok(ModelOutput::Reply(reply)) => Ok((reply, None)),
            Ok(ModelOutput::ToolCall(call)) => self.dispatch_and_summarize(call, correlation_id).await,
        }
    }

    async fn dispatch_and_summarize(
        &self,
        call: ToolCall,
        correlation_id: &str,
    ) -> Result<(String, Option<ToolTrace>)> {
        let (input, argument) = match &call {
            ToolCall::SearchProducts { search_term } => {
                (json!({ "search_term": search_term }), search_term.clone())
            }
            ToolCall::GetProductDetails { product_id } => {
                (json!({ "product_id": product_id }), product_id.clone())
            }
        };

        let tool = call.tool_name();
        let result = self.tools.dispatch(tool, input).await?;
        info!(correlation_id = %correlation_id, tool, argument = %argument, "tool dispatched");

        let reply = match &call {
            ToolCall::SearchProducts { .. } => {
                if result.get("count").and_then(Value::as_u64) == Some(0) {
                    NO_RESULTS_REPLY.to_string()
                } else {
                    let rendered = serde_json::to_string_pretty(&result)?;
                    self.client
                        .complete(&[ChatMessage::user(prompt::search_summary_prompt(&rendered))])
                        .await?
                }
            }
            ToolCall::GetProductDetails { product_id } => {
                if result.get("found").and_then(Value::as_bool) == Some(false) {
                    format!("I could not find product `{product_id}`. Please check the product id.")
                } else {
                    let rendered = serde_json::to_string_pretty(&result)?;
                    self.client
                        .complete(&[ChatMessage::user(prompt::details_summary_prompt(&rendered))])
                        .await?
                }
            }
        };

        Ok((reply, Some(ToolTrace { tool, argument, result })))
    }
}
