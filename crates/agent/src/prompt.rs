use crate::llm::ChatMessage;
use crate::memory::ConversationMemory;

/// The fixed system message. It teaches the model the strict pseudo-call
/// format the interpreter scrapes for; the worked examples matter more to
/// format compliance than the prose does.
const SYSTEM_PROMPT: &str = "\
You are a shopping assistant for an online store. You can:
1. Search the product catalog
2. Look up product details
3. Answer product questions and give purchase advice

Strict rules:
1. All product facts must come from tool results. Never invent products.
2. If a tool returns no results, tell the user so honestly.
3. Every product question must be answered with exactly one tool call.
4. A tool call reply must use exactly one of these forms and contain nothing else:
   search_products(search_term=\"<keywords>\")
   get_product_details(product_id=\"<id>\")
5. Arguments must be wrapped in double quotes.

Examples:
- User asks \"recommend some smart devices\" -> reply: search_products(search_term=\"smart devices\")
- User asks \"details for product 1001\" -> reply: get_product_details(product_id=\"1001\")
- User asks \"is product 1002 in stock\" -> reply: get_product_details(product_id=\"1002\")
- User asks \"electronics under 5000\" -> reply: search_products(search_term=\"electronics under 5000\")
";

#[derive(Clone, Debug, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// System message, then history, then the latest user turn.
    pub fn messages(&self, memory: &ConversationMemory, user_input: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(memory.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(memory.as_messages());
        messages.push(ChatMessage::user(user_input));
        messages
    }
}

pub fn search_summary_prompt(results_json: &str) -> String {
    format!(
        "Briefly summarize these product search results for a shopper, highlighting the main features and strengths of each product:\n{results_json}"
    )
}

pub fn details_summary_prompt(product_json: &str) -> String {
    format!(
        "Briefly summarize this product for a shopper, highlighting its main features and strengths:\n{product_json}"
    )
}
