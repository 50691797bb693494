//! Agent runtime - chat orchestration over a hosted model
//!
//! This crate provides the conversational side of clerk:
//! - Builds the system prompt that teaches the model the pseudo tool-call
//!   format (`prompt`)
//! - Talks to an OpenAI-compatible chat completion endpoint (`provider`)
//! - Scrapes the model's free-text reply for tool calls (`interpreter`)
//! - Executes catalog tools and summarizes their results (`tools`, `runtime`)
//! - Keeps bounded in-process conversation history (`memory`)
//!
//! # Architecture
//!
//! One user turn runs a constrained loop:
//! 1. **Prompt assembly** (`prompt`) - system message + history + user turn
//! 2. **Chat call** (`llm`, `provider`) - one outbound completion request
//! 3. **Interpretation** (`interpreter`) - recover the pseudo call, if any
//! 4. **Tool execution** (`tools`) - catalog search / details lookup
//! 5. **Summarization** - a second completion call over the tool result
//!
//! # Safety Principle
//!
//! The model never answers product questions from its own knowledge. Every
//! product fact in a reply comes from a tool result over the local catalog;
//! the prompt enforces this and the runtime only surfaces tool output.

pub mod interpreter;
pub mod llm;
pub mod memory;
pub mod prompt;
pub mod provider;
pub mod runtime;
pub mod scoring;
pub mod tools;
