//! LLM Abstraction Layer
//!
//! A provider-neutral request/stream model plus the OpenAI chat completions
//! client that the chat relay talks to.

pub mod core;
pub mod mock;
pub mod openai;

// Re-export commonly used types
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{create_provider, EventStream, LlmProvider},
    types::{
        ContentPart, FinishReason, GenerateRequest, Message, MessageContent, MessageRole,
        StreamEvent, UsageMetadata,
    },
};
pub use openai::{OpenAiClient, OpenAiModel};
