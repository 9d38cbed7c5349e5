//! OpenAI provider implementation
//!
//! Streams chat completions (text and image inputs) from the OpenAI API or
//! any server that speaks the same protocol.

pub mod client;
pub mod mapper;
pub mod sse;
pub mod types;

// Re-export commonly used types
pub use client::{OpenAiClient, OpenAiModel};
