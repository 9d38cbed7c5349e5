//! OpenAI-specific request and response types
//!
//! These types map directly to the chat completions API schema.

use serde::{Deserialize, Serialize};

/// Request body for `POST /chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier, e.g. "gpt-4o"
    pub model: String,
    /// Conversation, system message first
    pub messages: Vec<OpenAiMessage>,
    /// Always true; the relay only speaks streaming
    pub stream: bool,
    /// Ask for a trailing usage chunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamOptions {
    pub include_usage: bool,
}

/// A single message in the OpenAI conversation
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: OpenAiContent,
}

/// Content can be either a simple string or an array of parts
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OpenAiContent {
    Text(String),
    Parts(Vec<OpenAiContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenAiContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
    /// "auto", "low" or "high"
    pub detail: String,
}

/// One `data:` payload of the streaming response
///
/// The API reports mid-stream failures as an `{"error": {...}}` object
/// instead of a chunk, so the error shape is tried first.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StreamPayload {
    Error { error: OpenAiErrorData },
    Chunk(ChatCompletionChunk),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: Option<String>,
    /// Empty on the trailing usage chunk
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(default)]
    pub usage: Option<OpenAiUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OpenAiUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Error object, both in error responses and inside the stream
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiErrorData {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// String in practice, but the API has used numbers and null
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl OpenAiErrorData {
    /// Best available short identifier for the error
    pub fn code_str(&self) -> String {
        match &self.code {
            Some(serde_json::Value::String(code)) => code.clone(),
            Some(serde_json::Value::Null) | None => self
                .error_type
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            Some(other) => other.to_string(),
        }
    }
}

/// Body of a non-success HTTP response
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: OpenAiErrorData,
}
