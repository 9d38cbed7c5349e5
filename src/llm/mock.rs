//! In-process provider that replays a fixed script

use async_trait::async_trait;
use std::sync::Mutex;

use super::core::{
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::{GenerateRequest, StreamEvent},
};

/// One scripted stream item
#[derive(Debug, Clone)]
pub enum ScriptItem {
    Event(StreamEvent),
    /// Yields `Err(LlmError::StreamError(..))` at this point of the stream
    Fail(String),
}

/// Provider for exercising the relay without network access
///
/// Every call replays the same script. The last request is kept so tests
/// can inspect what the relay assembled.
pub struct ScriptedProvider {
    script: Vec<ScriptItem>,
    open_error: Option<String>,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl ScriptedProvider {
    /// Stream that yields one text delta per fragment, then finishes normally
    pub fn replying(fragments: &[&str]) -> Self {
        Self::with_script(
            fragments
                .iter()
                .map(|text| {
                    ScriptItem::Event(StreamEvent::TextDelta {
                        text: text.to_string(),
                    })
                })
                .collect(),
        )
    }

    pub fn with_script(script: Vec<ScriptItem>) -> Self {
        Self {
            script,
            open_error: None,
            last_request: Mutex::new(None),
        }
    }

    /// Provider whose `stream_generate` call itself fails
    pub fn failing_to_open(message: impl Into<String>) -> Self {
        Self {
            script: Vec::new(),
            open_error: Some(message.into()),
            last_request: Mutex::new(None),
        }
    }

    /// The most recent request passed to `stream_generate`
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request);
        }

        if let Some(message) = &self.open_error {
            return Err(LlmError::HttpError {
                status: 503,
                body: message.clone(),
            });
        }

        let items: Vec<Result<StreamEvent, LlmError>> = self
            .script
            .iter()
            .map(|item| match item {
                ScriptItem::Event(event) => Ok(event.clone()),
                ScriptItem::Fail(message) => Err(LlmError::StreamError(message.clone())),
            })
            .collect();

        Ok(Box::pin(futures::stream::iter(items)))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
