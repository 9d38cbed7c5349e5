//! Chat request orchestration: parse, extract, assemble, stream

use std::sync::Arc;

use async_stream::stream;
use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::files::{ExtractionError, ExtractionResult, FileProcessor, FileType};
use crate::llm::{GenerateRequest, GenerationConfig, LlmProvider, StreamEvent};
use crate::models::{AttachedFile, ChatRequest};

use super::assembler::assemble_messages;
use super::events::ChatEvent;

/// Reasons a chat request is answered with a single error event
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("No JSON data provided")]
    Empty,

    #[error("Server error: {0}")]
    Malformed(String),

    #[error("No message or files provided")]
    NothingToSend,
}

/// Parse and validate a `/chat` body
///
/// An empty body, `null` or `{}` count as "no data". Anything that is not
/// a JSON object of the expected shape is malformed.
pub fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, RequestError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RequestError::Empty);
    }

    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| RequestError::Malformed(e.to_string()))?;

    match &value {
        serde_json::Value::Null => return Err(RequestError::Empty),
        serde_json::Value::Object(map) if map.is_empty() => return Err(RequestError::Empty),
        _ => {}
    }

    let request: ChatRequest =
        serde_json::from_value(value).map_err(|e| RequestError::Malformed(e.to_string()))?;

    if request.message().is_empty() && request.files().is_empty() {
        return Err(RequestError::NothingToSend);
    }

    Ok(request)
}

/// Events buffered between the relay task and the HTTP response
const EVENT_BUFFER: usize = 64;

/// Runs one chat request from raw body to client events
///
/// Cheap to clone; every request gets its own copy moved into its stream.
#[derive(Clone)]
pub struct ChatRelay {
    provider: Arc<dyn LlmProvider>,
    processor: FileProcessor,
    config: GenerationConfig,
}

impl ChatRelay {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        processor: FileProcessor,
        config: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            processor,
            config,
        }
    }

    /// Event stream for one request
    ///
    /// Yields zero or more `Chunk`s in upstream order, then exactly one
    /// `End` or `Error`. Rejected requests never reach the provider.
    pub fn handle(&self, body: Bytes) -> impl Stream<Item = ChatEvent> + Send + 'static {
        let relay = self.clone();

        stream! {
            let request = match parse_chat_request(&body) {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!(error = %e, "chat request rejected");
                    yield ChatEvent::error(e.to_string());
                    return;
                }
            };

            let ChatRequest { message, attached_files } = request;
            let message = message.unwrap_or_default();
            let files = attached_files.unwrap_or_default();
            let file_count = files.len();

            let results = match relay.extract_files(files).await {
                Ok(results) => results,
                Err(e) => {
                    tracing::error!(error = %e, "file extraction task failed");
                    yield ChatEvent::error(format!("Server error: {}", e));
                    return;
                }
            };
            let extracted = results.iter().filter(|r| r.is_success()).count();

            let request = GenerateRequest {
                messages: assemble_messages(&message, &results),
                config: relay.config.clone(),
            };

            tracing::info!(
                model = relay.provider.model_name(),
                files = file_count,
                extracted,
                "opening upstream stream"
            );

            let mut upstream = match relay.provider.stream_generate(request).await {
                Ok(upstream) => upstream,
                Err(e) => {
                    tracing::error!(error = %e, "upstream request failed");
                    yield ChatEvent::error(e.to_string());
                    return;
                }
            };

            let mut chunks = 0usize;
            while let Some(item) = upstream.next().await {
                match item {
                    Ok(StreamEvent::TextDelta { text }) => {
                        chunks += 1;
                        yield ChatEvent::chunk(text);
                    }
                    Ok(StreamEvent::MessageEnd { finish_reason }) => {
                        tracing::debug!(?finish_reason, "upstream finished");
                    }
                    Ok(StreamEvent::Usage { usage }) => {
                        tracing::debug!(
                            input_tokens = usage.input_tokens,
                            output_tokens = usage.output_tokens,
                            "token usage"
                        );
                    }
                    Ok(StreamEvent::Error { error }) => {
                        tracing::error!(chunks, error = %error, "upstream stream reported an error");
                        yield ChatEvent::error(error);
                        return;
                    }
                    Err(e) => {
                        tracing::error!(chunks, error = %e, "upstream stream failed");
                        yield ChatEvent::error(e.to_string());
                        return;
                    }
                }
            }

            tracing::info!(chunks, "chat stream completed");
            yield ChatEvent::End;
        }
    }

    /// Run `handle` on its own task and receive its events through a channel
    ///
    /// The task keeps draining the upstream stream after the receiver is
    /// dropped; a closed client connection does not cancel the model call.
    pub fn spawn(&self, body: Bytes) -> ReceiverStream<ChatEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let events = self.handle(body);

        tokio::spawn(async move {
            futures::pin_mut!(events);
            let mut client_gone = false;
            while let Some(event) = events.next().await {
                if client_gone {
                    continue;
                }
                if tx.send(event).await.is_err() {
                    tracing::debug!("client disconnected, draining upstream");
                    client_gone = true;
                }
            }
        });

        ReceiverStream::new(rx)
    }

    /// Decode and extract attachments one after another, off the async runtime
    async fn extract_files(
        &self,
        files: Vec<AttachedFile>,
    ) -> Result<Vec<ExtractionResult>, tokio::task::JoinError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let processor = self.processor;
        tokio::task::spawn_blocking(move || {
            files
                .iter()
                .map(|file| process_attachment(processor, file))
                .collect()
        })
        .await
    }
}

/// Extract one attachment; a field of the wrong JSON type fails this file only
fn process_attachment(processor: FileProcessor, file: &AttachedFile) -> ExtractionResult {
    let name = file.name();

    match &file.data {
        None | Some(Value::Null) => processor.process_encoded(name, None),
        Some(Value::String(data)) => processor.process_encoded(name, Some(data)),
        Some(other) => {
            let filename = name.unwrap_or("unknown");
            tracing::warn!(filename, "attachment data is not a string");
            ExtractionResult::failed(
                filename,
                FileType::from_filename(filename),
                ExtractionError::Decode(format!("file data must be a base64 string, got {}", other)),
            )
        }
    }
}
