//! Server-Sent Events (SSE) parser for OpenAI streaming responses

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::StreamPayload;

/// Marker sent as the final `data:` line of a completion stream
const DONE_MARKER: &str = "[DONE]";

/// Parse a stream of bytes as OpenAI SSE payloads
///
/// The chat completions stream is a sequence of `data: <json>` lines
/// separated by blank lines, terminated by `data: [DONE]`. This parser:
/// 1. Buffers incoming bytes until a full line is available
/// 2. Decodes the line as UTF-8 (multi-byte characters may straddle chunks)
/// 3. Parses the JSON payload of `data:` lines
/// 4. Ignores comments, `event:`/`id:` lines and the `[DONE]` marker
pub fn parse_sse_stream(
    byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
) -> Pin<Box<dyn Stream<Item = Result<StreamPayload, LlmError>> + Send>> {
    let mut buffer: Vec<u8> = Vec::new();

    let event_stream = byte_stream.flat_map(move |chunk_result| {
        let chunk = match chunk_result {
            Ok(bytes) => bytes,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::StreamError(e.to_string()))]);
            }
        };

        buffer.extend_from_slice(&chunk);

        let mut events = Vec::new();
        while let Some(newline_pos) = buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = buffer.drain(..=newline_pos).collect();

            let line = match std::str::from_utf8(&raw) {
                Ok(line) => line.trim(),
                Err(e) => {
                    events.push(Err(LlmError::StreamError(format!(
                        "Invalid UTF-8 in stream: {}",
                        e
                    ))));
                    continue;
                }
            };

            if let Some(event) = parse_line(line) {
                events.push(event);
            }
        }

        futures::stream::iter(events)
    });

    Box::pin(event_stream)
}

fn parse_line(line: &str) -> Option<Result<StreamPayload, LlmError>> {
    let data = line.strip_prefix("data:")?.trim();

    if data.is_empty() || data == DONE_MARKER {
        return None;
    }

    match serde_json::from_str::<StreamPayload>(data) {
        Ok(payload) => Some(Ok(payload)),
        Err(e) => Some(Err(LlmError::SerializationError(format!(
            "Failed to parse SSE data: {}. Data: {}",
            e, data
        )))),
    }
}
