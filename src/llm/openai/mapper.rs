//! Mapping between abstraction types and OpenAI-specific types

use crate::llm::core::types::{
    ContentPart, FinishReason, GenerateRequest, Message, MessageContent, MessageRole,
    StreamEvent, UsageMetadata,
};

use super::types::{
    ChatCompletionRequest, ImageUrl, OpenAiContent, OpenAiContentPart, OpenAiMessage,
    StreamOptions, StreamPayload,
};

/// Convert our abstraction request to the chat completions request format
pub fn to_openai_request(model: &str, request: GenerateRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: request
            .messages
            .into_iter()
            .map(to_openai_message)
            .collect(),
        stream: true,
        stream_options: Some(StreamOptions {
            include_usage: true,
        }),
        max_tokens: request.config.max_tokens,
        temperature: request.config.temperature,
        top_p: request.config.top_p,
        stop: request.config.stop_sequences,
    }
}

fn to_openai_message(message: Message) -> OpenAiMessage {
    let role = match message.role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    }
    .to_string();

    let content = match message.content {
        MessageContent::Text(text) => OpenAiContent::Text(text),
        MessageContent::Parts(parts) => {
            OpenAiContent::Parts(parts.into_iter().map(to_openai_part).collect())
        }
    };

    OpenAiMessage { role, content }
}

fn to_openai_part(part: ContentPart) -> OpenAiContentPart {
    match part {
        ContentPart::Text { text } => OpenAiContentPart::Text { text },
        ContentPart::Image { url } => OpenAiContentPart::ImageUrl {
            image_url: ImageUrl {
                url,
                detail: "auto".to_string(),
            },
        },
    }
}

/// Convert one streamed payload to our abstraction's events
///
/// A single chunk can carry a text delta and a finish reason at once, so
/// this returns a vector. Empty deltas (the role-only opening chunk) are
/// dropped.
pub fn from_openai_payload(payload: StreamPayload) -> Vec<StreamEvent> {
    let chunk = match payload {
        StreamPayload::Error { error } => {
            return vec![StreamEvent::Error {
                error: format!("{}: {}", error.code_str(), error.message),
            }];
        }
        StreamPayload::Chunk(chunk) => chunk,
    };

    let mut events = Vec::new();

    for choice in chunk.choices {
        if let Some(text) = choice.delta.content {
            if !text.is_empty() {
                events.push(StreamEvent::TextDelta { text });
            }
        }
        if let Some(reason) = choice.finish_reason {
            events.push(StreamEvent::MessageEnd {
                finish_reason: FinishReason::from(reason.as_str()),
            });
        }
    }

    if let Some(usage) = chunk.usage {
        events.push(StreamEvent::Usage {
            usage: UsageMetadata {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::config::GenerationConfig;

    fn payload(json: &str) -> StreamPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_to_openai_request_text_messages() {
        let request = GenerateRequest {
            messages: vec![Message::system("sys"), Message::user("Hello")],
            config: GenerationConfig::new(256).with_temperature(0.2),
        };

        let openai = to_openai_request("gpt-4o", request);
        let json = serde_json::to_value(&openai).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["stream"], true);
        assert_eq!(json["stream_options"]["include_usage"], true);
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "sys");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Hello");
    }

    #[test]
    fn test_to_openai_request_multimodal_message() {
        let request = GenerateRequest {
            messages: vec![Message::user_parts(vec![
                ContentPart::Text {
                    text: "What is this?".to_string(),
                },
                ContentPart::image_data("image/png", "iVBORw0KGgo="),
            ])],
            config: GenerationConfig::default(),
        };

        let json = serde_json::to_value(to_openai_request("gpt-4o", request)).unwrap();
        let content = &json["messages"][0]["content"];

        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "What is this?");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/png;base64,iVBORw0KGgo="
        );
        assert_eq!(content[1]["image_url"]["detail"], "auto");
    }

    #[test]
    fn test_text_delta() {
        let events = from_openai_payload(payload(
            r#"{"choices":[{"index":0,"delta":{"content":"Hello"},"finish_reason":null}]}"#,
        ));
        assert_eq!(
            events,
            vec![StreamEvent::TextDelta {
                text: "Hello".to_string()
            }]
        );
    }

    #[test]
    fn test_role_only_chunk_is_dropped() {
        let events = from_openai_payload(payload(
            r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":""},"finish_reason":null}]}"#,
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn test_finish_reason() {
        let events = from_openai_payload(payload(
            r#"{"choices":[{"index":0,"delta":{},"finish_reason":"length"}]}"#,
        ));
        assert_eq!(
            events,
            vec![StreamEvent::MessageEnd {
                finish_reason: FinishReason::Length
            }]
        );
    }

    #[test]
    fn test_usage_chunk() {
        let events = from_openai_payload(payload(
            r#"{"choices":[],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#,
        ));
        assert_eq!(
            events,
            vec![StreamEvent::Usage {
                usage: UsageMetadata::new(10, 5)
            }]
        );
    }

    #[test]
    fn test_error_payload() {
        let events = from_openai_payload(payload(
            r#"{"error":{"message":"overloaded","type":"server_error","code":null}}"#,
        ));
        assert_eq!(
            events,
            vec![StreamEvent::Error {
                error: "server_error: overloaded".to_string()
            }]
        );
    }
}
