//! OpenAI chat completions client

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;

use crate::llm::core::{
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::{GenerateRequest, StreamEvent},
};

use super::mapper::{from_openai_payload, to_openai_request};
use super::sse::parse_sse_stream;
use super::types::ErrorResponse;

/// Chat model identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenAiModel {
    /// GPT-4o, multimodal
    Gpt4o,
    /// GPT-4o mini, multimodal
    Gpt4oMini,
    /// GPT-4.1, multimodal
    Gpt41,
    /// Any other identifier, passed through untouched
    Other(String),
}

impl OpenAiModel {
    /// Get the model identifier string for the API
    pub fn as_str(&self) -> &str {
        match self {
            OpenAiModel::Gpt4o => "gpt-4o",
            OpenAiModel::Gpt4oMini => "gpt-4o-mini",
            OpenAiModel::Gpt41 => "gpt-4.1",
            OpenAiModel::Other(name) => name,
        }
    }
}

impl From<&str> for OpenAiModel {
    fn from(name: &str) -> Self {
        match name.trim() {
            "gpt-4o" => OpenAiModel::Gpt4o,
            "gpt-4o-mini" => OpenAiModel::Gpt4oMini,
            "gpt-4.1" => OpenAiModel::Gpt41,
            other => OpenAiModel::Other(other.to_string()),
        }
    }
}

/// Client for streaming chat completions
pub struct OpenAiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Bearer credential
    api_key: String,
    /// e.g. "https://api.openai.com/v1", without trailing slash
    base_url: String,
    /// Model to use
    model: OpenAiModel,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is blank or the HTTP client cannot be built.
    pub fn new(api_key: String, base_url: String, model: OpenAiModel) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::AuthenticationError(
                "API key must not be empty".to_string(),
            ));
        }

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Build the endpoint URL for streaming
    fn build_endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Make a streaming request to the chat completions endpoint
    async fn make_streaming_request(
        &self,
        request: GenerateRequest,
    ) -> Result<EventStream, LlmError> {
        let openai_request = to_openai_request(self.model.as_str(), request);

        let url = self.build_endpoint_url();
        tracing::debug!(url = %url, model = self.model.as_str(), "opening completion stream");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(classify_error_response(status.as_u16(), body, retry_after));
        }

        let byte_stream = response.bytes_stream();
        let sse_stream = parse_sse_stream(Box::pin(byte_stream));

        let event_stream = sse_stream.flat_map(|result| match result {
            Ok(payload) => futures::stream::iter(
                from_openai_payload(payload)
                    .into_iter()
                    .map(Ok)
                    .collect::<Vec<Result<StreamEvent, LlmError>>>(),
            ),
            Err(e) => futures::stream::iter(vec![Err(e)]),
        });

        Ok(Box::pin(event_stream))
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        self.make_streaming_request(request).await
    }

    fn model_name(&self) -> &str {
        self.model.as_str()
    }
}

/// `Retry-After` in delta-seconds form; HTTP dates are ignored
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn classify_error_response(status: u16, body: String, retry_after: Option<Duration>) -> LlmError {
    match status {
        401 | 403 | 429 => LlmError::from_status(status, body, retry_after),
        _ => match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(parsed) => LlmError::ProviderError {
                code: parsed.error.code_str(),
                message: parsed.error.message,
            },
            Err(_) => LlmError::HttpError { status, body },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_as_str() {
        assert_eq!(OpenAiModel::Gpt4o.as_str(), "gpt-4o");
        assert_eq!(OpenAiModel::Gpt4oMini.as_str(), "gpt-4o-mini");
        assert_eq!(OpenAiModel::Gpt41.as_str(), "gpt-4.1");
        assert_eq!(OpenAiModel::Other("o3".to_string()).as_str(), "o3");
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!(OpenAiModel::from("gpt-4o"), OpenAiModel::Gpt4o);
        assert_eq!(OpenAiModel::from(" gpt-4o-mini "), OpenAiModel::Gpt4oMini);
        assert_eq!(
            OpenAiModel::from("my-finetune"),
            OpenAiModel::Other("my-finetune".to_string())
        );
    }

    #[test]
    fn test_endpoint_url_strips_trailing_slash() {
        let client = OpenAiClient::new(
            "sk-test".to_string(),
            "http://localhost:8080/v1/".to_string(),
            OpenAiModel::Gpt4o,
        )
        .unwrap();
        assert_eq!(
            client.build_endpoint_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(client.model_name(), "gpt-4o");
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let result = OpenAiClient::new(
            "  ".to_string(),
            "https://api.openai.com/v1".to_string(),
            OpenAiModel::Gpt4o,
        );
        assert!(matches!(result, Err(LlmError::AuthenticationError(_))));
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("20"), Some(Duration::from_secs(20)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn test_classify_error_response() {
        assert!(matches!(
            classify_error_response(401, "{}".to_string(), None),
            LlmError::AuthenticationError(_)
        ));
        assert!(matches!(
            classify_error_response(429, String::new(), Some(Duration::from_secs(1))),
            LlmError::RateLimitExceeded { .. }
        ));

        let body = r#"{"error":{"message":"model not found","type":"invalid_request_error","code":"model_not_found"}}"#;
        match classify_error_response(404, body.to_string(), None) {
            LlmError::ProviderError { code, message } => {
                assert_eq!(code, "model_not_found");
                assert_eq!(message, "model not found");
            }
            other => panic!("Expected provider error, got {:?}", other),
        }

        assert!(matches!(
            classify_error_response(502, "<html>bad gateway</html>".to_string(), None),
            LlmError::HttpError { status: 502, .. }
        ));
    }
}
