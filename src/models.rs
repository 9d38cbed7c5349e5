// Request and response bodies for the HTTP surface

use serde::{Deserialize, Serialize};
use serde_json::Value;

// Chat Request
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub attached_files: Option<Vec<AttachedFile>>,
}

impl ChatRequest {
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    pub fn files(&self) -> &[AttachedFile] {
        self.attached_files.as_deref().unwrap_or_default()
    }
}

/// One attachment as sent by the client: a filename plus base64 bytes,
/// optionally wrapped in a `data:` URL
///
/// Fields stay untyped JSON so a malformed entry fails on its own instead of
/// failing the whole request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AttachedFile {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl AttachedFile {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: Some(Value::String(name.into())),
            data: Some(Value::String(data.into())),
        }
    }

    /// The filename, if the client sent one as a string
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }
}

// Health Response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub openai_configured: bool,
    pub file_processor: String,
}

impl HealthResponse {
    pub fn healthy(openai_configured: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            openai_configured,
            file_processor: "ready".to_string(),
        }
    }
}

// Error Body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_deserialization() {
        let json = r#"{"message":"Hello","attached_files":[{"name":"a.png","data":"AAAA"}]}"#;
        let request: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.message(), "Hello");
        assert_eq!(request.files().len(), 1);
        assert_eq!(request.files()[0], AttachedFile::new("a.png", "AAAA"));
        assert_eq!(request.files()[0].name(), Some("a.png"));
    }

    #[test]
    fn test_chat_request_fields_optional() {
        let request: ChatRequest = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert_eq!(request.message(), "");
        assert!(request.files().is_empty());

        let request: ChatRequest =
            serde_json::from_str(r#"{"message": null, "attached_files": null}"#).unwrap();
        assert!(request.message.is_none());
        assert!(request.attached_files.is_none());
    }

    #[test]
    fn test_attached_file_accepts_non_string_fields() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"attached_files": [{"name": 7, "data": 12345}]}"#).unwrap();
        let file = &request.files()[0];
        assert_eq!(file.name(), None);
        assert_eq!(file.data, Some(Value::from(12345)));
    }

    #[test]
    fn test_health_response_serialization() {
        let value = serde_json::to_value(HealthResponse::healthy(true)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "status": "healthy",
                "openai_configured": true,
                "file_processor": "ready"
            })
        );
    }

    #[test]
    fn test_error_body_serialization() {
        let serialized = serde_json::to_string(&ErrorBody::new("No file provided")).unwrap();
        assert_eq!(serialized, r#"{"error":"No file provided"}"#);
    }
}
