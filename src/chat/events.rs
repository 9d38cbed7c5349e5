use serde::{Deserialize, Serialize};

/// Event sent to the chat client
///
/// A stream holds any number of `Chunk`s followed by exactly one `End` or
/// `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatEvent {
    Chunk { content: String },
    End,
    Error { error: String },
}

impl ChatEvent {
    pub fn chunk(content: impl Into<String>) -> Self {
        ChatEvent::Chunk {
            content: content.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        ChatEvent::Error {
            error: error.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChatEvent::Chunk { .. })
    }
}
