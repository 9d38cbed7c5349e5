//! Chat pipeline: format extracted files, assemble the prompt, relay the
//! model's streamed answer.

pub mod assembler;
pub mod events;
pub mod formatter;
pub mod relay;

pub use assembler::{assemble_messages, SYSTEM_PROMPT};
pub use events::ChatEvent;
pub use formatter::format_results;
pub use relay::{parse_chat_request, ChatRelay, RequestError};
