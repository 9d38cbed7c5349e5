// Handlers module

pub mod chat;
pub mod status;
pub mod upload;

pub use chat::chat_handler;
pub use status::{health_handler, root_handler, ROOT_GREETING};
pub use upload::upload_handler;
