// HTTP Server modules
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sse;

// Chat pipeline and file extraction
pub mod chat;
pub mod files;

// LLM abstraction layer
pub mod llm;

// Process setup
pub mod config;
pub mod telemetry;
