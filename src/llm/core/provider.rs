//! Provider trait for LLM implementations

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

use super::{
    error::LlmError,
    types::{GenerateRequest, StreamEvent},
};
use crate::config::Settings;
use crate::llm::openai::{OpenAiClient, OpenAiModel};

/// Stream of incremental events produced by a provider
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;

/// Main interface that all LLM provider implementations must satisfy
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stream generate content from the LLM
    ///
    /// Opening the stream fails with an error when the provider rejects the
    /// request outright. Once open, failures arrive as `Err` items.
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError>;

    /// Model identifier used for logging
    fn model_name(&self) -> &str;
}

/// Create the configured LLM provider
///
/// # Example
///
/// ```rust,no_run
/// use docchat::config::Settings;
/// use docchat::llm::create_provider;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = Settings::from_env()?;
/// let provider = create_provider(&settings)?;
/// # Ok(())
/// # }
/// ```
pub fn create_provider(settings: &Settings) -> Result<Box<dyn LlmProvider>, LlmError> {
    let model = OpenAiModel::from(settings.openai_model.as_str());
    let client = OpenAiClient::new(
        settings.openai_api_key.clone(),
        settings.openai_base_url.clone(),
        model,
    )?;
    Ok(Box::new(client))
}
