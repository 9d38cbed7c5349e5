// Route definitions, shared state and rejection handling

use std::convert::Infallible;
use std::sync::Arc;

use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::chat::ChatRelay;
use crate::config::Settings;
use crate::files::FileProcessor;
use crate::handlers;
use crate::llm::LlmProvider;
use crate::models::ErrorBody;

/// Everything the routes need, cloned into each request
#[derive(Clone)]
pub struct AppState {
    relay: ChatRelay,
    processor: FileProcessor,
    openai_configured: bool,
    max_upload_bytes: u64,
}

impl AppState {
    pub fn new(relay: ChatRelay, openai_configured: bool, max_upload_bytes: u64) -> Self {
        Self {
            relay,
            processor: FileProcessor::new(),
            openai_configured,
            max_upload_bytes,
        }
    }

    pub fn from_settings(settings: &Settings, provider: Arc<dyn LlmProvider>) -> Self {
        let relay = ChatRelay::new(provider, FileProcessor::new(), settings.generation_config());
        Self::new(relay, settings.openai_configured(), settings.max_upload_bytes)
    }
}

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let limit = state.max_upload_bytes;

    // GET /
    let root = warp::path::end()
        .and(warp::get())
        .and_then(handlers::root_handler);

    // GET /health
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_value(state.openai_configured))
        .and_then(handlers::health_handler);

    // POST /chat
    let chat = warp::path("chat")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_value(state.relay.clone()))
        .and(warp::body::content_length_limit(limit))
        .and(warp::body::bytes())
        .and_then(handlers::chat_handler);

    // POST /upload
    let upload = warp::path("upload")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_value(state.processor))
        .and(warp::multipart::form().max_length(limit))
        .and_then(handlers::upload_handler);

    root.or(health)
        .or(chat)
        .or(upload)
        .with(cors())
        .recover(handle_rejection)
        .with(warp::trace::request())
}

fn with_value<T>(value: T) -> impl Filter<Extract = (T,), Error = Infallible> + Clone
where
    T: Clone + Send + Sync + 'static,
{
    warp::any().map(move || value.clone())
}

fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type", "cache-control"])
}

/// Turn any rejection into a JSON error body with a matching status
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(e) = err.find::<warp::reject::PayloadTooLarge>() {
        (StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::LengthRequired>() {
        (StatusCode::LENGTH_REQUIRED, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::UnsupportedMediaType>() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
    } else if let Some(e) = err.find::<warp::cors::CorsForbidden>() {
        (StatusCode::FORBIDDEN, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::MethodNotAllowed>() {
        (StatusCode::METHOD_NOT_ALLOWED, e.to_string())
    } else {
        tracing::error!(rejection = ?err, "Unhandled rejection");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody::new(message)),
        status,
    ))
}
