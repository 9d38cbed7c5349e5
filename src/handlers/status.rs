// GET / and GET /health handlers

use crate::models::HealthResponse;
use std::convert::Infallible;

pub const ROOT_GREETING: &str = "Hello, world! Chatbot API is running.";

pub async fn root_handler() -> Result<impl warp::Reply, Infallible> {
    Ok(ROOT_GREETING)
}

pub async fn health_handler(openai_configured: bool) -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&HealthResponse::healthy(openai_configured)))
}
