use std::process::ExitCode;
use std::sync::Arc;

use docchat::config::Settings;
use docchat::llm::create_provider;
use docchat::routes::{configure_routes, AppState};
use docchat::telemetry::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(settings.log_format);

    let provider = match create_provider(&settings) {
        Ok(provider) => Arc::from(provider),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create LLM provider");
            return ExitCode::FAILURE;
        }
    };

    let addr = settings.socket_addr();
    tracing::info!(
        %addr,
        model = %settings.openai_model,
        max_upload_bytes = settings.max_upload_bytes,
        "Starting server"
    );

    let routes = configure_routes(AppState::from_settings(&settings, provider));
    warp::serve(routes).run(addr).await;

    ExitCode::SUCCESS
}
