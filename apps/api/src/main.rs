mod config;
mod errors;
mod extraction;
mod generation;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, Provider};
use crate::llm_client::{
    AnthropicClient, GeminiClient, LetterGenerator, OpenAiClient, RetryPolicy,
};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Letterpress API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the generation backend selected by LLM_PROVIDER
    let retry = RetryPolicy {
        max_attempts: config.retry_max_attempts,
        base_delay: Duration::from_millis(config.retry_base_delay_ms),
    };
    let generator: Arc<dyn LetterGenerator> = match config.llm_provider {
        Provider::Gemini => Arc::new(GeminiClient::new(config.llm_api_key.clone(), retry)?),
        Provider::OpenAi => Arc::new(OpenAiClient::new(config.llm_api_key.clone(), retry)?),
        Provider::Anthropic => Arc::new(AnthropicClient::new(config.llm_api_key.clone(), retry)?),
    };
    info!(
        "Generation backend initialized: {} ({} attempts, {}ms base delay)",
        generator.backend_name(),
        retry.max_attempts,
        retry.base_delay.as_millis()
    );

    // Build app state
    let state = AppState {
        generator,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
