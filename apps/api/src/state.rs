use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LetterGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generation backend, chosen once at startup via LLM_PROVIDER.
    pub generator: Arc<dyn LetterGenerator>,
    pub config: Config,
}
