//! LLM client layer — the single point of entry for all model-backend calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to a provider API directly.
//! All backends implement [`LetterGenerator`] and are selected once at startup
//! from config; the rest of the service only sees the trait and the
//! [`GenerateError`] taxonomy.

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::Instant;

pub mod anthropic;
pub mod gemini;
pub mod openai;
pub mod retry;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use retry::RetryPolicy;

/// Classified generation failure. Every provider-specific error is mapped
/// into exactly one of these kinds at the client boundary; callers never
/// inspect raw provider error text.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("resume text and job description are required")]
    MissingInput,

    #[error("backend authentication failed: {0}")]
    Auth(String),

    #[error("backend rate limited: {0}")]
    RateLimited(String),

    #[error("backend error: {0}")]
    Upstream(String),

    #[error("content was rejected by the backend safety filters: {0}")]
    ContentRejected(String),

    #[error("backend rejected the request as malformed: {0}")]
    InvalidRequest(String),

    #[error("backend returned an empty completion")]
    EmptyGeneration,

    #[error("deadline elapsed before the backend call completed")]
    DeadlineExceeded,
}

impl GenerateError {
    /// Rate limiting is the only transient kind; everything else fails fast.
    /// Auth, validation, and server-side faults do not resolve by retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerateError::RateLimited(_))
    }

    /// Stable machine-readable code for the HTTP error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::MissingInput => "MISSING_INPUT",
            GenerateError::Auth(_) => "AUTH_ERROR",
            GenerateError::RateLimited(_) => "RATE_LIMITED",
            GenerateError::Upstream(_) => "UPSTREAM_ERROR",
            GenerateError::ContentRejected(_) => "CONTENT_REJECTED",
            GenerateError::InvalidRequest(_) => "INVALID_REQUEST",
            GenerateError::EmptyGeneration => "EMPTY_GENERATION",
            GenerateError::DeadlineExceeded => "DEADLINE_EXCEEDED",
        }
    }
}

/// Maps an HTTP failure status from any backend into the domain taxonomy.
/// This is the one status→kind table; backends add only their own
/// content-safety category checks on top of it.
pub(crate) fn classify_http_failure(status: u16, message: String) -> GenerateError {
    match status {
        401 | 403 => GenerateError::Auth(message),
        429 => GenerateError::RateLimited(message),
        400 | 404 | 422 => GenerateError::InvalidRequest(message),
        s if s >= 500 => GenerateError::Upstream(format!("backend returned {s}: {message}")),
        s => GenerateError::Upstream(format!("unexpected status {s}: {message}")),
    }
}

/// Maps a transport-level failure (connect, timeout, body read) to a kind.
pub(crate) fn classify_transport_failure(err: reqwest::Error) -> GenerateError {
    if err.is_timeout() {
        GenerateError::DeadlineExceeded
    } else {
        GenerateError::Upstream(format!("request failed: {err}"))
    }
}

/// The polymorphic generation capability. One backend is constructed at
/// startup and carried in `AppState` as `Arc<dyn LetterGenerator>`.
#[async_trait]
pub trait LetterGenerator: Send + Sync {
    /// Generates a cover letter from a fully rendered prompt. Runs through
    /// the retry executor internally; `deadline` bounds all attempts.
    async fn generate(
        &self,
        prompt: &str,
        deadline: Option<Instant>,
    ) -> Result<String, GenerateError>;

    /// Name of this backend (for startup logs and diagnostics).
    fn backend_name(&self) -> &str;
}

/// Builds the shared reqwest client used by every backend.
/// The 120 s timeout is a transport-level ceiling; per-request deadlines
/// are enforced separately by the retry executor.
pub(crate) fn build_http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()?)
}
