use anyhow::{bail, Context, Result};
use std::str::FromStr;

/// Which LLM backend serves generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            other => bail!("Unknown LLM_PROVIDER '{other}' (expected gemini, openai, or anthropic)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_provider: Provider,
    pub llm_api_key: String,
    pub max_upload_bytes: usize,
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub generation_deadline_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_provider: std::env::var("LLM_PROVIDER")
                .unwrap_or_else(|_| "gemini".to_string())
                .parse()?,
            llm_api_key: require_env("LLM_API_KEY")?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            retry_max_attempts: env_or("RETRY_MAX_ATTEMPTS", 3)?,
            retry_base_delay_ms: env_or("RETRY_BASE_DELAY_MS", 1000)?,
            generation_deadline_secs: env_or("GENERATION_DEADLINE_SECS", 120)?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}
