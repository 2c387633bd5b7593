//! Anthropic Messages API backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use crate::llm_client::retry::{with_retry, RetryPolicy};
use crate::llm_client::{
    classify_http_failure, classify_transport_failure, GenerateError, LetterGenerator,
};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

const SYSTEM: &str = "You are a professional cover letter writer. \
    Respond with the cover letter text only, no commentary.";

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Extracts the letter text from the first text block. A `refusal` stop
/// reason maps to `ContentRejected`; a blank completion maps to
/// `EmptyGeneration`.
fn letter_from_response(response: AnthropicResponse) -> Result<String, GenerateError> {
    if response.stop_reason.as_deref() == Some("refusal") {
        return Err(GenerateError::ContentRejected(
            "the model declined to generate this content".to_string(),
        ));
    }

    let text = response
        .content
        .into_iter()
        .find(|block| block.block_type == "text")
        .and_then(|block| block.text)
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerateError::EmptyGeneration);
    }
    Ok(text)
}

pub struct AnthropicClient {
    client: Client,
    api_key: String,
    retry: RetryPolicy,
}

impl AnthropicClient {
    pub fn new(api_key: String, retry: RetryPolicy) -> anyhow::Result<Self> {
        Ok(AnthropicClient {
            client: crate::llm_client::build_http_client()?,
            api_key,
            retry,
        })
    }

    async fn call_once(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: SYSTEM,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(classify_http_failure(status.as_u16(), message));
        }

        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Upstream(format!("unreadable response: {e}")))?;

        debug!("Anthropic call succeeded");
        letter_from_response(parsed)
    }
}

#[async_trait]
impl LetterGenerator for AnthropicClient {
    async fn generate(
        &self,
        prompt: &str,
        deadline: Option<Instant>,
    ) -> Result<String, GenerateError> {
        with_retry(&self.retry, deadline, || self.call_once(prompt)).await
    }

    fn backend_name(&self) -> &str {
        "anthropic"
    }
}
