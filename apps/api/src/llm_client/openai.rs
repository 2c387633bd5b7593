//! OpenAI chat-completions backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use crate::llm_client::retry::{with_retry, RetryPolicy};
use crate::llm_client::{
    classify_http_failure, classify_transport_failure, GenerateError, LetterGenerator,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const MODEL: &str = "gpt-4-turbo-preview";
const MAX_TOKENS: u32 = 1000;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// Extracts the letter text from a parsed chat response. A
/// `content_filter` finish reason maps to `ContentRejected`; a missing or
/// blank message maps to `EmptyGeneration`.
fn letter_from_response(response: ChatResponse) -> Result<String, GenerateError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(GenerateError::EmptyGeneration)?;

    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(GenerateError::ContentRejected(
            "completion stopped by the content filter".to_string(),
        ));
    }

    let text = choice.message.content.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(GenerateError::EmptyGeneration);
    }
    Ok(text)
}

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    retry: RetryPolicy,
}

impl OpenAiClient {
    pub fn new(api_key: String, retry: RetryPolicy) -> anyhow::Result<Self> {
        Ok(OpenAiClient {
            client: crate::llm_client::build_http_client()?,
            api_key,
            retry,
        })
    }

    async fn call_once(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Prefer the structured error message when the body parses.
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(classify_http_failure(status.as_u16(), message));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Upstream(format!("unreadable response: {e}")))?;

        debug!("OpenAI call succeeded");
        letter_from_response(parsed)
    }
}

#[async_trait]
impl LetterGenerator for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        deadline: Option<Instant>,
    ) -> Result<String, GenerateError> {
        with_retry(&self.retry, deadline, || self.call_once(prompt)).await
    }

    fn backend_name(&self) -> &str {
        "openai"
    }
}
