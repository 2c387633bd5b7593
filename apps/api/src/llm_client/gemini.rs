//! Gemini backend — the default generation provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use crate::llm_client::retry::{with_retry, RetryPolicy};
use crate::llm_client::{
    classify_http_failure, classify_transport_failure, GenerateError, LetterGenerator,
};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            temperature: 0.6,
            max_output_tokens: 2500,
            top_k: 40,
            top_p: 0.85,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

/// Extracts the letter text from a parsed Gemini response, mapping safety
/// blocks to `ContentRejected` and blank completions to `EmptyGeneration`.
fn letter_from_response(response: GeminiResponse) -> Result<String, GenerateError> {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            return Err(GenerateError::ContentRejected(format!(
                "prompt blocked: {reason}"
            )));
        }
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GenerateError::EmptyGeneration)?;

    if candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Err(GenerateError::ContentRejected(
            "completion stopped by safety filters".to_string(),
        ));
    }

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerateError::EmptyGeneration);
    }
    Ok(text)
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn new(api_key: String, retry: RetryPolicy) -> anyhow::Result<Self> {
        Ok(GeminiClient {
            client: crate::llm_client::build_http_client()?,
            api_key,
            retry,
        })
    }

    /// One outbound call, no retries. The retry executor wraps this.
    async fn call_once(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig::default(),
        };

        let response = self
            .client
            .post(format!("{GEMINI_API_URL}/{MODEL}:generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status.as_u16(), message));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Upstream(format!("unreadable response: {e}")))?;

        debug!("Gemini call succeeded");
        letter_from_response(parsed)
    }
}

#[async_trait]
impl LetterGenerator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        deadline: Option<Instant>,
    ) -> Result<String, GenerateError> {
        with_retry(&self.retry, deadline, || self.call_once(prompt)).await
    }

    fn backend_name(&self) -> &str {
        "gemini"
    }
}
