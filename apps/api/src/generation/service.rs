//! Cover letter generation — the top-level orchestration.
//!
//! Flow: validate inputs → build prompt → generate via the configured
//! backend → return the letter or one classified error. Transitions are
//! strictly forward; the only retrying happens inside the backend's retry
//! executor. Validation fails closed: blank inputs never reach the network.

use serde::Deserialize;
use tokio::time::Instant;
use tracing::info;

use crate::generation::options::GenerationOptions;
use crate::generation::prompt::build_prompt;
use crate::llm_client::{GenerateError, LetterGenerator};

/// Request body for letter generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateLetterRequest {
    #[serde(rename = "resumeText")]
    pub resume_text: String,
    #[serde(rename = "jobDescription")]
    pub job_description: String,
    #[serde(default)]
    pub options: GenerationOptions,
}

/// Runs the full generation pipeline.
pub async fn generate_cover_letter(
    generator: &dyn LetterGenerator,
    request: &GenerateLetterRequest,
    deadline: Option<Instant>,
) -> Result<String, GenerateError> {
    // Step 1: validate. Both fields must survive trimming.
    let resume_text = request.resume_text.trim();
    let job_description = request.job_description.trim();
    if resume_text.is_empty() || job_description.is_empty() {
        return Err(GenerateError::MissingInput);
    }

    // Step 2: render the prompt.
    let prompt = build_prompt(resume_text, job_description, &request.options);
    info!(
        "Generating cover letter via {} (resume {} chars, jd {} chars)",
        generator.backend_name(),
        resume_text.len(),
        job_description.len()
    );

    // Step 3: generate.
    let letter = generator.generate(&prompt, deadline).await?;

    let letter = letter.trim();
    if letter.is_empty() {
        return Err(GenerateError::EmptyGeneration);
    }

    info!("Cover letter generated ({} chars)", letter.len());
    Ok(letter.to_string())
}
