use axum::{extract::State, Json};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

use crate::errors::AppError;
use crate::generation::service::{generate_cover_letter, GenerateLetterRequest};
use crate::state::AppState;

#[derive(Serialize)]
pub struct GenerateLetterResponse {
    pub letter: String,
}

/// POST /api/v1/letters
pub async fn handle_generate_letter(
    State(state): State<AppState>,
    Json(request): Json<GenerateLetterRequest>,
) -> Result<Json<GenerateLetterResponse>, AppError> {
    // The request deadline bounds every backend attempt, backoff included.
    let deadline = Instant::now() + Duration::from_secs(state.config.generation_deadline_secs);
    let letter =
        generate_cover_letter(state.generator.as_ref(), &request, Some(deadline)).await?;
    Ok(Json(GenerateLetterResponse { letter }))
}
