use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractError;
use crate::llm_client::GenerateError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn extract_status(err: &ExtractError) -> StatusCode {
    match err {
        ExtractError::InvalidFormat { .. } => StatusCode::BAD_REQUEST,
        ExtractError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        ExtractError::PasswordProtected
        | ExtractError::CorruptDocument(_)
        | ExtractError::EmptyDocument
        | ExtractError::NoExtractableText => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn generate_status(err: &GenerateError) -> StatusCode {
    match err {
        GenerateError::MissingInput | GenerateError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        GenerateError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        GenerateError::ContentRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GenerateError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        GenerateError::Upstream(_) | GenerateError::EmptyGeneration => StatusCode::BAD_GATEWAY,
        GenerateError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, remediation) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Extract(e) => (
                extract_status(e),
                e.code(),
                e.to_string(),
                Some(e.remediation().to_string()),
            ),
            AppError::Generate(e) => {
                let status = generate_status(e);
                if status.is_server_error() {
                    tracing::error!("Generation error: {e}");
                }
                // Server-side key problems must not leak backend detail.
                let message = match e {
                    GenerateError::Auth(_) => {
                        "The generation backend rejected the service credentials".to_string()
                    }
                    other => other.to_string(),
                };
                (status, e.code(), message, None)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(remediation) = remediation {
            error["remediation"] = json!(remediation);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
