use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract, SourceFile};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ExtractResponse {
    pub text: String,
    #[serde(rename = "pageCount")]
    pub page_count: usize,
}

/// POST /api/v1/extract
///
/// Multipart upload: a `file` field carrying the document bytes, with the
/// browser-declared content type and file name.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut file: Option<SourceFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("unreadable multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let mime_type = field.content_type().unwrap_or("").to_string();
        let file_name = field.file_name().unwrap_or("").to_string();
        let bytes: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        file = Some(SourceFile {
            bytes,
            mime_type,
            file_name,
        });
    }

    let file = file.ok_or_else(|| AppError::Validation("no file provided".to_string()))?;

    info!(
        "Extracting text from '{}' ({}, {} bytes)",
        file.file_name,
        file.mime_type,
        file.bytes.len()
    );

    let result = extract(&file, state.config.max_upload_bytes)?;
    Ok(Json(ExtractResponse {
        text: result.text,
        page_count: result.page_count,
    }))
}
