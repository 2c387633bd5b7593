pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::{routing::get, routing::post, Router};

use crate::extraction::handlers as extraction_handlers;
use crate::generation::handlers as generation_handlers;
use crate::state::AppState;

/// Multipart framing (boundaries, part headers) on top of the payload cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    // The body limit must sit above the upload cap: `classify` is the
    // authoritative size check, and an oversized file has to reach it to
    // fail as FileTooLarge rather than a framework-level 400.
    let upload_body_limit =
        DefaultBodyLimit::max(state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/extract",
            post(extraction_handlers::handle_extract).layer(upload_body_limit),
        )
        .route(
            "/api/v1/letters",
            post(generation_handlers::handle_generate_letter),
        )
        .with_state(state)
}
