//! API Routes for Roster
//!
//! This module combines all API routes into a single router.

mod status;
mod students;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::services::ServeDir;

use crate::AppState;

pub use students::PHOTO_FIELD;

/// Room for the text fields and multipart framing on top of the photo.
const FORM_OVERHEAD: usize = 64 * 1024;

/// Build the complete API router.
///
/// Route structure:
/// - /, /health, /health/ready - Status (public)
/// - /api/students/* - Student records
/// - /uploads/* - Stored photos, served from the uploads directory
pub fn routes(state: &AppState) -> Router<AppState> {
    let body_limit = state.storage.max_upload_size.saturating_add(FORM_OVERHEAD);

    Router::new()
        .merge(status::routes())
        .nest(
            "/api/students",
            students::routes().layer(DefaultBodyLimit::max(body_limit)),
        )
        .nest_service("/uploads", ServeDir::new(&state.storage.uploads_path))
}
