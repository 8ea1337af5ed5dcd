//! Status Routes
//!
//! Health checks.
//!
//! Routes:
//! - GET / - Plain-text banner
//! - GET /health - Basic health check
//! - GET /health/ready - Readiness check (database and uploads directory)

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Build status routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
}

// ============================================================================
// Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: Vec<DependencyCheck>,
}

#[derive(Debug, Serialize)]
pub struct DependencyCheck {
    pub name: String,
    pub status: HealthStatus,
    pub latency_ms: Option<u64>,
    pub message: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn banner() -> &'static str {
    "Student API Running"
}

/// Basic health check.
///
/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Readiness check.
///
/// GET /health/ready
///
/// Returns 503 when the database or the uploads directory is unusable.
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let database = match crate::db::health_check(&state.db).await {
        Ok(()) => DependencyCheck {
            name: "database".into(),
            status: HealthStatus::Healthy,
            latency_ms: Some(started.elapsed().as_millis() as u64),
            message: None,
        },
        Err(e) => DependencyCheck {
            name: "database".into(),
            status: HealthStatus::Unhealthy,
            latency_ms: None,
            message: Some(e.to_string()),
        },
    };

    let uploads_ok = tokio::fs::metadata(&state.storage.uploads_path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    let uploads = DependencyCheck {
        name: "uploads".into(),
        status: if uploads_ok {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        },
        latency_ms: None,
        message: (!uploads_ok).then(|| {
            format!(
                "{} is not a directory",
                state.storage.uploads_path.display()
            )
        }),
    };

    let checks = vec![database, uploads];
    let ready = checks.iter().all(|c| c.status == HealthStatus::Healthy);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadinessResponse { ready, checks }))
}
