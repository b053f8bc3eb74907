//! Service-level handlers

use crate::{ApiError, ErrorCode};
use axum::{http::StatusCode, response::IntoResponse};

/// GET /health - Liveness probe
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::new(ErrorCode::NoSuchRoute, "Route not found")
}
