//! Todo API request handlers

pub mod attachment;
pub mod service;
pub mod todos;

pub use attachment::*;
pub use service::*;
pub use todos::*;

use crate::{ApiError, ErrorCode};
use bytes::Bytes;
use serde::de::DeserializeOwned;

/// Parse a JSON request body
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    if body.is_empty() {
        return Err(ApiError::new(
            ErrorCode::InvalidRequest,
            "Request body is required",
        ));
    }

    serde_json::from_slice(body).map_err(|e| {
        ApiError::new(
            ErrorCode::InvalidRequest,
            format!("Invalid request body: {}", e),
        )
    })
}
