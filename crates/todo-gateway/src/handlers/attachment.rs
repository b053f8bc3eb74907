//! Attachment upload handler

use crate::state::Principal;
use crate::{ApiError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub upload_url: String,
}

/// POST /todos/{todo_id}/attachment - Issue a pre-signed upload URL
pub async fn generate_upload_url(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(todo_id): Path<String>,
) -> Result<Response, ApiError> {
    let upload_url = state
        .todos
        .generate_upload_url(&principal.user_id, &todo_id)
        .await?;

    Ok((StatusCode::OK, Json(UploadUrlResponse { upload_url })).into_response())
}
