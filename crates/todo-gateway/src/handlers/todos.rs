//! Todo item handlers

use super::parse_json_body;
use crate::state::Principal;
use crate::{ApiError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use todo_core::{CreateTodoRequest, TodoItem, TodoUpdate, UpdateTodoRequest};

/// `{todos: [...]}`
#[derive(Serialize)]
pub struct TodosResponse {
    pub todos: Vec<TodoItem>,
}

/// `{item: ...}`
#[derive(Serialize)]
pub struct ItemResponse<T> {
    pub item: T,
}

/// Empty JSON object
#[derive(Serialize)]
pub struct EmptyResponse {}

/// GET /todos - List the caller's todos
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Response, ApiError> {
    let todos = state.todos.list_todos(&principal.user_id).await?;

    Ok((StatusCode::OK, Json(TodosResponse { todos })).into_response())
}

/// POST /todos - Create a todo
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: CreateTodoRequest = parse_json_body(&body)?;

    let item = state.todos.create_todo(&principal.user_id, request).await?;

    Ok((StatusCode::CREATED, Json(ItemResponse { item })).into_response())
}

/// PATCH /todos/{todo_id} - Update name, due date or completion
pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(todo_id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: UpdateTodoRequest = parse_json_body(&body)?;

    let item: TodoUpdate = state
        .todos
        .update_todo(&principal.user_id, &todo_id, request)
        .await?;

    Ok((StatusCode::OK, Json(ItemResponse { item })).into_response())
}

/// DELETE /todos/{todo_id} - Delete a todo
pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(todo_id): Path<String>,
) -> Result<Response, ApiError> {
    state
        .todos
        .delete_todo(&principal.user_id, &todo_id)
        .await?;

    Ok((StatusCode::OK, Json(EmptyResponse {})).into_response())
}
