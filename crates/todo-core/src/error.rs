//! Error types for the todo-core crate

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in todo operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// No item with this id exists for the owner
    #[error("todo not found: {todo_id}")]
    NotFound { todo_id: String },

    /// The stored item belongs to a different owner
    #[error("access denied to todo: {todo_id}")]
    AccessDenied { todo_id: String },

    /// Request failed validation
    #[error("validation error: {0}")]
    Validation(String),

    /// Backing store failure
    #[error("store error: {0}")]
    Store(String),

    /// Upload URL could not be signed
    #[error("signing error: {0}")]
    Signing(String),

    /// A stored record could not be decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    pub fn not_found(todo_id: impl Into<String>) -> Self {
        Self::NotFound {
            todo_id: todo_id.into(),
        }
    }

    pub fn access_denied(todo_id: impl Into<String>) -> Self {
        Self::AccessDenied {
            todo_id: todo_id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
