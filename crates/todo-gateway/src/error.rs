//! Error types and API error codes

use crate::auth::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use todo_core::CoreError;

/// Error codes returned by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AccessDenied,
    InternalError,
    InvalidRequest,
    InvalidToken,
    MissingAuthentication,
    NoSuchRoute,
    NoSuchTodo,
    SlowDown,
    ValidationError,
}

impl ErrorCode {
    /// Get the error code string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessDenied => "AccessDenied",
            Self::InternalError => "InternalError",
            Self::InvalidRequest => "InvalidRequest",
            Self::InvalidToken => "InvalidToken",
            Self::MissingAuthentication => "MissingAuthentication",
            Self::NoSuchRoute => "NoSuchRoute",
            Self::NoSuchTodo => "NoSuchTodo",
            Self::SlowDown => "SlowDown",
            Self::ValidationError => "ValidationError",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest | Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::InvalidToken | Self::MissingAuthentication => StatusCode::UNAUTHORIZED,
            Self::NoSuchRoute | Self::NoSuchTodo => StatusCode::NOT_FOUND,
            Self::SlowDown => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}: {message}", .code.as_str())]
    Api { code: ErrorCode, message: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

/// JSON error body
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Api { code, .. } => *code,
            Self::Internal(_) => ErrorCode::InternalError,
            Self::Core(e) => match e {
                CoreError::NotFound { .. } => ErrorCode::NoSuchTodo,
                CoreError::AccessDenied { .. } => ErrorCode::AccessDenied,
                CoreError::Validation(_) => ErrorCode::ValidationError,
                _ => ErrorCode::InternalError,
            },
            Self::Auth(e) => match e {
                AuthError::InvalidHeader => ErrorCode::MissingAuthentication,
                AuthError::Unauthorized(_) => ErrorCode::InvalidToken,
                AuthError::Certificate(_) => ErrorCode::InternalError,
            },
        }
    }

    /// Message safe to show the caller. Authorization and internal failures
    /// never reveal their cause.
    pub fn public_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Core(CoreError::Validation(message)) => message.clone(),
            _ => match self.error_code() {
                ErrorCode::NoSuchTodo => "Todo item not found".to_string(),
                ErrorCode::AccessDenied => "Access denied".to_string(),
                ErrorCode::InvalidToken | ErrorCode::MissingAuthentication => {
                    "Unauthorized".to_string()
                }
                _ => "Internal server error".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let status = code.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code = code.as_str(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = code.as_str(), "Request rejected");
        }

        (
            status,
            [("x-error-code", code.as_str())],
            Json(ErrorBody {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CoreError::not_found("t-1"), StatusCode::NOT_FOUND)]
    #[case(CoreError::access_denied("t-1"), StatusCode::FORBIDDEN)]
    #[case(CoreError::validation("name must not be empty"), StatusCode::BAD_REQUEST)]
    #[case(CoreError::Store("throttled".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(CoreError::Signing("no credentials".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_core_error_status(#[case] error: CoreError, #[case] status: StatusCode) {
        assert_eq!(ApiError::from(error).error_code().status_code(), status);
    }

    #[rstest]
    #[case(AuthError::InvalidHeader)]
    #[case(AuthError::Unauthorized("InvalidSignature".into()))]
    fn test_auth_errors_hide_reason(#[case] error: AuthError) {
        let error = ApiError::from(error);

        assert_eq!(error.error_code().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(error.public_message(), "Unauthorized");
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let error = ApiError::from(CoreError::Store("table Todos does not exist".into()));
        assert_eq!(error.public_message(), "Internal server error");
    }

    #[test]
    fn test_validation_message_is_kept() {
        let error = ApiError::from(CoreError::validation("name must not be empty"));
        assert_eq!(error.public_message(), "name must not be empty");
    }
}
