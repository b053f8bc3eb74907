//! # Todo Gateway
//!
//! HTTP surface and token authorizer for the Todo API.
//!
//! This crate provides:
//! - **Authorizer**: RS256 bearer-token verification against a signing
//!   certificate, producing API Gateway allow/deny policies
//! - **REST API**: list, create, update and delete todos, plus attachment
//!   upload URLs
//! - **Rate Limiting**: Per-user request throttling
//! - **Deployment**: a standalone server or the same router inside AWS Lambda
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │            Browser / API Gateway event              │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                    Todo Gateway                      │
//! ├─────────────────────────────────────────────────────┤
//! │  Auth Middleware │ Rate Limiter │ Request ID / Logs │
//! ├─────────────────────────────────────────────────────┤
//! │                 Todo Handlers                        │
//! ├─────────────────────────────────────────────────────┤
//! │                   todo-core                          │
//! │     (TodoService, DynamoDB / memory store, S3)       │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use auth::{AccessDecision, Authorizer};
pub use config::GatewayConfig;
pub use error::{ApiError, ErrorCode};
pub use server::{run_lambda, run_server};
pub use state::{AppState, Principal};
