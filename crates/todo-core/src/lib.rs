//! # Todo Core
//!
//! Domain layer for the Todo API.
//!
//! This crate provides:
//! - **Todo items**: the per-user item model and request validation
//! - **Item store**: the `TodoStore` trait with in-memory and DynamoDB backends
//! - **Attachments**: pre-signed S3 upload URLs keyed by item id
//! - **Service**: `TodoService`, which enforces ownership on every operation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          HTTP / Lambda handlers         │
//! ├─────────────────────────────────────────┤
//! │              TodoService                │
//! ├────────────────────┬────────────────────┤
//! │     TodoStore      │  UploadUrlSigner   │
//! ├──────────┬─────────┼────────────────────┤
//! │  Memory  │ DynamoDB│         S3         │
//! └──────────┴─────────┴────────────────────┘
//! ```

pub mod attachments;
pub mod dynamodb;
pub mod error;
pub mod memory;
pub mod model;
pub mod service;
pub mod store;

pub use attachments::{PresignedUpload, S3UploadSigner, UploadUrlSigner};
pub use dynamodb::DynamoTodoStore;
pub use error::{CoreError, Result};
pub use memory::MemoryTodoStore;
pub use model::{CreateTodoRequest, TodoItem, TodoUpdate, UpdateTodoRequest};
pub use service::TodoService;
pub use store::{FlexibleTodoStore, TodoStore};
