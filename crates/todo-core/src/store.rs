//! Item store abstraction

use crate::{DynamoTodoStore, MemoryTodoStore, Result, TodoItem, TodoUpdate};
use async_trait::async_trait;

/// Single-record operations against the item table.
///
/// Every method is keyed by `(user_id, todo_id)`; `user_id` is always the
/// authenticated owner, never a value taken from a request body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All items stored under an owner
    async fn list_todos(&self, user_id: &str) -> Result<Vec<TodoItem>>;

    /// Fetch one item
    async fn get_todo(&self, user_id: &str, todo_id: &str) -> Result<Option<TodoItem>>;

    /// Insert or replace an item
    async fn put_todo(&self, item: &TodoItem) -> Result<()>;

    /// Overwrite the mutable fields of an existing item.
    ///
    /// Returns `None` when the item does not exist; nothing is written then.
    async fn update_todo(
        &self,
        user_id: &str,
        todo_id: &str,
        update: &TodoUpdate,
    ) -> Result<Option<TodoItem>>;

    /// Record the attachment location of an existing item
    async fn set_attachment_url(
        &self,
        user_id: &str,
        todo_id: &str,
        attachment_url: &str,
    ) -> Result<Option<TodoItem>>;

    /// Remove an item; removing a missing item is not an error
    async fn delete_todo(&self, user_id: &str, todo_id: &str) -> Result<()>;
}

/// Store selected at startup: DynamoDB in deployments, memory for development
pub enum FlexibleTodoStore {
    /// DynamoDB table
    DynamoDb(DynamoTodoStore),
    /// In-memory map
    Memory(MemoryTodoStore),
}

impl FlexibleTodoStore {
    /// Check if items survive a restart
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::DynamoDb(_))
    }
}

#[async_trait]
impl TodoStore for FlexibleTodoStore {
    async fn list_todos(&self, user_id: &str) -> Result<Vec<TodoItem>> {
        match self {
            Self::DynamoDb(store) => store.list_todos(user_id).await,
            Self::Memory(store) => store.list_todos(user_id).await,
        }
    }

    async fn get_todo(&self, user_id: &str, todo_id: &str) -> Result<Option<TodoItem>> {
        match self {
            Self::DynamoDb(store) => store.get_todo(user_id, todo_id).await,
            Self::Memory(store) => store.get_todo(user_id, todo_id).await,
        }
    }

    async fn put_todo(&self, item: &TodoItem) -> Result<()> {
        match self {
            Self::DynamoDb(store) => store.put_todo(item).await,
            Self::Memory(store) => store.put_todo(item).await,
        }
    }

    async fn update_todo(
        &self,
        user_id: &str,
        todo_id: &str,
        update: &TodoUpdate,
    ) -> Result<Option<TodoItem>> {
        match self {
            Self::DynamoDb(store) => store.update_todo(user_id, todo_id, update).await,
            Self::Memory(store) => store.update_todo(user_id, todo_id, update).await,
        }
    }

    async fn set_attachment_url(
        &self,
        user_id: &str,
        todo_id: &str,
        attachment_url: &str,
    ) -> Result<Option<TodoItem>> {
        match self {
            Self::DynamoDb(store) => {
                store
                    .set_attachment_url(user_id, todo_id, attachment_url)
                    .await
            }
            Self::Memory(store) => {
                store
                    .set_attachment_url(user_id, todo_id, attachment_url)
                    .await
            }
        }
    }

    async fn delete_todo(&self, user_id: &str, todo_id: &str) -> Result<()> {
        match self {
            Self::DynamoDb(store) => store.delete_todo(user_id, todo_id).await,
            Self::Memory(store) => store.delete_todo(user_id, todo_id).await,
        }
    }
}
