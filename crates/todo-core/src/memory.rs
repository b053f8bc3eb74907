//! In-memory item store for development and tests

use crate::{Result, TodoItem, TodoStore, TodoUpdate};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Composite table key: (owner, item)
type TodoKey = (String, String);

/// An in-memory item table
#[derive(Clone, Default)]
pub struct MemoryTodoStore {
    items: Arc<DashMap<TodoKey, TodoItem>>,
}

impl MemoryTodoStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            items: Arc::new(DashMap::new()),
        }
    }

    /// Number of items across all owners
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn key(user_id: &str, todo_id: &str) -> TodoKey {
        (user_id.to_string(), todo_id.to_string())
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list_todos(&self, user_id: &str) -> Result<Vec<TodoItem>> {
        Ok(self
            .items
            .iter()
            .filter(|entry| entry.key().0 == user_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn get_todo(&self, user_id: &str, todo_id: &str) -> Result<Option<TodoItem>> {
        Ok(self
            .items
            .get(&Self::key(user_id, todo_id))
            .map(|entry| entry.value().clone()))
    }

    async fn put_todo(&self, item: &TodoItem) -> Result<()> {
        self.items
            .insert(Self::key(&item.user_id, &item.todo_id), item.clone());
        Ok(())
    }

    async fn update_todo(
        &self,
        user_id: &str,
        todo_id: &str,
        update: &TodoUpdate,
    ) -> Result<Option<TodoItem>> {
        Ok(self
            .items
            .get_mut(&Self::key(user_id, todo_id))
            .map(|mut entry| {
                let item = entry.value_mut();
                item.name = update.name.clone();
                item.due_date = update.due_date.clone();
                item.done = update.done;
                item.clone()
            }))
    }

    async fn set_attachment_url(
        &self,
        user_id: &str,
        todo_id: &str,
        attachment_url: &str,
    ) -> Result<Option<TodoItem>> {
        Ok(self
            .items
            .get_mut(&Self::key(user_id, todo_id))
            .map(|mut entry| {
                let item = entry.value_mut();
                item.attachment_url = Some(attachment_url.to_string());
                item.clone()
            }))
    }

    async fn delete_todo(&self, user_id: &str, todo_id: &str) -> Result<()> {
        self.items.remove(&Self::key(user_id, todo_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CreateTodoRequest;

    fn item(user_id: &str, name: &str) -> TodoItem {
        TodoItem::new(
            user_id,
            CreateTodoRequest {
                name: name.to_string(),
                due_date: "2026-12-01".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryTodoStore::new();
        let todo = item("alice", "Write report");

        store.put_todo(&todo).await.unwrap();

        let fetched = store.get_todo("alice", &todo.todo_id).await.unwrap();
        assert_eq!(fetched, Some(todo));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_partitioned_by_owner() {
        let store = MemoryTodoStore::new();
        store.put_todo(&item("alice", "a")).await.unwrap();
        store.put_todo(&item("alice", "b")).await.unwrap();
        store.put_todo(&item("bob", "c")).await.unwrap();

        let alice = store.list_todos("alice").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|t| t.user_id == "alice"));

        let carol = store.list_todos("carol").await.unwrap();
        assert!(carol.is_empty());
    }

    #[tokio::test]
    async fn test_get_with_other_owner_misses() {
        let store = MemoryTodoStore::new();
        let todo = item("alice", "Write report");
        store.put_todo(&todo).await.unwrap();

        assert!(store.get_todo("bob", &todo.todo_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = MemoryTodoStore::new();
        let update = TodoUpdate {
            name: "x".to_string(),
            due_date: "y".to_string(),
            done: true,
        };

        let result = store.update_todo("alice", "missing", &update).await.unwrap();
        assert!(result.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryTodoStore::new();
        let todo = item("alice", "Write report");
        store.put_todo(&todo).await.unwrap();

        store.delete_todo("alice", &todo.todo_id).await.unwrap();
        store.delete_todo("alice", &todo.todo_id).await.unwrap();

        assert!(store.is_empty());
    }
}
