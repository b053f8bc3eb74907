//! Todo operations with ownership enforcement

use crate::{
    CoreError, CreateTodoRequest, Result, TodoItem, TodoStore, TodoUpdate, UpdateTodoRequest,
    UploadUrlSigner,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entry point for every todo operation.
///
/// The owner id passed to each method is the authenticated caller. Records
/// returned by the store are checked against it before they are used.
pub struct TodoService<S: TodoStore> {
    store: Arc<S>,
    signer: Arc<dyn UploadUrlSigner>,
}

impl<S: TodoStore> TodoService<S> {
    /// Create a service over a store and an upload signer
    pub fn new(store: Arc<S>, signer: Arc<dyn UploadUrlSigner>) -> Self {
        Self { store, signer }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// All items of an owner, oldest first
    pub async fn list_todos(&self, user_id: &str) -> Result<Vec<TodoItem>> {
        let mut items = self.store.list_todos(user_id).await?;

        if let Some(foreign) = items.iter().find(|item| !item.is_owned_by(user_id)) {
            warn!(user_id, todo_id = %foreign.todo_id, "Store returned an item of another owner");
            return Err(CoreError::access_denied(&foreign.todo_id));
        }

        items.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.todo_id.cmp(&b.todo_id))
        });
        debug!(user_id, count = items.len(), "Listed todos");
        Ok(items)
    }

    /// Create a new item for an owner
    pub async fn create_todo(&self, user_id: &str, request: CreateTodoRequest) -> Result<TodoItem> {
        request.validate()?;

        let item = TodoItem::new(user_id, request);
        self.store.put_todo(&item).await?;

        info!(user_id, todo_id = %item.todo_id, "Created todo");
        Ok(item)
    }

    /// Overwrite the mutable fields of an owned item
    pub async fn update_todo(
        &self,
        user_id: &str,
        todo_id: &str,
        request: UpdateTodoRequest,
    ) -> Result<TodoUpdate> {
        request.validate()?;

        let mut item = self.owned_todo(user_id, todo_id).await?;
        item.apply(&request);

        let updated = self
            .store
            .update_todo(user_id, todo_id, &item.to_update())
            .await?
            .ok_or_else(|| CoreError::not_found(todo_id))?;

        info!(user_id, todo_id, done = updated.done, "Updated todo");
        Ok(updated.to_update())
    }

    /// Remove an item; a missing item counts as removed
    pub async fn delete_todo(&self, user_id: &str, todo_id: &str) -> Result<()> {
        match self.store.get_todo(user_id, todo_id).await? {
            Some(item) if !item.is_owned_by(user_id) => {
                warn!(user_id, todo_id, owner = %item.user_id, "Refusing to delete foreign todo");
                return Err(CoreError::access_denied(todo_id));
            }
            Some(_) => {}
            None => {
                debug!(user_id, todo_id, "Delete of missing todo");
                return Ok(());
            }
        }

        self.store.delete_todo(user_id, todo_id).await?;
        info!(user_id, todo_id, "Deleted todo");
        Ok(())
    }

    /// Issue an upload URL for an item's attachment and record its location
    pub async fn generate_upload_url(&self, user_id: &str, todo_id: &str) -> Result<String> {
        self.owned_todo(user_id, todo_id).await?;

        let upload = self.signer.presign_upload(todo_id).await?;

        self.store
            .set_attachment_url(user_id, todo_id, &upload.object_url)
            .await?
            .ok_or_else(|| CoreError::not_found(todo_id))?;

        info!(
            user_id,
            todo_id,
            expires_at = %upload.expires_at,
            "Issued attachment upload URL"
        );
        Ok(upload.upload_url)
    }

    async fn owned_todo(&self, user_id: &str, todo_id: &str) -> Result<TodoItem> {
        let item = self
            .store
            .get_todo(user_id, todo_id)
            .await?
            .ok_or_else(|| CoreError::not_found(todo_id))?;

        if !item.is_owned_by(user_id) {
            warn!(user_id, todo_id, owner = %item.user_id, "Todo owner mismatch");
            return Err(CoreError::access_denied(todo_id));
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::PresignedUpload;
    use crate::store::MockTodoStore;
    use crate::MemoryTodoStore;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    struct FixedSigner;

    #[async_trait]
    impl UploadUrlSigner for FixedSigner {
        async fn presign_upload(&self, object_key: &str) -> Result<PresignedUpload> {
            Ok(PresignedUpload {
                upload_url: format!("https://uploads.test/{}?signature=abc", object_key),
                object_url: format!("https://uploads.test/{}", object_key),
                expires_at: Utc::now(),
            })
        }
    }

    fn service() -> TodoService<MemoryTodoStore> {
        TodoService::new(Arc::new(MemoryTodoStore::new()), Arc::new(FixedSigner))
    }

    fn create_request(name: &str) -> CreateTodoRequest {
        CreateTodoRequest {
            name: name.to_string(),
            due_date: "2026-12-01".to_string(),
        }
    }

    fn foreign_item(todo_id: &str) -> TodoItem {
        let mut item = TodoItem::new("mallory", create_request("not yours"));
        item.todo_id = todo_id.to_string();
        item
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let service = service();

        let created = service
            .create_todo("user-42", create_request("Buy milk"))
            .await
            .unwrap();
        let listed = service.list_todos("user-42").await.unwrap();

        assert_eq!(listed, vec![created.clone()]);
        assert!(!listed[0].done);
        assert!(DateTime::parse_from_rfc3339(&listed[0].created_at.to_rfc3339()).is_ok());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let result = service().create_todo("user-42", create_request("")).await;
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_creation() {
        let service = service();
        let mut first = TodoItem::new("u", create_request("first"));
        first.created_at = Utc::now() - chrono::Duration::minutes(5);
        let second = TodoItem::new("u", create_request("second"));

        service.store().put_todo(&second).await.unwrap();
        service.store().put_todo(&first).await.unwrap();

        let listed = service.list_todos("u").await.unwrap();
        assert_eq!(listed[0].todo_id, first.todo_id);
        assert_eq!(listed[1].todo_id, second.todo_id);
    }

    #[tokio::test]
    async fn test_update_existing() {
        let service = service();
        let created = service.create_todo("u", create_request("Buy milk")).await.unwrap();

        let update = service
            .update_todo(
                "u",
                &created.todo_id,
                UpdateTodoRequest {
                    done: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            update,
            TodoUpdate {
                name: "Buy milk".to_string(),
                due_date: "2026-12-01".to_string(),
                done: true,
            }
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let result = service()
            .update_todo(
                "u",
                "missing",
                UpdateTodoRequest {
                    done: Some(true),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_of_other_owner_is_not_found() {
        let service = service();
        let created = service.create_todo("alice", create_request("a")).await.unwrap();

        let result = service
            .update_todo(
                "bob",
                &created.todo_id,
                UpdateTodoRequest {
                    name: Some("hijacked".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(CoreError::NotFound { .. })));
        let alice = service.list_todos("alice").await.unwrap();
        assert_eq!(alice[0].name, "a");
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        assert!(service().delete_todo("u", "missing").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_item() {
        let service = service();
        let created = service.create_todo("u", create_request("x")).await.unwrap();

        service.delete_todo("u", &created.todo_id).await.unwrap();

        assert!(service.list_todos("u").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_url_records_attachment() {
        let service = service();
        let created = service.create_todo("u", create_request("x")).await.unwrap();

        let url = service.generate_upload_url("u", &created.todo_id).await.unwrap();
        assert!(url.starts_with(&format!("https://uploads.test/{}", created.todo_id)));

        let stored = service.list_todos("u").await.unwrap();
        assert_eq!(
            stored[0].attachment_url.as_deref(),
            Some(format!("https://uploads.test/{}", created.todo_id).as_str())
        );
    }

    #[tokio::test]
    async fn test_upload_url_for_missing_item_is_not_found() {
        let result = service().generate_upload_url("u", "missing").await;
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_foreign_record_is_rejected_on_update() {
        let mut store = MockTodoStore::new();
        store
            .expect_get_todo()
            .returning(|_, todo_id| Ok(Some(foreign_item(todo_id))));
        store.expect_update_todo().never();

        let service = TodoService::new(Arc::new(store), Arc::new(FixedSigner));
        let result = service
            .update_todo(
                "user-42",
                "t-1",
                UpdateTodoRequest {
                    done: Some(true),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(CoreError::AccessDenied { .. })));
    }

    #[tokio::test]
    async fn test_foreign_record_is_rejected_on_delete() {
        let mut store = MockTodoStore::new();
        store
            .expect_get_todo()
            .returning(|_, todo_id| Ok(Some(foreign_item(todo_id))));
        store.expect_delete_todo().never();

        let service = TodoService::new(Arc::new(store), Arc::new(FixedSigner));
        let result = service.delete_todo("user-42", "t-1").await;

        assert!(matches!(result, Err(CoreError::AccessDenied { .. })));
    }

    #[tokio::test]
    async fn test_foreign_record_is_rejected_on_list() {
        let mut store = MockTodoStore::new();
        store
            .expect_list_todos()
            .returning(|_| Ok(vec![foreign_item("t-1")]));

        let service = TodoService::new(Arc::new(store), Arc::new(FixedSigner));
        let result = service.list_todos("user-42").await;

        assert!(matches!(result, Err(CoreError::AccessDenied { .. })));
    }

    #[tokio::test]
    async fn test_upload_url_skipped_for_foreign_record() {
        let mut store = MockTodoStore::new();
        store
            .expect_get_todo()
            .returning(|_, todo_id| Ok(Some(foreign_item(todo_id))));
        store.expect_set_attachment_url().never();

        let service = TodoService::new(Arc::new(store), Arc::new(FixedSigner));
        let result = service.generate_upload_url("user-42", "t-1").await;

        assert!(matches!(result, Err(CoreError::AccessDenied { .. })));
    }
}
