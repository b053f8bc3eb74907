//! Todo item and request types

use crate::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do entry owned by one user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Owner identifier (token subject)
    pub user_id: String,

    /// Item identifier, unique per owner
    pub todo_id: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Display name
    pub name: String,

    /// Due date as supplied by the client
    pub due_date: String,

    /// Completion flag
    pub done: bool,

    /// Location of the uploaded attachment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

impl TodoItem {
    /// Create a fresh, not-yet-done item for an owner
    pub fn new(user_id: impl Into<String>, request: CreateTodoRequest) -> Self {
        Self {
            user_id: user_id.into(),
            todo_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            name: request.name,
            due_date: request.due_date,
            done: false,
            attachment_url: None,
        }
    }

    /// Check whether the item belongs to the given owner
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Apply the mutable fields of an update request
    pub fn apply(&mut self, update: &UpdateTodoRequest) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(due_date) = &update.due_date {
            self.due_date = due_date.clone();
        }
        if let Some(done) = update.done {
            self.done = done;
        }
    }

    /// Projection of the mutable fields
    pub fn to_update(&self) -> TodoUpdate {
        TodoUpdate {
            name: self.name.clone(),
            due_date: self.due_date.clone(),
            done: self.done,
        }
    }
}

/// Body of a create request
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub name: String,
    pub due_date: String,
}

impl CreateTodoRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("name must not be empty"));
        }
        Ok(())
    }
}

/// Body of an update request; absent fields are left untouched
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

impl UpdateTodoRequest {
    /// Check that at least one field is present and the name, if given, is usable
    pub fn validate(&self) -> Result<()> {
        if self.name.is_none() && self.due_date.is_none() && self.done.is_none() {
            return Err(CoreError::validation(
                "at least one of name, dueDate or done is required",
            ));
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(CoreError::validation("name must not be empty"));
        }
        Ok(())
    }
}

/// The fields an update is allowed to change, as returned to the caller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    pub name: String,
    pub due_date: String,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn create_request(name: &str) -> CreateTodoRequest {
        CreateTodoRequest {
            name: name.to_string(),
            due_date: "2026-12-01".to_string(),
        }
    }

    #[test]
    fn test_new_item_defaults() {
        let item = TodoItem::new("user-42", create_request("Buy milk"));

        assert_eq!(item.user_id, "user-42");
        assert!(!item.done);
        assert!(item.attachment_url.is_none());
        assert!(Uuid::parse_str(&item.todo_id).is_ok());
    }

    #[test]
    fn test_serializes_camel_case() {
        let item = TodoItem::new("user-42", create_request("Buy milk"));
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["userId"], "user-42");
        assert_eq!(json["dueDate"], "2026-12-01");
        assert_eq!(json["done"], false);
        assert!(json.get("attachmentUrl").is_none());

        let created_at = json["createdAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(created_at).is_ok());
    }

    #[rstest]
    #[case("", false)]
    #[case("   ", false)]
    #[case("Water plants", true)]
    fn test_create_validation(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(create_request(name).validate().is_ok(), valid);
    }

    #[rstest]
    #[case(UpdateTodoRequest::default(), false)]
    #[case(UpdateTodoRequest { done: Some(true), ..Default::default() }, true)]
    #[case(UpdateTodoRequest { name: Some(" ".into()), ..Default::default() }, false)]
    #[case(UpdateTodoRequest { due_date: Some("2027-01-01".into()), ..Default::default() }, true)]
    fn test_update_validation(#[case] request: UpdateTodoRequest, #[case] valid: bool) {
        assert_eq!(request.validate().is_ok(), valid);
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let mut item = TodoItem::new("user-42", create_request("Buy milk"));
        let created_at = item.created_at;

        item.apply(&UpdateTodoRequest {
            done: Some(true),
            ..Default::default()
        });

        assert!(item.done);
        assert_eq!(item.name, "Buy milk");
        assert_eq!(item.due_date, "2026-12-01");
        assert_eq!(item.created_at, created_at);
    }

    #[test]
    fn test_update_request_accepts_partial_json() {
        let request: UpdateTodoRequest = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert_eq!(request.done, Some(true));
        assert!(request.name.is_none());
    }
}
