//! DynamoDB-backed item store
//!
//! Table layout: partition key `userId`, sort key `todoId`. Writes that must
//! target an existing record use an `attribute_exists` condition so a missing
//! item surfaces as `None` instead of an upsert.

use crate::{CoreError, Result, TodoItem, TodoStore, TodoUpdate};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::{
    error::DisplayErrorContext,
    types::{AttributeValue, ReturnValue},
    Client,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

const USER_ID: &str = "userId";
const TODO_ID: &str = "todoId";
const CREATED_AT: &str = "createdAt";
const NAME: &str = "name";
const DUE_DATE: &str = "dueDate";
const DONE: &str = "done";
const ATTACHMENT_URL: &str = "attachmentUrl";

type Attributes = HashMap<String, AttributeValue>;

/// Item store on a DynamoDB table
#[derive(Clone)]
pub struct DynamoTodoStore {
    client: Client,
    table_name: String,
}

impl DynamoTodoStore {
    /// Create a store over an existing client
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Create a store from shared AWS configuration
    pub fn from_sdk_config(config: &SdkConfig, table_name: impl Into<String>) -> Self {
        Self::new(Client::new(config), table_name)
    }

    /// Name of the backing table
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl TodoStore for DynamoTodoStore {
    async fn list_todos(&self, user_id: &str) -> Result<Vec<TodoItem>> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("#userId = :userId")
                .expression_attribute_names("#userId", USER_ID)
                .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()))
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(store_error)?;

            for attributes in output.items.unwrap_or_default() {
                items.push(from_attributes(&attributes)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!(user_id, count = items.len(), table = %self.table_name, "Queried todos");
        Ok(items)
    }

    async fn get_todo(&self, user_id: &str, todo_id: &str) -> Result<Option<TodoItem>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(USER_ID, AttributeValue::S(user_id.to_string()))
            .key(TODO_ID, AttributeValue::S(todo_id.to_string()))
            .send()
            .await
            .map_err(store_error)?;

        output.item.as_ref().map(from_attributes).transpose()
    }

    async fn put_todo(&self, item: &TodoItem) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_attributes(item)))
            .send()
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn update_todo(
        &self,
        user_id: &str,
        todo_id: &str,
        update: &TodoUpdate,
    ) -> Result<Option<TodoItem>> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(USER_ID, AttributeValue::S(user_id.to_string()))
            .key(TODO_ID, AttributeValue::S(todo_id.to_string()))
            .update_expression("SET #name = :name, #dueDate = :dueDate, #done = :done")
            .condition_expression("attribute_exists(#todoId)")
            .expression_attribute_names("#name", NAME)
            .expression_attribute_names("#dueDate", DUE_DATE)
            .expression_attribute_names("#done", DONE)
            .expression_attribute_names("#todoId", TODO_ID)
            .expression_attribute_values(":name", AttributeValue::S(update.name.clone()))
            .expression_attribute_values(":dueDate", AttributeValue::S(update.due_date.clone()))
            .expression_attribute_values(":done", AttributeValue::Bool(update.done))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => output.attributes.as_ref().map(from_attributes).transpose(),
            Err(err) if err
                .as_service_error()
                .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Ok(None)
            }
            Err(err) => Err(store_error(err)),
        }
    }

    async fn set_attachment_url(
        &self,
        user_id: &str,
        todo_id: &str,
        attachment_url: &str,
    ) -> Result<Option<TodoItem>> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(USER_ID, AttributeValue::S(user_id.to_string()))
            .key(TODO_ID, AttributeValue::S(todo_id.to_string()))
            .update_expression("SET #attachmentUrl = :attachmentUrl")
            .condition_expression("attribute_exists(#todoId)")
            .expression_attribute_names("#attachmentUrl", ATTACHMENT_URL)
            .expression_attribute_names("#todoId", TODO_ID)
            .expression_attribute_values(
                ":attachmentUrl",
                AttributeValue::S(attachment_url.to_string()),
            )
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => output.attributes.as_ref().map(from_attributes).transpose(),
            Err(err) if err
                .as_service_error()
                .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Ok(None)
            }
            Err(err) => Err(store_error(err)),
        }
    }

    async fn delete_todo(&self, user_id: &str, todo_id: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(USER_ID, AttributeValue::S(user_id.to_string()))
            .key(TODO_ID, AttributeValue::S(todo_id.to_string()))
            .send()
            .await
            .map_err(store_error)?;
        Ok(())
    }
}

fn store_error<E: std::error::Error>(err: E) -> CoreError {
    CoreError::Store(DisplayErrorContext(err).to_string())
}

fn to_attributes(item: &TodoItem) -> Attributes {
    let mut attributes = HashMap::new();
    attributes.insert(USER_ID.to_string(), AttributeValue::S(item.user_id.clone()));
    attributes.insert(TODO_ID.to_string(), AttributeValue::S(item.todo_id.clone()));
    attributes.insert(
        CREATED_AT.to_string(),
        AttributeValue::S(item.created_at.to_rfc3339()),
    );
    attributes.insert(NAME.to_string(), AttributeValue::S(item.name.clone()));
    attributes.insert(DUE_DATE.to_string(), AttributeValue::S(item.due_date.clone()));
    attributes.insert(DONE.to_string(), AttributeValue::Bool(item.done));
    if let Some(url) = &item.attachment_url {
        attributes.insert(ATTACHMENT_URL.to_string(), AttributeValue::S(url.clone()));
    }
    attributes
}

fn from_attributes(attributes: &Attributes) -> Result<TodoItem> {
    let created_at = DateTime::parse_from_rfc3339(&string_attr(attributes, CREATED_AT)?)
        .map_err(|e| CoreError::Serialization(format!("invalid {}: {}", CREATED_AT, e)))?
        .with_timezone(&Utc);

    Ok(TodoItem {
        user_id: string_attr(attributes, USER_ID)?,
        todo_id: string_attr(attributes, TODO_ID)?,
        created_at,
        name: string_attr(attributes, NAME)?,
        due_date: string_attr(attributes, DUE_DATE)?,
        done: attributes
            .get(DONE)
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        attachment_url: attributes
            .get(ATTACHMENT_URL)
            .and_then(|v| v.as_s().ok())
            .cloned(),
    })
}

fn string_attr(attributes: &Attributes, name: &str) -> Result<String> {
    attributes
        .get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| CoreError::Serialization(format!("missing string attribute {}", name)))
}
