//! Application state

use crate::auth::{Authorizer, VerifiedClaims};
use crate::config::GatewayConfig;
use crate::error::{ApiError, ErrorCode};
use crate::middleware::{create_rate_limiter, KeyedRateLimiter};
use aws_config::{BehaviorVersion, Region};
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use todo_core::{DynamoTodoStore, FlexibleTodoStore, MemoryTodoStore, S3UploadSigner, TodoService};
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Bearer token verification
    pub authorizer: Authorizer,
    /// Todo operations over the configured store and bucket
    pub todos: TodoService<FlexibleTodoStore>,
    /// Per-user request throttling
    pub rate_limiter: Arc<KeyedRateLimiter>,
}

impl AppState {
    /// Create application state from configuration, connecting to AWS
    pub async fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let authorizer = Authorizer::from_config(&config)?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.aws_region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let store = if config.use_memory_store {
            info!("Using in-memory todo store (data will not persist)");
            FlexibleTodoStore::Memory(MemoryTodoStore::new())
        } else {
            info!(table = %config.todos_table, "Using DynamoDB todo store");
            FlexibleTodoStore::DynamoDb(DynamoTodoStore::from_sdk_config(
                &sdk_config,
                config.todos_table.clone(),
            ))
        };

        if store.is_persistent() {
            info!("✓ Storage mode: DynamoDB (persistent)");
        } else {
            warn!("⚠ Storage mode: In-memory (NOT persistent - for development only)");
        }

        let signer = S3UploadSigner::from_sdk_config(
            &sdk_config,
            config.attachments_bucket.clone(),
            config.attachments_endpoint.clone(),
            config.upload_url_expiry(),
        );
        info!(bucket = %signer.bucket(), "Attachment uploads configured");

        let todos = TodoService::new(Arc::new(store), Arc::new(signer));
        Ok(Self::from_parts(config, authorizer, todos))
    }

    /// Assemble state from already-built components
    pub fn from_parts(
        config: GatewayConfig,
        authorizer: Authorizer,
        todos: TodoService<FlexibleTodoStore>,
    ) -> Self {
        let rate_limiter = create_rate_limiter(config.rate_limit_rps);
        Self {
            config,
            authorizer,
            todos,
            rate_limiter,
        }
    }
}

/// The authenticated caller of a request
#[derive(Clone, Debug)]
pub struct Principal {
    /// Owner identifier (token subject)
    pub user_id: String,
    /// Expiration time of the presented token
    pub expires_at: DateTime<Utc>,
}

impl Principal {
    /// Principal for a verified token
    pub fn from_claims(claims: &VerifiedClaims) -> Self {
        Self {
            user_id: claims.subject().to_string(),
            expires_at: claims.expires_at(),
        }
    }

    /// Create a development/test principal
    pub fn dev() -> Self {
        Self {
            user_id: "dev-user".to_string(),
            expires_at: Utc::now() + Duration::days(365),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Principal>().cloned().ok_or_else(|| {
            ApiError::new(ErrorCode::MissingAuthentication, "Unauthorized")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_principal_extractor_requires_extension() {
        let (mut parts, _) = Request::new(()).into_parts();

        let result = Principal::from_request_parts(&mut parts, &()).await;
        assert!(matches!(
            result.map_err(|e| e.error_code()),
            Err(ErrorCode::MissingAuthentication)
        ));

        parts.extensions.insert(Principal::dev());
        let principal = Principal::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(principal.user_id, "dev-user");
        assert!(principal.expires_at > Utc::now());
    }
}
