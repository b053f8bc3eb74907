//! Server startup and lifecycle

use crate::middleware::{spawn_rate_limiter_pruning, RATE_LIMIT_PRUNE_INTERVAL};
use crate::{routes, AppState, GatewayConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Environment variable set by the Lambda runtime
const LAMBDA_RUNTIME_API: &str = "AWS_LAMBDA_RUNTIME_API";

/// Check whether the process runs inside AWS Lambda
pub fn running_in_lambda() -> bool {
    std::env::var_os(LAMBDA_RUNTIME_API).is_some()
}

/// Run the gateway server until `shutdown_signal` resolves
pub async fn run_server(
    config: GatewayConfig,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.clone()).await?);
    spawn_rate_limiter_pruning(&state.rate_limiter, RATE_LIMIT_PRUNE_INTERVAL);
    let app = routes::create_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 Todo API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("👋 Todo API shutdown complete");

    Ok(())
}

/// Serve the same router through the Lambda runtime (API Gateway proxy events)
pub async fn run_lambda(config: GatewayConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config).await?);
    spawn_rate_limiter_pruning(&state.rate_limiter, RATE_LIMIT_PRUNE_INTERVAL);
    let app = routes::create_router(state);

    info!("Todo API handling requests through the Lambda runtime");

    lambda_http::run(app)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

/// Resolve on Ctrl-C
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
