//! HTTP route definitions

use crate::{handlers, middleware, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Authenticated todo endpoints
    let api = Router::new()
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/{todo_id}",
            patch(handlers::update_todo).delete(handlers::delete_todo),
        )
        .route(
            "/todos/{todo_id}/attachment",
            post(handlers::generate_upload_url),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn_with_state(
                    Arc::clone(&state),
                    middleware::auth_middleware,
                ))
                .layer(axum_middleware::from_fn_with_state(
                    Arc::clone(&state),
                    middleware::rate_limit_middleware,
                )),
        );

    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .merge(api)
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id_middleware))
                .layer(axum_middleware::from_fn(middleware::logging_middleware)),
        );

    if state.config.cors_enabled {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(state.config.max_body_size))
                .layer(CompressionLayer::new())
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
