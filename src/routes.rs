use axum::{Router, middleware, routing::any};
use axum_tracing_opentelemetry::middleware::{OtelAxumLayer, OtelInResponseLayer};

use crate::{
    handlers::{dispatch, not_found},
    state::AppState,
    telemetry::track_requests,
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/users", any(dispatch))
        .route("/users/{*rest}", any(dispatch))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(OtelInResponseLayer::default())
        .layer(OtelAxumLayer::default())
        .with_state(state)
}
