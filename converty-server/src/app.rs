use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::conversions;
use crate::state::AppState;

/// Build the primary axum router with the provided shared application state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/conversions",
            post(conversions::enqueue::enqueue).get(conversions::list::list),
        )
        .route(
            "/conversions/completed",
            delete(conversions::clear::clear_completed),
        )
        .route("/conversions/{id}", get(conversions::get::get_one))
        .route("/conversions/{id}/cancel", post(conversions::cancel::cancel))
        .route("/health", get(health_handler))
        .layer(Extension(state))
}

async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
