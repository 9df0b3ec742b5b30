use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// DELETE /conversions/completed
/// Drop all completed jobs from the list.
pub async fn clear_completed(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    state.store.clear_completed().await;
    Ok(Json(json!({ "cleared": true })))
}
