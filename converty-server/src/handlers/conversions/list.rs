use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::conversions::job_json;
use crate::state::AppState;

/// GET /conversions
/// Snapshot of all jobs in enqueue order.
pub async fn list(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let jobs = state.store.jobs().await;
    let items: Vec<Value> = jobs.iter().map(job_json).collect();

    Ok(Json(json!({
        "items": items,
        "total": jobs.len(),
    })))
}
