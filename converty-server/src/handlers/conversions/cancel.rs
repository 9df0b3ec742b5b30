use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::Json;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::conversions::job_json;
use crate::state::AppState;

/// POST /conversions/{id}/cancel
/// Withdraw a job that has not started yet. Running and finished jobs are
/// rejected with a conflict.
pub async fn cancel(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let job = state.store.cancel(id).await?;
    Ok(Json(job_json(&job)))
}
