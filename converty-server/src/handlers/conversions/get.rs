use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::Json;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::conversions::job_json;
use crate::state::AppState;

/// GET /conversions/{id}
pub async fn get_one(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let job = state
        .store
        .get(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("conversion {id} not found")))?;

    Ok(Json(job_json(&job)))
}
