use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use converty_convert::{infer_descriptor, supports_target};
use converty_queue::{ConversionCategory, ConversionParams, ConversionRequest};

use crate::error::ApiError;
use crate::handlers::conversions::job_json;
use crate::state::AppState;

/// Request body for POST /conversions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueBody {
    pub source_uri: String,
    pub source_name: String,
    /// Inferred from the source name's extension when absent.
    #[serde(default)]
    pub category: Option<ConversionCategory>,
    pub target_format: String,
    #[serde(default)]
    pub params: ConversionParams,
}

/// POST /conversions
/// Validate the target against the conversion matrix, enqueue the job and
/// wake the runner.
pub async fn enqueue(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<EnqueueBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if body.source_uri.trim().is_empty() {
        return Err(ApiError::bad_request("sourceUri must not be empty"));
    }

    let category = body.category.unwrap_or_else(|| {
        let extension = std::path::Path::new(&body.source_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        infer_descriptor(extension).category
    });
    if !supports_target(category, &body.target_format) {
        return Err(ApiError::bad_request(format!(
            "unsupported target format {} for category {}",
            body.target_format, category
        )));
    }

    let request = ConversionRequest::new(
        body.source_uri,
        body.source_name,
        category,
        body.target_format.to_ascii_lowercase(),
    )
    .with_params(body.params);

    let job = state.store.enqueue(request).await;
    state.runner.kick();

    Ok((StatusCode::ACCEPTED, Json(job_json(&job))))
}
