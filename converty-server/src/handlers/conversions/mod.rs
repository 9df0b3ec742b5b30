pub mod cancel;
pub mod clear;
pub mod enqueue;
pub mod get;
pub mod list;

use converty_queue::ConversionJob;
use serde_json::{json, Value};

/// Serialize a job for API responses.
pub(crate) fn job_json(job: &ConversionJob) -> Value {
    json!({
        "id": job.id(),
        "sourceUri": job.request.source_uri,
        "sourceName": job.request.source_name,
        "category": job.request.category,
        "targetFormat": job.request.target_format,
        "state": job.state.to_string(),
        "progress": job.progress,
        "outputUri": job.output_uri,
        "error": job.error,
        "createdAt": job.created_at.to_rfc3339(),
        "completedAt": job.completed_at.map(|dt| dt.to_rfc3339()),
    })
}
