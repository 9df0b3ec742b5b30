//! Dispatch seam between the queue runner and converter implementations.

use async_trait::async_trait;

use crate::progress::ProgressSink;
use crate::types::{ConversionJob, ConversionOutcome};

/// Routes a claimed job to the converter for its category.
///
/// Implementations must resolve every failure mode into a
/// [`ConversionOutcome::Failure`] value; nothing may escape this boundary
/// as an error.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, job: &ConversionJob, sink: &dyn ProgressSink) -> ConversionOutcome;
}

/// Dispatcher that succeeds every job immediately without converting.
///
/// Useful for tests or for wiring the queue together before real
/// converters are registered.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDispatch;

#[async_trait]
impl Dispatch for NoOpDispatch {
    async fn dispatch(&self, job: &ConversionJob, sink: &dyn ProgressSink) -> ConversionOutcome {
        sink.report(100).await;
        ConversionOutcome::success(job.request.source_uri.clone())
    }
}
