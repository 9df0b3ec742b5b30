//! Progress reporting path from a running converter back to the store.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::store::ConversionStore;

/// Receiver for converter progress reports.
///
/// Converters call this with non-decreasing integers in [0, 100]; the sink
/// decides where the value goes. Passed by reference through the dispatch
/// chain so nested calls share one reporting path.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, percent: u8);
}

/// Sink that writes progress into the store for a single running job.
pub struct StoreProgress {
    store: Arc<ConversionStore>,
    job_id: Uuid,
}

impl StoreProgress {
    pub fn new(store: Arc<ConversionStore>, job_id: Uuid) -> Self {
        Self { store, job_id }
    }
}

#[async_trait]
impl ProgressSink for StoreProgress {
    async fn report(&self, percent: u8) {
        self.store.update_progress(self.job_id, percent).await;
    }
}

/// Sink that discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl ProgressSink for NullSink {
    async fn report(&self, _percent: u8) {}
}
