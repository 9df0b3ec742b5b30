//! Error types for the conversion queue.

use thiserror::Error;
use uuid::Uuid;

use crate::types::JobState;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("job not found: {0}")]
    NotFound(Uuid),

    #[error("job {id} cannot be cancelled in state {state}")]
    NotCancellable { id: Uuid, state: JobState },
}
