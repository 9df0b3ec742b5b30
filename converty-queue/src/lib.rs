//! In-memory conversion job queue with a single-worker runner.
//!
//! This crate holds the core of the conversion engine: the job entity and
//! its state machine, the ordered in-memory store, the progress path from a
//! running converter back to the store, and the drain loop that executes
//! jobs strictly one at a time in enqueue order.
//!
//! # Architecture
//!
//! - [`ConversionStore`] - ordered job list; owns every state transition
//! - [`QueueRunner`] - single-worker drain loop with a reentrancy guard
//! - [`Dispatch`] - seam to the converter registry (implemented elsewhere)
//! - [`ProgressSink`] - one-method reporting path for running converters
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use converty_queue::{
//!     ConversionCategory, ConversionRequest, ConversionStore, NoOpDispatch, QueueRunner,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(ConversionStore::new());
//!     let runner = QueueRunner::new(Arc::clone(&store), Arc::new(NoOpDispatch));
//!
//!     store
//!         .enqueue(ConversionRequest::new(
//!             "file:///tmp/notes.txt",
//!             "notes.txt",
//!             ConversionCategory::Text,
//!             "csv",
//!         ))
//!         .await;
//!
//!     runner.drain().await;
//! }
//! ```

mod dispatch;
mod error;
mod progress;
mod runner;
mod store;
mod types;

pub use dispatch::{Dispatch, NoOpDispatch};
pub use error::QueueError;
pub use progress::{NullSink, ProgressSink, StoreProgress};
pub use runner::QueueRunner;
pub use store::ConversionStore;
pub use types::{
    ConversionCategory, ConversionJob, ConversionOutcome, ConversionParams, ConversionRequest,
    ImageParams, JobState, PdfParams, SourceRef,
};

// Re-export async_trait for convenience when implementing Dispatch or
// ProgressSink.
pub use async_trait::async_trait;
