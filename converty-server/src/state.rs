use std::sync::Arc;

use converty_queue::{ConversionStore, QueueRunner};

/// Shared application state passed to every route handler.
///
/// The store and runner are built once by `main` (the composition root) and
/// injected here; nothing else owns queue state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConversionStore>,
    pub runner: Arc<QueueRunner>,
}

impl AppState {
    pub fn new(store: Arc<ConversionStore>, runner: Arc<QueueRunner>) -> Self {
        Self { store, runner }
    }
}
