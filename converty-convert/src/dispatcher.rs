//! Routes a job to the converter matching its category.

use std::collections::HashMap;
use std::sync::Arc;

use converty_queue::{
    async_trait, ConversionCategory, ConversionJob, ConversionOutcome, Dispatch, ProgressSink,
};
use tracing::{debug, warn};

use crate::converter::Converter;
use crate::workspace::OutputWorkspace;

/// Maps a job's category to the registered converter and normalizes the
/// converter's result into a [`ConversionOutcome`].
///
/// Every failure mode - missing registration, converter error, output
/// directory trouble - resolves to a failed outcome; nothing escapes this
/// boundary as an error.
pub struct Dispatcher {
    converters: HashMap<ConversionCategory, Arc<dyn Converter>>,
    workspace: OutputWorkspace,
}

impl Dispatcher {
    pub fn new(workspace: OutputWorkspace) -> Self {
        Self {
            converters: HashMap::new(),
            workspace,
        }
    }

    pub fn workspace(&self) -> &OutputWorkspace {
        &self.workspace
    }

    /// Register a converter for its category, replacing any previous one.
    pub fn register<C: Converter + 'static>(&mut self, converter: C) {
        self.converters
            .insert(converter.category(), Arc::new(converter));
    }
}

#[async_trait]
impl Dispatch for Dispatcher {
    async fn dispatch(&self, job: &ConversionJob, sink: &dyn ProgressSink) -> ConversionOutcome {
        if let Err(e) = self.workspace.ensure().await {
            return ConversionOutcome::failure(format!("io error: {e}"));
        }
        sink.report(5).await;

        let category = job.request.category;
        let Some(converter) = self.converters.get(&category) else {
            warn!(job_id = %job.id(), %category, "no converter registered");
            return ConversionOutcome::failure(format!(
                "No converter registered for category: {category}"
            ));
        };

        debug!(
            job_id = %job.id(),
            %category,
            target = %job.request.target_format,
            "dispatching conversion"
        );
        match converter.convert(job, sink).await {
            Ok(output_uri) => ConversionOutcome::success(output_uri),
            Err(e) => ConversionOutcome::failure(e.to_string()),
        }
    }
}
