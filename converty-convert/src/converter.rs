//! Converter capability trait.

use async_trait::async_trait;
use converty_queue::{ConversionCategory, ConversionJob, ProgressSink};

use crate::error::ConvertError;

/// A category-specific conversion capability.
///
/// Implementations report progress as non-decreasing integers in [0, 100]
/// through the sink, and surface every failure as a [`ConvertError`]; the
/// dispatcher turns those into failed outcomes before they reach the queue.
#[async_trait]
pub trait Converter: Send + Sync {
    /// The category this converter handles.
    fn category(&self) -> ConversionCategory;

    /// Convert the job's source into its target format and return the
    /// output file location.
    async fn convert(
        &self,
        job: &ConversionJob,
        sink: &dyn ProgressSink,
    ) -> Result<String, ConvertError>;
}
