//! Audio and video conversion stub.

use async_trait::async_trait;
use converty_queue::{ConversionCategory, ConversionJob, ProgressSink};
use tracing::warn;

use crate::converter::Converter;
use crate::error::ConvertError;

/// Placeholder converter for the audio and video categories.
///
/// There is no bundled FFmpeg integration, so every media job fails with a
/// descriptive message. Progress is driven to 100 first so the job settles
/// into its terminal state promptly instead of looking stalled.
pub struct MediaConverter {
    category: ConversionCategory,
}

impl MediaConverter {
    pub fn new(category: ConversionCategory) -> Self {
        Self { category }
    }
}

#[async_trait]
impl Converter for MediaConverter {
    fn category(&self) -> ConversionCategory {
        self.category
    }

    async fn convert(
        &self,
        job: &ConversionJob,
        sink: &dyn ProgressSink,
    ) -> Result<String, ConvertError> {
        warn!(job_id = %job.id(), category = %self.category, "media conversion requested without an FFmpeg integration");
        sink.report(100).await;
        Err(ConvertError::Unavailable(format!(
            "Audio/video conversion requires FFmpeg. Install an FFmpeg integration and register a {} converter with the dispatcher.",
            self.category
        )))
    }
}

#[cfg(test)]
mod tests {
    use converty_queue::{ConversionJob, ConversionRequest, NullSink};

    use super::*;

    #[tokio::test]
    async fn media_jobs_always_fail_with_guidance() {
        let converter = MediaConverter::new(ConversionCategory::Audio);
        let job = ConversionJob::new(ConversionRequest::new(
            "file:///tmp/song.mp3",
            "song.mp3",
            ConversionCategory::Audio,
            "wav",
        ));

        let err = converter.convert(&job, &NullSink).await.unwrap_err();
        assert!(err.to_string().contains("FFmpeg"));
    }
}
