//! Core types for the conversion queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of conversion categories a job can belong to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConversionCategory {
    Image,
    Audio,
    Video,
    Pdf,
    Text,
}

impl std::fmt::Display for ConversionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Pdf => "pdf",
            Self::Text => "text",
        })
    }
}

/// Reference to a user-selected source file, as produced by the picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    pub name: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Options for image re-encoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageParams {
    /// Encoder quality in [0, 100]; converters fall back to their own
    /// default when absent.
    #[serde(default)]
    pub quality: Option<u8>,
}

/// Inputs for image-to-PDF assembly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PdfParams {
    /// Images to embed, one page each, in order.
    #[serde(default)]
    pub images: Vec<SourceRef>,
}

/// Category-specific converter options.
///
/// Each variant carries only the parameters its category's converter
/// understands. A variant that does not match the job's category is treated
/// as absent by the converters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConversionParams {
    #[default]
    None,
    Image(ImageParams),
    Pdf(PdfParams),
}

/// Immutable description of one requested conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub id: Uuid,
    pub source_uri: String,
    pub source_name: String,
    pub category: ConversionCategory,
    pub target_format: String,
    #[serde(default)]
    pub params: ConversionParams,
}

impl ConversionRequest {
    pub fn new(
        source_uri: impl Into<String>,
        source_name: impl Into<String>,
        category: ConversionCategory,
        target_format: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_uri: source_uri.into(),
            source_name: source_name.into(),
            category,
            target_format: target_format.into(),
            params: ConversionParams::None,
        }
    }

    pub fn with_params(mut self, params: ConversionParams) -> Self {
        self.params = params;
        self
    }
}

/// Lifecycle state of a conversion job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    /// Returns true once no further transitions can occur.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Normalized result of one conversion attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConversionOutcome {
    Success { output_uri: String },
    Failure { error: String },
}

impl ConversionOutcome {
    #[inline]
    pub fn success(output_uri: impl Into<String>) -> Self {
        Self::Success {
            output_uri: output_uri.into(),
        }
    }

    #[inline]
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A conversion request together with its mutable execution state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    #[serde(flatten)]
    pub request: ConversionRequest,
    pub state: JobState,
    /// Completion percentage in [0, 100], non-decreasing while running.
    pub progress: u8,
    pub output_uri: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ConversionJob {
    /// Create a new queued job from a request.
    pub fn new(request: ConversionRequest) -> Self {
        Self {
            request,
            state: JobState::Queued,
            progress: 0,
            output_uri: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.request.id
    }

    /// Mark the job as running with the uniform "started" progress.
    pub(crate) fn claim(&mut self) {
        self.state = JobState::Running;
        self.progress = 5;
    }

    /// Terminal transition on success.
    pub(crate) fn complete(&mut self, output_uri: String) {
        self.state = JobState::Completed;
        self.progress = 100;
        self.output_uri = Some(output_uri);
        self.completed_at = Some(Utc::now());
    }

    /// Terminal transition on failure. Progress stays at its last value.
    pub(crate) fn fail(&mut self, error: String) {
        self.state = JobState::Failed;
        self.error = Some(error);
        self.completed_at = Some(Utc::now());
    }

    /// Terminal transition for a job withdrawn before it ran.
    pub(crate) fn cancel(&mut self) {
        self.state = JobState::Cancelled;
        self.completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_state_terminality() {
        assert!(!JobState::Queued.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
    }

    #[test]
    fn request_serializes_with_lowercase_category() {
        let request = ConversionRequest::new(
            "file:///tmp/photo.png",
            "photo.png",
            ConversionCategory::Image,
            "jpg",
        );
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["category"], "image");
        assert_eq!(value["target_format"], "jpg");
    }

    #[test]
    fn params_default_to_none() {
        let request = ConversionRequest::new(
            "file:///tmp/a.txt",
            "a.txt",
            ConversionCategory::Text,
            "csv",
        );
        assert_eq!(request.params, ConversionParams::None);
    }
}
