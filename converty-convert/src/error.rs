//! Converter errors, normalized into failed outcomes by the dispatcher.

use thiserror::Error;

/// Errors that may occur while converting a source file.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The requested target format is not offered for the category.
    #[error("Unsupported image target: {0}")]
    UnsupportedTarget(String),

    /// A required input was missing or empty.
    #[error("{0}")]
    MissingInput(String),

    /// The category (or sub-operation) has no working integration.
    #[error("{0}")]
    Unavailable(String),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("pdf assembly error: {0}")]
    Pdf(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
