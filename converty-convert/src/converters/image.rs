//! Image re-encoding converter.

use std::io::Cursor;

use async_trait::async_trait;
use converty_queue::{ConversionCategory, ConversionJob, ConversionParams, ProgressSink};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::converter::Converter;
use crate::error::ConvertError;
use crate::workspace::OutputWorkspace;

const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Re-encodes a source image into jpg, png or webp.
pub struct ImageConverter {
    workspace: OutputWorkspace,
    default_quality: u8,
}

impl ImageConverter {
    pub fn new(workspace: OutputWorkspace) -> Self {
        Self {
            workspace,
            default_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Use `quality` when a job carries no explicit quality parameter.
    pub fn with_default_quality(workspace: OutputWorkspace, quality: u8) -> Self {
        Self {
            workspace,
            default_quality: quality,
        }
    }
}

fn map_target(target: &str) -> Option<ImageFormat> {
    match target {
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "png" => Some(ImageFormat::Png),
        "webp" => Some(ImageFormat::WebP),
        _ => None,
    }
}

#[async_trait]
impl Converter for ImageConverter {
    fn category(&self) -> ConversionCategory {
        ConversionCategory::Image
    }

    async fn convert(
        &self,
        job: &ConversionJob,
        sink: &dyn ProgressSink,
    ) -> Result<String, ConvertError> {
        let target = job.request.target_format.to_ascii_lowercase();
        let format = map_target(&target)
            .ok_or_else(|| ConvertError::UnsupportedTarget(job.request.target_format.clone()))?;
        sink.report(20).await;

        let bytes = tokio::fs::read(&job.request.source_uri).await?;
        let decoded = image::load_from_memory(&bytes)?;
        // JPEG has no alpha channel.
        let decoded = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(decoded.to_rgb8())
        } else {
            decoded
        };

        let quality = match &job.request.params {
            ConversionParams::Image(p) => p.quality.unwrap_or(self.default_quality),
            _ => self.default_quality,
        };

        let mut encoded = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut encoded), quality);
                decoded.write_with_encoder(encoder)?;
            }
            _ => {
                decoded.write_to(&mut Cursor::new(&mut encoded), format)?;
            }
        }
        sink.report(70).await;

        let output = self
            .workspace
            .output_path(&job.request.source_name, job.id(), &target);
        tokio::fs::write(&output, &encoded).await?;
        sink.report(100).await;

        debug!(job_id = %job.id(), output = %output.display(), "image re-encoded");
        Ok(output.to_string_lossy().into_owned())
    }
}
