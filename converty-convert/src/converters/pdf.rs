//! Image-to-PDF assembly converter.

use async_trait::async_trait;
use converty_queue::{ConversionCategory, ConversionJob, ConversionParams, ProgressSink};
use printpdf::image_crate::{self, GenericImageView};
use printpdf::{Image, ImageTransform, Mm, PdfDocument, PdfDocumentReference, Pt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::converter::Converter;
use crate::error::ConvertError;
use crate::workspace::OutputWorkspace;

// Images are placed at 72 dpi, so one source pixel maps to exactly one PDF
// point and each page matches its image's pixel dimensions.
const EMBED_DPI: f32 = 72.0;

/// Assembles the supplied images into a PDF, one page per image.
///
/// The `images` and `split` targets are recognized but have no working
/// integration and fail immediately.
pub struct PdfConverter {
    workspace: OutputWorkspace,
}

impl PdfConverter {
    pub fn new(workspace: OutputWorkspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Converter for PdfConverter {
    fn category(&self) -> ConversionCategory {
        ConversionCategory::Pdf
    }

    async fn convert(
        &self,
        job: &ConversionJob,
        sink: &dyn ProgressSink,
    ) -> Result<String, ConvertError> {
        match job.request.target_format.to_ascii_lowercase().as_str() {
            "images" => {
                return Err(ConvertError::Unavailable(
                    "PDF to images conversion is not available; no page rasterizer is integrated.".into(),
                ))
            }
            "split" => {
                return Err(ConvertError::Unavailable(
                    "PDF splitting is not available; no page-extraction integration is configured.".into(),
                ))
            }
            _ => {}
        }

        let images = match &job.request.params {
            ConversionParams::Pdf(p) if !p.images.is_empty() => &p.images,
            _ => {
                return Err(ConvertError::MissingInput(
                    "No images supplied for PDF creation.".into(),
                ))
            }
        };

        let mut sources = Vec::with_capacity(images.len());
        for source in images {
            let bytes = tokio::fs::read(&source.uri).await?;
            sources.push((source.name.clone(), bytes));
        }

        // printpdf documents are not Send, so assembly happens on a blocking
        // thread with per-page progress forwarded over a channel.
        let (tx, mut rx) = mpsc::unbounded_channel();
        let title = job.request.source_name.clone();
        let assemble = tokio::task::spawn_blocking(move || assemble_pdf(&title, sources, tx));
        while let Some(percent) = rx.recv().await {
            sink.report(percent).await;
        }
        let bytes = assemble
            .await
            .map_err(|e| ConvertError::Pdf(format!("assembly task failed: {e}")))??;

        let output = self
            .workspace
            .output_path(&job.request.source_name, job.id(), "pdf");
        tokio::fs::write(&output, bytes).await?;
        sink.report(100).await;

        debug!(job_id = %job.id(), pages = images.len(), output = %output.display(), "pdf assembled");
        Ok(output.to_string_lossy().into_owned())
    }
}

/// One page per image, each page sized exactly to its image's pixel
/// dimensions. Reports `round(processed / total * 90)` after each page,
/// leaving the last 10% for the write step.
fn assemble_pdf(
    title: &str,
    images: Vec<(String, Vec<u8>)>,
    progress: mpsc::UnboundedSender<u8>,
) -> Result<Vec<u8>, ConvertError> {
    let total = images.len();
    let mut doc: Option<PdfDocumentReference> = None;

    for (index, (name, bytes)) in images.into_iter().enumerate() {
        let decoded = image_crate::load_from_memory(&bytes)
            .map_err(|e| ConvertError::Pdf(format!("could not decode {name}: {e}")))?;
        let (width_px, height_px) = decoded.dimensions();
        let width = Mm::from(Pt(width_px as f32));
        let height = Mm::from(Pt(height_px as f32));

        let layer = match &doc {
            None => {
                let (created, page, layer) = PdfDocument::new(title, width, height, "Page 1");
                let reference = created.get_page(page).get_layer(layer);
                doc = Some(created);
                reference
            }
            Some(existing) => {
                let (page, layer) =
                    existing.add_page(width, height, format!("Page {}", index + 1));
                existing.get_page(page).get_layer(layer)
            }
        };

        Image::from_dynamic_image(&decoded).add_to_layer(
            layer,
            ImageTransform {
                dpi: Some(EMBED_DPI),
                ..ImageTransform::default()
            },
        );

        let percent = (((index + 1) as f64 / total as f64) * 90.0).round() as u8;
        let _ = progress.send(percent);
    }

    match doc {
        Some(doc) => doc
            .save_to_bytes()
            .map_err(|e| ConvertError::Pdf(e.to_string())),
        None => Err(ConvertError::MissingInput(
            "No images supplied for PDF creation.".into(),
        )),
    }
}
