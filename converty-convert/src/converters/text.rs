//! Plain-text transforms.

use async_trait::async_trait;
use converty_queue::{ConversionCategory, ConversionJob, ProgressSink};
use serde::Serialize;

use crate::converter::Converter;
use crate::error::ConvertError;
use crate::workspace::OutputWorkspace;

/// Transforms text sources into csv, json, or a plain copy.
pub struct TextConverter {
    workspace: OutputWorkspace,
}

impl TextConverter {
    pub fn new(workspace: OutputWorkspace) -> Self {
        Self { workspace }
    }
}

/// One row of the text-to-json output. Field declaration order is the
/// serialized order.
#[derive(Debug, Serialize)]
struct TextRow {
    id: usize,
    value: String,
}

#[async_trait]
impl Converter for TextConverter {
    fn category(&self) -> ConversionCategory {
        ConversionCategory::Text
    }

    async fn convert(
        &self,
        job: &ConversionJob,
        sink: &dyn ProgressSink,
    ) -> Result<String, ConvertError> {
        let input = tokio::fs::read_to_string(&job.request.source_uri).await?;
        sink.report(25).await;

        let target = job.request.target_format.to_ascii_lowercase();
        let output = match target.as_str() {
            "csv" => text_to_csv(&input),
            "json" => text_to_json(&input)?,
            _ => input,
        };
        sink.report(75).await;

        let path = self
            .workspace
            .output_path(&job.request.source_name, job.id(), &target);
        tokio::fs::write(&path, output).await?;
        sink.report(100).await;

        Ok(path.to_string_lossy().into_owned())
    }
}

/// Non-blank trimmed lines, with internal whitespace runs collapsed to
/// single commas.
fn text_to_csv(input: &str) -> String {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Non-blank trimmed lines as an ordered array of `{id, value}` rows.
fn text_to_json(input: &str) -> Result<String, serde_json::Error> {
    let rows: Vec<TextRow> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| TextRow {
            id: index + 1,
            value: line.to_string(),
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}
