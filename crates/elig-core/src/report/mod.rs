//! Report generation

pub mod json;
pub mod markdown;

use crate::CoreResult;
use crate::ReviewBatch;

/// Report format
pub enum ReportFormat {
    Json,
    Markdown,
}

/// Generate a report in the specified format
pub fn generate_report(batch: &ReviewBatch, format: ReportFormat) -> CoreResult<String> {
    match format {
        ReportFormat::Json => json::generate(batch),
        ReportFormat::Markdown => markdown::generate(batch),
    }
}
