//! JSON report generation

use crate::{CoreResult, ReviewBatch};

pub fn generate(batch: &ReviewBatch) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(batch)?)
}
