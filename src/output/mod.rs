pub mod formatter;

pub use formatter::{
    format_breakdown, format_detail, format_ranked_table, format_score, format_tsv,
    should_use_colors,
};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::path::Path;

use crate::rank::RankOutcome;

/// Caller-facing shape of a ranking pass.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub ranked: Vec<RankedItem>,
    pub information_requests: Vec<String>,
    pub explanations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedItem {
    pub requirement: String,
    pub score: f64,
    pub explanation: String,
    pub narrative: String,
}

pub fn to_response(outcome: &RankOutcome) -> RankResponse {
    RankResponse {
        ranked: outcome
            .ranked
            .iter()
            .map(|item| RankedItem {
                requirement: item.requirement.clone(),
                score: item.score,
                explanation: item.explanation.clone(),
                narrative: item.narrative.clone(),
            })
            .collect(),
        information_requests: outcome.information_requests.clone(),
        explanations: outcome.explanations.clone(),
    }
}

pub fn format_json(response: &RankResponse) -> Result<String> {
    serde_json::to_string_pretty(response).context("Failed to serialize ranking")
}

/// Save the JSON response atomically, so a reader never sees a partial file
pub fn write_response(path: &Path, response: &RankResponse) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, response).context("Failed to serialize ranking")?;

    file.commit()
        .with_context(|| format!("Failed to save ranking to {}", path.display()))?;

    Ok(())
}
