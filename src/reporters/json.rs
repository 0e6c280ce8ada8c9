//! JSON reporter
//!
//! Outputs the full EvaluationReport plus the rendered recommendations as
//! pretty-printed JSON. Useful for piping to jq or for dashboards.

use super::Recommendation;
use crate::models::EvaluationReport;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a EvaluationReport,
    recommendations: &'a [Recommendation],
}

/// Render report as JSON
pub fn render(report: &EvaluationReport, recommendations: &[Recommendation]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport {
        report,
        recommendations,
    })?)
}
