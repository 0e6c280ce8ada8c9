//! Output reporters for evaluation results
//!
//! Supports multiple output formats:
//! - `text` - The plain rubric report (overall score, category scores,
//!   strengths, weaknesses, numbered recommendations)
//! - `json` - Machine-readable JSON
//! - `markdown` - GitHub-flavored Markdown
//!
//! Rendering is a pure transform of an `EvaluationReport`; writing the
//! result anywhere is up to the caller.

mod json;
mod markdown;
mod recommendations;
mod text;

pub use recommendations::{build_recommendations, Recommendation, DEFAULT_RECOMMENDATION_CAP};

use crate::models::EvaluationReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Renders an `EvaluationReport` in one format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportBuilder {
    /// Maximum recommendations per category
    pub recommendation_cap: usize,
    pub format: OutputFormat,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self {
            recommendation_cap: DEFAULT_RECOMMENDATION_CAP,
            format: OutputFormat::Text,
        }
    }
}

impl ReportBuilder {
    pub fn new(format: OutputFormat, recommendation_cap: usize) -> Self {
        Self {
            recommendation_cap,
            format,
        }
    }

    /// Render the report
    pub fn build(&self, report: &EvaluationReport) -> Result<String> {
        let recommendations = build_recommendations(report, self.recommendation_cap);
        match self.format {
            OutputFormat::Text => Ok(text::render(report, &recommendations)),
            OutputFormat::Json => json::render(report, &recommendations),
            OutputFormat::Markdown => Ok(markdown::render(report, &recommendations)),
        }
    }
}
