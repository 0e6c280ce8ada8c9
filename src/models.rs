//! Core data models for stylegrade
//!
//! These models are shared by the rules, the scoring pipeline and the
//! reporters: rubric categories, locations, findings and scores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Generate a deterministic finding ID based on content hash.
///
/// The ID is a 16-character hex string derived from the rule id, the file,
/// the first line and the message, so identical inputs always produce
/// identical reports.
pub fn deterministic_finding_id(rule_id: &str, file: &Path, line: Option<u32>, message: &str) -> String {
    let input = format!(
        "{rule_id}\n{}\n{}\n{message}",
        file.display(),
        line.unwrap_or(0)
    );
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

/// Round a score to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The ten rubric dimensions, in declaration order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Layout,
    Naming,
    FunctionDesign,
    ClassDesign,
    ErrorHandling,
    Configuration,
    Testing,
    Logging,
    Performance,
    VersionControl,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 10] = [
        Category::Layout,
        Category::Naming,
        Category::FunctionDesign,
        Category::ClassDesign,
        Category::ErrorHandling,
        Category::Configuration,
        Category::Testing,
        Category::Logging,
        Category::Performance,
        Category::VersionControl,
    ];

    /// Position in declaration order (0-based)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name used in reports
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Layout => "Layout & Formatting",
            Category::Naming => "Naming Conventions",
            Category::FunctionDesign => "Function Design",
            Category::ClassDesign => "Class Design",
            Category::ErrorHandling => "Error Handling",
            Category::Configuration => "Configuration & Modularity",
            Category::Testing => "Testing",
            Category::Logging => "Logging",
            Category::Performance => "Performance",
            Category::VersionControl => "Version Control",
        }
    }

    /// Config key (`function_design`, `error_handling`, ...)
    pub fn key(self) -> &'static str {
        match self {
            Category::Layout => "layout",
            Category::Naming => "naming",
            Category::FunctionDesign => "function_design",
            Category::ClassDesign => "class_design",
            Category::ErrorHandling => "error_handling",
            Category::Configuration => "configuration",
            Category::Testing => "testing",
            Category::Logging => "logging",
            Category::Performance => "performance",
            Category::VersionControl => "version_control",
        }
    }

    /// Parse a config key or display name (case-insensitive)
    pub fn parse(s: &str) -> Option<Category> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Category::ALL
            .into_iter()
            .find(|c| c.key() == normalized || c.display_name().to_lowercase() == s.trim().to_lowercase())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A place in the evaluated codebase
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path relative to the snapshot root; the root itself for codebase-level locations
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_end: Option<u32>,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, line_start: Option<u32>, line_end: Option<u32>) -> Self {
        Self {
            file: file.into(),
            line_start,
            line_end,
        }
    }

    /// A location covering the whole snapshot
    pub fn codebase(root: &Path) -> Self {
        Self::new(root, None, None)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line_start, self.line_end) {
            (Some(start), Some(end)) if end > start => {
                write!(f, "{}:{}-{}", self.file.display(), start, end)
            }
            (Some(start), _) => write!(f, "{}:{}", self.file.display(), start),
            _ => write!(f, "{}", self.file.display()),
        }
    }
}

/// Why a finding was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// A fact failed the rule's check
    #[default]
    Violation,
    /// The rule itself failed and was scored 0
    RuleFailure,
    /// Nothing in the category was measurable
    Vacuous,
}

/// A located explanation attached to an imperfect rule result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub rule_id: String,
    pub category: Category,
    pub kind: FindingKind,
    pub location: Location,
    pub message: String,
    /// Advice used to build the recommendation sentence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn new(
        rule_id: &str,
        category: Category,
        kind: FindingKind,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        Self {
            id: deterministic_finding_id(rule_id, &location.file, location.line_start, &message),
            rule_id: rule_id.to_string(),
            category,
            kind,
            location,
            message,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Whether the finding should produce a recommendation
    pub fn is_actionable(&self) -> bool {
        !matches!(self.kind, FindingKind::Vacuous)
    }
}

/// Outcome of evaluating one rule against one fact model
#[derive(Debug, Clone, PartialEq)]
pub struct RuleResult {
    /// 1.0 = fully compliant
    pub score: f64,
    pub findings: Vec<Finding>,
}

impl RuleResult {
    /// Build a result, clamping the score to [0, 1] (NaN becomes 0)
    pub fn new(score: f64, findings: Vec<Finding>) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        Self { score, findings }
    }

    pub fn compliant() -> Self {
        Self::new(1.0, Vec::new())
    }
}

/// Per-rule contribution to a category score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule_id: String,
    pub weight: f64,
    /// `None` when the rule had nothing to measure
    pub score: Option<f64>,
    pub failed: bool,
    pub finding_count: usize,
}

/// Score of a single category on the 0-10 scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    /// Unrounded score in [0, 10]
    pub score: f64,
    pub vacuous: bool,
    pub rules: Vec<RuleOutcome>,
    pub findings: Vec<Finding>,
}

impl CategoryScore {
    /// Score rounded to one decimal, as displayed and compared to thresholds
    pub fn display_score(&self) -> f64 {
        round1(self.score)
    }
}

/// Aggregate counters copied from the fact model for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub root: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<DateTime<Utc>>,
    pub total_facts: usize,
    pub total_files: usize,
    pub total_functions: usize,
    pub documented_functions: usize,
    pub total_classes: usize,
    pub total_tests: usize,
}

/// Terminal artifact of an evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Weighted mean of the category scores, rounded to one decimal
    pub overall_score: f64,
    /// One entry per category, in declaration order
    pub categories: Vec<CategoryScore>,
    /// Categories at or above the strength threshold, best first
    pub strengths: Vec<Category>,
    /// Categories at or below the weakness threshold, worst first
    pub weaknesses: Vec<Category>,
    pub snapshot: SnapshotSummary,
    pub rule_count: usize,
}

impl EvaluationReport {
    pub fn category(&self, category: Category) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.categories.iter().flat_map(|c| c.findings.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_and_keys() {
        assert_eq!(Category::ALL.len(), 10);
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(Category::parse(c.key()), Some(*c));
        }
        assert_eq!(Category::parse("Error Handling"), Some(Category::ErrorHandling));
        assert_eq!(Category::parse("function-design"), Some(Category::FunctionDesign));
        assert_eq!(Category::parse("nope"), None);
    }

    #[test]
    fn test_rule_result_clamps() {
        assert_eq!(RuleResult::new(1.7, vec![]).score, 1.0);
        assert_eq!(RuleResult::new(-0.2, vec![]).score, 0.0);
        assert_eq!(RuleResult::new(f64::NAN, vec![]).score, 0.0);
    }

    #[test]
    fn test_finding_id_is_stable() {
        let bare_except_at = |line: u32| {
            Finding::new(
                "no-bare-except",
                Category::ErrorHandling,
                FindingKind::Violation,
                Location::new("app/core.py", Some(line), Some(line)),
                "bare except",
            )
        };
        let a = bare_except_at(12);
        let b = bare_except_at(12);
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.len(), 16);
        assert_eq!(
            a.id,
            deterministic_finding_id("no-bare-except", Path::new("app/core.py"), Some(12), "bare except")
        );

        assert_ne!(a.id, bare_except_at(13).id);
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new("a.py", Some(3), Some(9)).to_string(), "a.py:3-9");
        assert_eq!(Location::new("a.py", Some(3), Some(3)).to_string(), "a.py:3");
        assert_eq!(Location::codebase(Path::new(".")).to_string(), ".");
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(7.449), 7.4);
        assert_eq!(round1(7.46), 7.5);
        assert_eq!(round1(10.0), 10.0);
    }
}
