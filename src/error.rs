//! Error types for each layer of the evaluation pipeline
//!
//! Registry, configuration and aggregation errors are fatal to a run.
//! `RuleError` never escapes the category evaluator: it is downgraded to a
//! zero score and a finding.

use crate::facts::FactKind;
use crate::models::Category;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or loading a fact model
#[derive(Error, Debug)]
pub enum FactError {
    #[error("invalid location for {kind} fact in '{file}': {reason}")]
    InvalidLocation {
        kind: FactKind,
        file: String,
        reason: String,
    },

    #[error("failed to read fact file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fact file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors a rule may return while evaluating a fact model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("malformed {kind} fact at {location}: expected {expected} value")]
    MalformedFact {
        kind: FactKind,
        location: String,
        expected: &'static str,
    },

    #[error("{0}")]
    Evaluation(String),
}

/// Errors raised while registering rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("duplicate rule id '{id}'")]
    DuplicateRule { id: String },

    #[error("invalid weight for rule '{rule}': {category} weights would sum to {total:.3} (must be 1.0)")]
    InvalidWeight {
        category: Category,
        rule: String,
        total: f64,
    },

    #[error("rule '{rule}' has invalid pattern: {reason}")]
    InvalidPattern { rule: String, reason: String },

    #[error("rule '{rule}' checks {kind} facts as {expected}, but they carry {actual} values")]
    KindMismatch {
        rule: String,
        kind: FactKind,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Errors raised while combining category scores into a report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("incomplete evaluation: missing {}", format_categories(.missing))]
    IncompleteEvaluation { missing: Vec<Category> },

    #[error("category {0} was scored more than once")]
    DuplicateCategory(Category),
}

/// Configuration validation errors, reported before any evaluation starts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("category weights must sum to 1.0, got {total:.3}")]
    WeightSum { total: f64 },

    #[error("category weight for {category} is negative ({weight})")]
    NegativeWeight { category: Category, weight: f64 },

    #[error("{name} threshold {value} is outside [0, 10]")]
    Threshold { name: &'static str, value: f64 },

    #[error("recommendation cap must be at least 1")]
    RecommendationCap,

    #[error("unknown rule id '{0}' in configuration")]
    UnknownRule(String),

    #[error("rule '{0}' has no numeric limit to override")]
    NoLimit(String),

    #[error("limit {limit} for rule '{rule}' is not a finite number")]
    InvalidLimit { rule: String, limit: f64 },

    #[error("default workers must be between 1 and {max}, got {workers}")]
    Workers { workers: usize, max: usize },
}

fn format_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}
