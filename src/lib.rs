//! stylegrade - rubric-driven style evaluation for Python codebases
//!
//! The crate consumes a [`facts::FactModel`] produced by an external
//! extractor, scores it against ten categories of weighted rules and
//! renders an [`models::EvaluationReport`].
//!
//! ```text
//! FactModel ─► RuleRegistry ─► CategoryEvaluator ×10 ─► Aggregator ─► ReportBuilder
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod facts;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod rules;
pub mod scoring;
