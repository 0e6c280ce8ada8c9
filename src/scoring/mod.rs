//! Rubric scoring
//!
//! Turns rule results into category scores and category scores into the
//! final report.
//!
//! # Scoring Formula
//!
//! ```text
//! Category = 10 × Σ wᵢ·sᵢ / Σ wᵢ     (applicable rules only)
//! Overall  = Σ W_c · Category_c      (W_c = 0.1 by default)
//!
//! sᵢ ∈ [0, 1]   fraction of facts that pass rule i; failed rules score 0
//! wᵢ            rule weight inside its category (sums to 1.0)
//! ```
//!
//! A category with no applicable rule scores 10 and records a vacuous
//! finding. Strengths and weaknesses compare the score rounded to one
//! decimal against the configured thresholds (9 and 6 by default).

mod aggregator;
mod evaluator;

pub use aggregator::{
    AggregateOptions, Aggregator, DEFAULT_STRENGTH_THRESHOLD, DEFAULT_WEAKNESS_THRESHOLD,
};
pub use evaluator::{CategoryEvaluator, VACUOUS_RULE_ID};
