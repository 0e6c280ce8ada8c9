//! Base rule trait
//!
//! Every checklist line of the rubric is a `Rule`: a stateless, pure
//! function of the fact model bound to exactly one category.

use crate::error::RuleError;
use crate::facts::FactModel;
use crate::models::{Category, RuleResult};

/// Trait for all rubric rules
///
/// Rules must be deterministic: the same `FactModel` always yields the
/// same `RuleResult`. They hold no mutable state and may be evaluated
/// concurrently.
///
/// # Example Implementation
///
/// ```ignore
/// struct HasGitignore;
///
/// impl Rule for HasGitignore {
///     fn id(&self) -> &str { "gitignore-present" }
///     fn category(&self) -> Category { Category::VersionControl }
///     fn weight(&self) -> f64 { 1.0 }
///     fn description(&self) -> &str { "Repository has a .gitignore" }
///     fn recommendation(&self) -> &str { "Add a .gitignore" }
///
///     fn evaluate(&self, facts: &FactModel) -> Result<Option<RuleResult>, RuleError> {
///         Ok(Some(RuleResult::compliant()))
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Unique identifier (kebab-case, e.g. `function-max-length`)
    fn id(&self) -> &str;

    /// Category this rule contributes to
    fn category(&self) -> Category;

    /// Weight within the category; weights of a category sum to 1.0
    fn weight(&self) -> f64;

    /// Human-readable description of the checklist line
    fn description(&self) -> &str;

    /// Advice rendered in the recommendations section
    fn recommendation(&self) -> &str;

    /// Evaluate against a fact model
    ///
    /// Returns `Ok(None)` when the model holds nothing this rule measures.
    fn evaluate(&self, facts: &FactModel) -> Result<Option<RuleResult>, RuleError>;
}
