//! Category evaluator
//!
//! Runs every rule registered for one category against a fact model and
//! combines the results into a 0-10 score. Rules are isolated from each
//! other: an error or panic in one rule scores that rule 0 and leaves the
//! rest of the category untouched.

use crate::facts::FactModel;
use crate::models::{Category, CategoryScore, Finding, FindingKind, Location, RuleOutcome, RuleResult};
use crate::rules::{Rule, RuleRegistry};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, warn};

/// Rule id used for the informational finding of a vacuous category
pub const VACUOUS_RULE_ID: &str = "vacuous";

/// Score of a category with nothing to measure
const VACUOUS_SCORE: f64 = 10.0;

/// Evaluates one category at a time against a shared registry
pub struct CategoryEvaluator<'a> {
    registry: &'a RuleRegistry,
}

/// What happened when a single rule ran
enum RuleRun {
    Scored(RuleResult),
    NotApplicable,
    Failed(String),
}

impl<'a> CategoryEvaluator<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Score `category` against `facts`
    ///
    /// Only applicable rules contribute, with their weights renormalized.
    /// A rule that fails counts as applicable with score 0.
    pub fn evaluate(&self, category: Category, facts: &FactModel) -> CategoryScore {
        let rules = self.registry.rules_for(category);

        // par_iter + collect keeps registration order
        let runs: Vec<RuleRun> = rules
            .par_iter()
            .map(|rule| run_single_rule(rule, facts))
            .collect();

        let mut weighted = 0.0;
        let mut applied_weight = 0.0;
        let mut outcomes = Vec::with_capacity(rules.len());
        let mut findings = Vec::new();

        for (rule, run) in rules.iter().zip(runs) {
            let weight = rule.weight();
            match run {
                RuleRun::Scored(result) => {
                    weighted += weight * result.score;
                    applied_weight += weight;
                    outcomes.push(RuleOutcome {
                        rule_id: rule.id().to_string(),
                        weight,
                        score: Some(result.score),
                        failed: false,
                        finding_count: result.findings.len(),
                    });
                    findings.extend(result.findings);
                }
                RuleRun::NotApplicable => outcomes.push(RuleOutcome {
                    rule_id: rule.id().to_string(),
                    weight,
                    score: None,
                    failed: false,
                    finding_count: 0,
                }),
                RuleRun::Failed(reason) => {
                    applied_weight += weight;
                    outcomes.push(RuleOutcome {
                        rule_id: rule.id().to_string(),
                        weight,
                        score: Some(0.0),
                        failed: true,
                        finding_count: 1,
                    });
                    findings.push(failure_finding(rule.as_ref(), facts, &reason));
                }
            }
        }

        if applied_weight <= 0.0 {
            debug!("{}: no applicable rules, scoring {}", category, VACUOUS_SCORE);
            findings.push(Finding::new(
                VACUOUS_RULE_ID,
                category,
                FindingKind::Vacuous,
                Location::codebase(facts.root()),
                format!("No applicable facts for {category}; scored {VACUOUS_SCORE:.1} by default"),
            ));
            return CategoryScore {
                category,
                score: VACUOUS_SCORE,
                vacuous: true,
                rules: outcomes,
                findings,
            };
        }

        let score = (10.0 * weighted / applied_weight).clamp(0.0, 10.0);
        debug!(
            "{}: {:.2}/10 from {} rules, {} findings",
            category,
            score,
            outcomes.len(),
            findings.len()
        );

        CategoryScore {
            category,
            score,
            vacuous: false,
            rules: outcomes,
            findings,
        }
    }
}

/// Run one rule, capturing errors and panics
fn run_single_rule(rule: &Arc<dyn Rule>, facts: &FactModel) -> RuleRun {
    let id = rule.id();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| rule.evaluate(facts)));

    match result {
        Ok(Ok(Some(result))) => {
            // Re-clamp: custom rules may build RuleResult by hand
            let result = RuleResult::new(result.score, result.findings);
            debug!("Rule {} scored {:.3} with {} findings", id, result.score, result.findings.len());
            RuleRun::Scored(result)
        }
        Ok(Ok(None)) => {
            debug!("Rule {} not applicable", id);
            RuleRun::NotApplicable
        }
        Ok(Err(e)) => {
            warn!("Rule {} failed: {}", id, e);
            RuleRun::Failed(e.to_string())
        }
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            warn!("Rule {} panicked: {}", id, panic_msg);
            RuleRun::Failed(format!("panic: {panic_msg}"))
        }
    }
}

fn failure_finding(rule: &dyn Rule, facts: &FactModel, reason: &str) -> Finding {
    Finding::new(
        rule.id(),
        rule.category(),
        FindingKind::RuleFailure,
        Location::codebase(facts.root()),
        format!("Rule '{}' could not be evaluated: {reason}", rule.id()),
    )
    .with_suggestion(format!(
        "Re-run fact extraction so rule '{}' ({}) can be evaluated",
        rule.id(),
        rule.description()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::facts::FactKind;
    use crate::rules::{Check, DeclarativeRule, RuleSpec};

    struct PanickingRule;

    impl Rule for PanickingRule {
        fn id(&self) -> &str {
            "panicking"
        }
        fn category(&self) -> Category {
            Category::Performance
        }
        fn weight(&self) -> f64 {
            0.5
        }
        fn description(&self) -> &str {
            "always panics"
        }
        fn recommendation(&self) -> &str {
            "n/a"
        }
        fn evaluate(&self, _facts: &FactModel) -> Result<Option<RuleResult>, RuleError> {
            panic!("boom");
        }
    }

    fn performance_rule(id: &'static str, kind: FactKind) -> Arc<dyn Rule> {
        Arc::new(
            DeclarativeRule::new(RuleSpec {
                id,
                category: Category::Performance,
                weight: 0.5,
                description: "perf",
                violation: "too deep",
                recommendation: "Flatten it.",
                check: Check::AtMost { kind, limit: 2.0 },
            })
            .expect("rule"),
        )
    }

    #[test]
    fn test_standard_category_all_compliant() {
        let registry = RuleRegistry::standard().expect("registry");
        let facts = FactModel::builder("proj")
            .boolean(FactKind::BareExcept, "app.py", 10, false)
            .boolean(FactKind::BroadExcept, "app.py", 10, false)
            .boolean(FactKind::SilentExcept, "app.py", 10, false)
            .build()
            .expect("model");
        let score = CategoryEvaluator::new(&registry).evaluate(Category::ErrorHandling, &facts);
        assert_eq!(score.score, 10.0);
        assert!(!score.vacuous);
        assert!(score.findings.is_empty());
        assert_eq!(score.rules.len(), 3);
    }

    #[test]
    fn test_weights_renormalized_over_applicable_rules() {
        let registry = RuleRegistry::standard().expect("registry");
        // Only no-bare-except (0.5) is applicable; half the handlers are bare
        let facts = FactModel::builder("proj")
            .boolean(FactKind::BareExcept, "app.py", 10, true)
            .boolean(FactKind::BareExcept, "app.py", 30, false)
            .build()
            .expect("model");
        let score = CategoryEvaluator::new(&registry).evaluate(Category::ErrorHandling, &facts);
        assert!((score.score - 5.0).abs() < 1e-9);
        assert_eq!(score.findings.len(), 1);
        assert_eq!(score.findings[0].rule_id, "no-bare-except");
        assert_eq!(score.rules[1].score, None);
    }

    #[test]
    fn test_vacuous_category() {
        let registry = RuleRegistry::standard().expect("registry");
        let score =
            CategoryEvaluator::new(&registry).evaluate(Category::Testing, &FactModel::empty("proj"));
        assert_eq!(score.score, 10.0);
        assert!(score.vacuous);
        assert_eq!(score.findings.len(), 1);
        assert_eq!(score.findings[0].kind, FindingKind::Vacuous);
        assert!(!score.findings[0].is_actionable());
    }

    #[test]
    fn test_panicking_rule_is_isolated() {
        let mut registry = RuleRegistry::new();
        registry.register(Arc::new(PanickingRule)).expect("register");
        registry
            .register(performance_rule("nested-loops", FactKind::NestedLoopDepth))
            .expect("register");

        let facts = FactModel::builder("proj")
            .number(FactKind::NestedLoopDepth, "hot.py", 4, 1.0)
            .build()
            .expect("model");
        let score = CategoryEvaluator::new(&registry).evaluate(Category::Performance, &facts);

        // 0.5 * 0 + 0.5 * 1 over both weights
        assert!((score.score - 5.0).abs() < 1e-9);
        assert!(score.rules[0].failed);
        assert_eq!(score.rules[1].score, Some(1.0));
        let failure = &score.findings[0];
        assert_eq!(failure.kind, FindingKind::RuleFailure);
        assert_eq!(failure.rule_id, "panicking");
        assert!(failure.message.contains("boom"));
    }

    #[test]
    fn test_malformed_fact_scores_rule_zero() {
        let registry = RuleRegistry::standard().expect("registry");
        let facts = FactModel::builder("proj")
            .label(FactKind::NestedLoopDepth, "hot.py", 4, "deep")
            .boolean(FactKind::StringConcatInLoop, "hot.py", 9, false)
            .build()
            .expect("model");
        let score = CategoryEvaluator::new(&registry).evaluate(Category::Performance, &facts);
        assert!((score.score - 5.0).abs() < 1e-9);
        assert!(score.rules[0].failed);
        assert!(score.findings[0].message.contains("nested_loop_depth"));
    }
}
