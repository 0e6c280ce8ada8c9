//! Declarative checks
//!
//! A `Check` is a predicate over every fact of one kind. The rule score is
//! the fraction of measured facts that pass; each failing fact becomes a
//! finding located at the fact.

use super::base::Rule;
use super::catalog::RuleSpec;
use crate::error::{RegistryError, RuleError};
use crate::facts::{FactKind, FactModel, SourceFact, ValueType};
use crate::models::{Category, Finding, FindingKind, RuleResult};
use regex::Regex;

/// Predicate applied to each fact of `kind`
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// Boolean fact must equal `value`
    Expect { kind: FactKind, value: bool },
    /// Numeric fact must be `<= limit`
    AtMost { kind: FactKind, limit: f64 },
    /// Numeric fact must be `>= limit`
    AtLeast { kind: FactKind, limit: f64 },
    /// Numeric fact must equal `value`
    Equals { kind: FactKind, value: f64 },
    /// Label must match a regular expression
    Matches {
        kind: FactKind,
        pattern: &'static str,
    },
    /// Label must differ from `label`
    NotLabel {
        kind: FactKind,
        label: &'static str,
    },
    /// Label must be one of `labels`
    OneOf {
        kind: FactKind,
        labels: &'static [&'static str],
    },
}

impl Check {
    pub fn kind(&self) -> FactKind {
        match self {
            Check::Expect { kind, .. }
            | Check::AtMost { kind, .. }
            | Check::AtLeast { kind, .. }
            | Check::Equals { kind, .. }
            | Check::Matches { kind, .. }
            | Check::NotLabel { kind, .. }
            | Check::OneOf { kind, .. } => *kind,
        }
    }

    /// Numeric threshold, if the check has one
    pub fn limit(&self) -> Option<f64> {
        match self {
            Check::AtMost { limit, .. } | Check::AtLeast { limit, .. } => Some(*limit),
            Check::Equals { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Copy of this check with a new numeric threshold
    pub fn with_limit(&self, new_limit: f64) -> Option<Check> {
        match *self {
            Check::AtMost { kind, .. } => Some(Check::AtMost {
                kind,
                limit: new_limit,
            }),
            Check::AtLeast { kind, .. } => Some(Check::AtLeast {
                kind,
                limit: new_limit,
            }),
            Check::Equals { kind, .. } => Some(Check::Equals {
                kind,
                value: new_limit,
            }),
            _ => None,
        }
    }

    fn expected_type(&self) -> ValueType {
        match self {
            Check::Expect { .. } => ValueType::Bool,
            Check::AtMost { .. } | Check::AtLeast { .. } | Check::Equals { .. } => {
                ValueType::Number
            }
            Check::Matches { .. } | Check::NotLabel { .. } | Check::OneOf { .. } => {
                ValueType::Label
            }
        }
    }

    /// Short human-readable form for `stylegrade rules`
    pub fn summary(&self) -> String {
        match self {
            Check::Expect { kind, value } => format!("{kind} == {value}"),
            Check::AtMost { kind, limit } => format!("{kind} <= {limit}"),
            Check::AtLeast { kind, limit } => format!("{kind} >= {limit}"),
            Check::Equals { kind, value } => format!("{kind} == {value}"),
            Check::Matches { kind, pattern } => format!("{kind} ~ /{pattern}/"),
            Check::NotLabel { kind, label } => format!("{kind} != '{label}'"),
            Check::OneOf { kind, labels } => format!("{kind} in [{}]", labels.join(", ")),
        }
    }
}

/// A rule backed by a catalog entry
#[derive(Debug, Clone)]
pub struct DeclarativeRule {
    spec: RuleSpec,
    pattern: Option<Regex>,
}

impl DeclarativeRule {
    /// Compile a catalog entry into a rule
    pub fn new(spec: RuleSpec) -> Result<Self, RegistryError> {
        let kind = spec.check.kind();
        if kind.value_type() != spec.check.expected_type() {
            return Err(RegistryError::KindMismatch {
                rule: spec.id.to_string(),
                kind,
                expected: spec.check.expected_type().as_str(),
                actual: kind.value_type().as_str(),
            });
        }

        let pattern = match spec.check {
            Check::Matches { pattern, .. } => {
                Some(Regex::new(pattern).map_err(|e| RegistryError::InvalidPattern {
                    rule: spec.id.to_string(),
                    reason: e.to_string(),
                })?)
            }
            _ => None,
        };
        Ok(Self { spec, pattern })
    }

    pub fn spec(&self) -> &RuleSpec {
        &self.spec
    }

    /// Returns a violation message, or `None` when the fact complies
    fn check_fact(&self, fact: &SourceFact) -> Result<Option<String>, RuleError> {
        let violation = self.spec.violation;
        let malformed = || RuleError::MalformedFact {
            kind: fact.kind,
            location: fact.location.to_string(),
            expected: self.spec.check.expected_type().as_str(),
        };
        if fact.value.value_type() != self.spec.check.expected_type() {
            return Err(malformed());
        }

        let message = match &self.spec.check {
            Check::Expect { value, .. } => {
                let actual = fact.value.as_bool().ok_or_else(malformed)?;
                (actual != *value).then(|| violation.to_string())
            }
            Check::AtMost { limit, .. } => {
                let actual = number(fact).ok_or_else(malformed)?;
                (actual > *limit).then(|| format!("{violation}: {actual} > {limit}"))
            }
            Check::AtLeast { limit, .. } => {
                let actual = number(fact).ok_or_else(malformed)?;
                (actual < *limit).then(|| format!("{violation}: {actual} < {limit}"))
            }
            Check::Equals { value, .. } => {
                let actual = number(fact).ok_or_else(malformed)?;
                ((actual - *value).abs() > f64::EPSILON)
                    .then(|| format!("{violation}: {actual} (expected {value})"))
            }
            Check::Matches { .. } => {
                let label = fact.value.as_label().ok_or_else(malformed)?;
                let pattern = self.pattern.as_ref().ok_or_else(|| {
                    RuleError::Evaluation(format!("pattern for '{}' was not compiled", self.spec.id))
                })?;
                (!pattern.is_match(label)).then(|| format!("{violation}: '{label}'"))
            }
            Check::NotLabel { label, .. } => {
                let actual = fact.value.as_label().ok_or_else(malformed)?;
                (actual == *label).then(|| format!("{violation}: '{actual}'"))
            }
            Check::OneOf { labels, .. } => {
                let actual = fact.value.as_label().ok_or_else(malformed)?;
                (!labels.contains(&actual)).then(|| format!("{violation}: '{actual}'"))
            }
        };
        Ok(message)
    }
}

/// Numeric value; NaN and infinities count as malformed
fn number(fact: &SourceFact) -> Option<f64> {
    fact.value.as_f64().filter(|v| v.is_finite())
}

impl Rule for DeclarativeRule {
    fn id(&self) -> &str {
        self.spec.id
    }

    fn category(&self) -> Category {
        self.spec.category
    }

    fn weight(&self) -> f64 {
        self.spec.weight
    }

    fn description(&self) -> &str {
        self.spec.description
    }

    fn recommendation(&self) -> &str {
        self.spec.recommendation
    }

    fn evaluate(&self, facts: &FactModel) -> Result<Option<RuleResult>, RuleError> {
        let mut measured = 0usize;
        let mut compliant = 0usize;
        let mut findings = Vec::new();

        for fact in facts.of_kind(self.spec.check.kind()) {
            measured += 1;
            match self.check_fact(fact)? {
                None => compliant += 1,
                Some(message) => findings.push(
                    Finding::new(
                        self.spec.id,
                        self.spec.category,
                        FindingKind::Violation,
                        fact.location.clone(),
                        message,
                    )
                    .with_suggestion(self.spec.recommendation),
                ),
            }
        }

        if measured == 0 {
            return Ok(None);
        }
        Ok(Some(RuleResult::new(
            compliant as f64 / measured as f64,
            findings,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::FactValue;

    fn spec(check: Check) -> RuleSpec {
        RuleSpec {
            id: "test-rule",
            category: Category::FunctionDesign,
            weight: 1.0,
            description: "Test rule",
            violation: "violation",
            recommendation: "Fix it.",
            check,
        }
    }

    #[test]
    fn test_at_most_scores_fraction() {
        let rule = DeclarativeRule::new(spec(Check::AtMost {
            kind: FactKind::FunctionLength,
            limit: 40.0,
        }))
        .expect("rule");
        let facts = FactModel::builder("p")
            .number(FactKind::FunctionLength, "a.py", 1, 10.0)
            .number(FactKind::FunctionLength, "a.py", 20, 40.0)
            .number(FactKind::FunctionLength, "b.py", 5, 41.0)
            .number(FactKind::FunctionLength, "b.py", 60, 90.0)
            .build()
            .expect("model");

        let result = rule.evaluate(&facts).expect("evaluate").expect("applicable");
        assert!((result.score - 0.5).abs() < 1e-9);
        assert_eq!(result.findings.len(), 2);
        assert_eq!(result.findings[0].location.file.to_str(), Some("b.py"));
        assert_eq!(result.findings[0].message, "violation: 41 > 40");
        assert_eq!(result.findings[0].suggestion.as_deref(), Some("Fix it."));
    }

    #[test]
    fn test_not_applicable_without_facts() {
        let rule = DeclarativeRule::new(spec(Check::Expect {
            kind: FactKind::BareExcept,
            value: false,
        }))
        .expect("rule");
        assert_eq!(rule.evaluate(&FactModel::empty("p")).expect("evaluate"), None);
    }

    #[test]
    fn test_malformed_fact_is_an_error() {
        let rule = DeclarativeRule::new(spec(Check::AtMost {
            kind: FactKind::FunctionLength,
            limit: 40.0,
        }))
        .expect("rule");
        let facts = FactModel::builder("p")
            .label(FactKind::FunctionLength, "a.py", 3, "very long")
            .build()
            .expect("model");
        let err = rule.evaluate(&facts).unwrap_err();
        assert!(matches!(err, RuleError::MalformedFact { expected: "numeric", .. }));
        assert!(err.to_string().contains("a.py:3"));
    }

    #[test]
    fn test_check_must_match_fact_kind_type() {
        let err = DeclarativeRule::new(spec(Check::AtMost {
            kind: FactKind::BareExcept,
            limit: 1.0,
        }))
        .unwrap_err();
        assert_eq!(
            err,
            RegistryError::KindMismatch {
                rule: "test-rule".to_string(),
                kind: FactKind::BareExcept,
                expected: "numeric",
                actual: "boolean",
            }
        );
    }

    #[test]
    fn test_label_checks() {
        let matches = DeclarativeRule::new(spec(Check::Matches {
            kind: FactKind::FunctionName,
            pattern: r"^[a-z_][a-z0-9_]*$",
        }))
        .expect("rule");
        let facts = FactModel::builder("p")
            .label(FactKind::FunctionName, "a.py", 1, "load_data")
            .label(FactKind::FunctionName, "a.py", 9, "loadData")
            .build()
            .expect("model");
        let result = matches.evaluate(&facts).expect("evaluate").expect("applicable");
        assert_eq!(result.score, 0.5);
        assert_eq!(result.findings[0].message, "violation: 'loadData'");

        let one_of = DeclarativeRule::new(spec(Check::OneOf {
            kind: FactKind::LogCall,
            labels: &["info", "error"],
        }))
        .expect("rule");
        let facts = FactModel::builder("p")
            .add(FactKind::LogCall, "a.py", Some((4, 4)), FactValue::Label("info".into()))
            .add(FactKind::LogCall, "a.py", Some((8, 8)), FactValue::Label("shout".into()))
            .build()
            .expect("model");
        let result = one_of.evaluate(&facts).expect("evaluate").expect("applicable");
        assert_eq!(result.score, 0.5);
    }

    #[test]
    fn test_invalid_pattern_fails_compilation() {
        let err = DeclarativeRule::new(spec(Check::Matches {
            kind: FactKind::FunctionName,
            pattern: "([unclosed",
        }))
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPattern { .. }));
    }

    #[test]
    fn test_with_limit() {
        let check = Check::AtMost {
            kind: FactKind::FunctionLength,
            limit: 40.0,
        };
        assert_eq!(check.with_limit(60.0).and_then(|c| c.limit()), Some(60.0));
        let expect = Check::Expect {
            kind: FactKind::BareExcept,
            value: false,
        };
        assert_eq!(expect.with_limit(1.0), None);
    }
}
