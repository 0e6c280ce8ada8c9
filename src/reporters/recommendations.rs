//! Recommendation sentences derived from findings
//!
//! Findings are grouped per category (declaration order) and per rule id
//! (first-appearance order). Each group yields one sentence; at most `cap`
//! sentences are kept per category. Vacuous findings are informational
//! and never produce a recommendation.

use crate::models::{Category, EvaluationReport, Finding};
use serde::Serialize;

/// Default per-category recommendation cap
pub const DEFAULT_RECOMMENDATION_CAP: usize = 5;

/// One numbered line of the "Recommendations" section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// 1-based, numbered across all categories
    pub number: usize,
    pub category: Category,
    pub rule_id: String,
    pub occurrences: usize,
    pub text: String,
}

/// Build the recommendation list for a report
pub fn build_recommendations(report: &EvaluationReport, cap: usize) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for category in &report.categories {
        // (rule_id, first finding, count) in first-appearance order
        let mut groups: Vec<(&str, &Finding, usize)> = Vec::new();
        for finding in category.findings.iter().filter(|f| f.is_actionable()) {
            match groups.iter_mut().find(|(id, _, _)| *id == finding.rule_id) {
                Some(group) => group.2 += 1,
                None => groups.push((finding.rule_id.as_str(), finding, 1)),
            }
        }

        for (rule_id, first, occurrences) in groups.into_iter().take(cap) {
            recommendations.push(Recommendation {
                number: recommendations.len() + 1,
                category: category.category,
                rule_id: rule_id.to_string(),
                occurrences,
                text: sentence(category.category, first, occurrences),
            });
        }
    }

    recommendations
}

fn sentence(category: Category, first: &Finding, occurrences: usize) -> String {
    let advice = first.suggestion.as_deref().unwrap_or(&first.message);
    let advice = advice.trim_end_matches('.');
    let plural = if occurrences == 1 { "" } else { "s" };
    format!(
        "{}: {} ({} occurrence{}, first at {}).",
        category.display_name(),
        advice,
        occurrences,
        plural,
        first.location
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_one_sentence_per_rule() {
        let recs = build_recommendations(&test_report(), DEFAULT_RECOMMENDATION_CAP);
        let ids: Vec<_> = recs.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["function-max-length", "function-docstring", "no-bare-except"]
        );
        assert_eq!(recs[0].occurrences, 2);
        assert_eq!(
            recs[0].text,
            "Function Design: Split functions longer than 40 lines (2 occurrences, first at app/service.py:10-60)."
        );
        assert_eq!(recs[2].number, 3);
    }

    #[test]
    fn test_cap_applies_per_category() {
        let recs = build_recommendations(&test_report(), 1);
        let ids: Vec<_> = recs.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["function-max-length", "no-bare-except"]);
        assert_eq!(recs[1].number, 2);
    }

    #[test]
    fn test_vacuous_findings_are_not_recommended() {
        let recs = build_recommendations(&test_report(), DEFAULT_RECOMMENDATION_CAP);
        assert!(recs.iter().all(|r| r.category != Category::Testing));
    }
}
