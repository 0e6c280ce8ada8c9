//! Text reporter
//!
//! Produces the plain rubric report:
//!
//! ```text
//! Overall Score: 8.5/10
//!
//! Category Scores:
//! - Layout & Formatting: 9.5/10
//! ...
//!
//! Top Strengths:
//! - Testing (10.0/10)
//!
//! Key Weaknesses:
//! - Function Design (4.5/10)
//!
//! Recommendations:
//! 1. Function Design: ...
//! ```

use super::Recommendation;
use crate::models::{Category, EvaluationReport};
use std::fmt::Write;

/// Render report as plain text
pub fn render(report: &EvaluationReport, recommendations: &[Recommendation]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Overall Score: {:.1}/10", report.overall_score);
    out.push('\n');

    out.push_str("Category Scores:\n");
    for category in &report.categories {
        let _ = writeln!(
            out,
            "- {}: {:.1}/10",
            category.category,
            category.display_score()
        );
    }
    out.push('\n');

    out.push_str("Top Strengths:\n");
    render_ranked(&mut out, report, &report.strengths);
    out.push('\n');

    out.push_str("Key Weaknesses:\n");
    render_ranked(&mut out, report, &report.weaknesses);
    out.push('\n');

    out.push_str("Recommendations:\n");
    if recommendations.is_empty() {
        out.push_str("- None\n");
    }
    for rec in recommendations {
        let _ = writeln!(out, "{}. {}", rec.number, rec.text);
    }

    out
}

fn render_ranked(out: &mut String, report: &EvaluationReport, categories: &[Category]) {
    if categories.is_empty() {
        out.push_str("- None\n");
        return;
    }
    for category in categories {
        let score = report
            .category(*category)
            .map(|c| c.display_score())
            .unwrap_or_default();
        let _ = writeln!(out, "- {} ({:.1}/10)", category, score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;
    use crate::reporters::{build_recommendations, DEFAULT_RECOMMENDATION_CAP};

    #[test]
    fn test_text_render_sections() {
        let report = test_report();
        let recs = build_recommendations(&report, DEFAULT_RECOMMENDATION_CAP);
        let text = render(&report, &recs);

        assert!(text.starts_with("Overall Score: 8.5/10\n\nCategory Scores:\n"));
        assert!(text.contains("- Layout & Formatting: 9.5/10\n"));
        assert!(text.contains("- Function Design: 4.5/10\n"));
        assert!(text.contains("Top Strengths:\n- Testing (10.0/10)\n- Layout & Formatting (9.5/10)\n"));
        assert!(text.contains("Key Weaknesses:\n- Function Design (4.5/10)\n- Error Handling (5.0/10)\n\n"));
        assert!(text.contains("Recommendations:\n1. Function Design: Split functions"));
        assert!(text.ends_with(
            "3. Error Handling: Catch specific exception types instead of a bare except (1 occurrence, first at app/service.py:42).\n"
        ));
    }

    #[test]
    fn test_category_lines_in_declaration_order() {
        let report = test_report();
        let text = render(&report, &[]);
        let lines: Vec<_> = text
            .lines()
            .skip_while(|l| *l != "Category Scores:")
            .skip(1)
            .take_while(|l| !l.is_empty())
            .collect();
        assert_eq!(lines.len(), 10);
        for (line, category) in lines.iter().zip(Category::ALL) {
            assert!(line.starts_with(&format!("- {}: ", category.display_name())));
        }
    }

    #[test]
    fn test_empty_sections_render_none() {
        let mut report = test_report();
        report.strengths.clear();
        report.weaknesses.clear();
        let text = render(&report, &[]);
        assert!(text.contains("Top Strengths:\n- None\n"));
        assert!(text.contains("Key Weaknesses:\n- None\n"));
        assert!(text.ends_with("Recommendations:\n- None\n"));
    }
}
