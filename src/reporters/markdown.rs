//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - Pull request comments
//! - CI job summaries
//! - Review notes checked into a repository
//!
//! The output carries no wall-clock timestamp, so rendering the same
//! report twice yields identical bytes.

use super::Recommendation;
use crate::models::{CategoryScore, EvaluationReport, FindingKind};
use std::fmt::Write;

/// Maximum findings listed per category in the details section
const MAX_FINDINGS_PER_CATEGORY: usize = 10;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &EvaluationReport, recommendations: &[Recommendation]) -> String {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    md.push_str(&render_snapshot(report));
    md.push('\n');

    md.push_str(&render_category_scores(report));
    md.push('\n');

    md.push_str(&render_highlights(report));
    md.push('\n');

    md.push_str(&render_recommendations(recommendations));
    md.push('\n');

    md.push_str(&render_findings(report));
    md.push('\n');

    md.push_str("---\n\n_Generated by stylegrade_\n");
    md
}

fn render_header(report: &EvaluationReport) -> String {
    let mut s = String::new();
    s.push_str("# Style Evaluation Report\n\n");
    let _ = writeln!(s, "**Overall Score:** {:.1}/10", report.overall_score);
    s
}

fn render_snapshot(report: &EvaluationReport) -> String {
    let snap = &report.snapshot;
    let mut s = String::from("## Snapshot\n\n| Metric | Value |\n|--------|-------|\n");
    let _ = writeln!(s, "| Root | `{}` |", snap.root.display());
    if let Some(at) = snap.extracted_at {
        let _ = writeln!(s, "| Extracted | {} |", at.format("%Y-%m-%d %H:%M UTC"));
    }
    let _ = writeln!(s, "| Facts | {} |", snap.total_facts);
    let _ = writeln!(s, "| Files | {} |", snap.total_files);
    let _ = writeln!(
        s,
        "| Functions | {} ({} documented) |",
        snap.total_functions, snap.documented_functions
    );
    let _ = writeln!(s, "| Classes | {} |", snap.total_classes);
    let _ = writeln!(s, "| Tests | {} |", snap.total_tests);
    let _ = writeln!(s, "| Rules | {} |", report.rule_count);
    s
}

fn render_category_scores(report: &EvaluationReport) -> String {
    let mut s = String::from(
        "## Category Scores\n\n| Category | Score | Rules Measured | Findings |\n|----------|-------|----------------|----------|\n",
    );
    for category in &report.categories {
        let _ = writeln!(
            s,
            "| {} | {:.1}/10 {} | {} | {} |",
            category.category,
            category.display_score(),
            score_marker(report, category),
            measured_rules(category),
            category.findings.iter().filter(|f| f.is_actionable()).count()
        );
    }
    s
}

fn score_marker(report: &EvaluationReport, category: &CategoryScore) -> &'static str {
    if category.vacuous {
        "⚪"
    } else if report.strengths.contains(&category.category) {
        "🟢"
    } else if report.weaknesses.contains(&category.category) {
        "🔴"
    } else {
        "🟡"
    }
}

fn measured_rules(category: &CategoryScore) -> String {
    let measured = category.rules.iter().filter(|r| r.score.is_some()).count();
    format!("{}/{}", measured, category.rules.len())
}

fn render_highlights(report: &EvaluationReport) -> String {
    let mut s = String::new();
    for (title, categories) in [
        ("Top Strengths", &report.strengths),
        ("Key Weaknesses", &report.weaknesses),
    ] {
        let _ = writeln!(s, "## {title}\n");
        if categories.is_empty() {
            s.push_str("- None\n");
        }
        for category in categories {
            let score = report
                .category(*category)
                .map(|c| c.display_score())
                .unwrap_or_default();
            let _ = writeln!(s, "- **{}** ({:.1}/10)", category, score);
        }
        s.push('\n');
    }
    s
}

fn render_recommendations(recommendations: &[Recommendation]) -> String {
    let mut s = String::from("## Recommendations\n\n");
    if recommendations.is_empty() {
        s.push_str("- None\n");
    }
    for rec in recommendations {
        let _ = writeln!(s, "{}. {}", rec.number, rec.text);
    }
    s
}

fn render_findings(report: &EvaluationReport) -> String {
    let mut s = String::from("## Findings\n\n");
    let mut any = false;

    for category in &report.categories {
        let findings: Vec<_> = category
            .findings
            .iter()
            .filter(|f| f.kind != FindingKind::Vacuous)
            .collect();
        if findings.is_empty() {
            continue;
        }
        any = true;

        let _ = writeln!(s, "### {} ({})\n", category.category, findings.len());
        s.push_str("| Rule | Location | Message |\n|------|----------|---------|\n");
        for finding in findings.iter().take(MAX_FINDINGS_PER_CATEGORY) {
            let _ = writeln!(
                s,
                "| `{}` | `{}` | {} |",
                finding.rule_id,
                finding.location,
                escape_cell(&finding.message)
            );
        }
        if findings.len() > MAX_FINDINGS_PER_CATEGORY {
            let _ = writeln!(
                s,
                "\n_...and {} more_",
                findings.len() - MAX_FINDINGS_PER_CATEGORY
            );
        }
        s.push('\n');
    }

    if !any {
        s.push_str("No findings. 🎉\n");
    }
    s
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;
    use crate::reporters::{build_recommendations, DEFAULT_RECOMMENDATION_CAP};

    #[test]
    fn test_markdown_render() {
        let report = test_report();
        let recs = build_recommendations(&report, DEFAULT_RECOMMENDATION_CAP);
        let md = render(&report, &recs);

        assert!(md.starts_with("# Style Evaluation Report\n\n**Overall Score:** 8.5/10\n"));
        assert!(md.contains("| Function Design | 4.5/10 🔴 | 0/0 | 3 |"));
        assert!(md.contains("| Testing | 10.0/10 ⚪ | 0/0 | 0 |"));
        assert!(md.contains("## Key Weaknesses\n\n- **Function Design** (4.5/10)\n"));
        assert!(md.contains("### Function Design (3)"));
        assert!(md.contains("1. Function Design: Split functions longer than 40 lines"));
        assert!(!md.contains("### Testing"));
    }

    #[test]
    fn test_markdown_no_findings() {
        let mut report = test_report();
        for category in &mut report.categories {
            category.findings.clear();
        }
        let md = render(&report, &[]);
        assert!(md.contains("## Recommendations\n\n- None\n"));
        assert!(md.contains("No findings."));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b\nc"), "a\\|b c");
    }
}
