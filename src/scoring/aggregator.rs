//! Aggregation of category scores into the final report

use crate::config::{CategoryWeights, ProjectConfig};
use crate::error::AggregateError;
use crate::models::{round1, Category, CategoryScore, EvaluationReport, SnapshotSummary};
use tracing::{debug, info};

/// Default threshold for "Top Strengths"
pub const DEFAULT_STRENGTH_THRESHOLD: f64 = 9.0;
/// Default threshold for "Key Weaknesses"
pub const DEFAULT_WEAKNESS_THRESHOLD: f64 = 6.0;

/// Knobs for combining category scores
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOptions {
    pub weights: CategoryWeights,
    pub strength_threshold: f64,
    pub weakness_threshold: f64,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            strength_threshold: DEFAULT_STRENGTH_THRESHOLD,
            weakness_threshold: DEFAULT_WEAKNESS_THRESHOLD,
        }
    }
}

impl From<&ProjectConfig> for AggregateOptions {
    fn from(config: &ProjectConfig) -> Self {
        Self {
            weights: config.category_weights(),
            strength_threshold: config.scoring.strength_threshold,
            weakness_threshold: config.scoring.weakness_threshold,
        }
    }
}

/// Combines exactly one score per category into an `EvaluationReport`
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    options: AggregateOptions,
    snapshot: SnapshotSummary,
    rule_count: usize,
}

impl Aggregator {
    pub fn new(options: AggregateOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Attach fact counters for display
    pub fn with_snapshot(mut self, snapshot: SnapshotSummary) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn with_rule_count(mut self, rule_count: usize) -> Self {
        self.rule_count = rule_count;
        self
    }

    /// Build the report
    ///
    /// Fails unless every category is present exactly once. Categories are
    /// reordered into declaration order.
    pub fn aggregate(
        &self,
        scores: Vec<CategoryScore>,
    ) -> Result<EvaluationReport, AggregateError> {
        let mut slots: [Option<CategoryScore>; 10] = Default::default();
        for score in scores {
            let slot = &mut slots[score.category.index()];
            if slot.is_some() {
                return Err(AggregateError::DuplicateCategory(score.category));
            }
            *slot = Some(score);
        }

        let missing: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| slots[c.index()].is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AggregateError::IncompleteEvaluation { missing });
        }

        let categories: Vec<CategoryScore> = slots.into_iter().flatten().collect();

        let weights = &self.options.weights;
        let overall: f64 = categories
            .iter()
            .map(|c| weights.get(c.category) * c.score)
            .sum();
        let overall_score = round1(overall.clamp(0.0, 10.0));

        let strengths = ranked(&categories, true, |s| s >= self.options.strength_threshold);
        let weaknesses = ranked(&categories, false, |s| s <= self.options.weakness_threshold);

        debug!(
            "Aggregated {} categories: {} strengths, {} weaknesses",
            categories.len(),
            strengths.len(),
            weaknesses.len()
        );
        info!("Overall score: {:.1}/10", overall_score);

        Ok(EvaluationReport {
            overall_score,
            categories,
            strengths,
            weaknesses,
            snapshot: self.snapshot.clone(),
            rule_count: self.rule_count,
        })
    }
}

/// Categories whose rounded score passes `keep`, ordered by score
///
/// Ties keep declaration order.
fn ranked(
    categories: &[CategoryScore],
    best_first: bool,
    keep: impl Fn(f64) -> bool,
) -> Vec<Category> {
    let mut selected: Vec<(Category, f64)> = categories
        .iter()
        .map(|c| (c.category, c.display_score()))
        .filter(|(_, score)| keep(*score))
        .collect();
    if best_first {
        selected.sort_by(|a, b| b.1.total_cmp(&a.1));
    } else {
        selected.sort_by(|a, b| a.1.total_cmp(&b.1));
    }
    selected.into_iter().map(|(category, _)| category).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(category: Category, value: f64) -> CategoryScore {
        CategoryScore {
            category,
            score: value,
            vacuous: false,
            rules: Vec::new(),
            findings: Vec::new(),
        }
    }

    fn all_scores(values: [f64; 10]) -> Vec<CategoryScore> {
        Category::ALL
            .into_iter()
            .zip(values)
            .map(|(c, v)| score(c, v))
            .collect()
    }

    #[test]
    fn test_overall_is_mean_with_equal_weights() {
        let report = Aggregator::default()
            .aggregate(all_scores([10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]))
            .expect("aggregate");
        assert_eq!(report.overall_score, 5.5);
        assert_eq!(report.categories.len(), 10);
    }

    #[test]
    fn test_all_perfect() {
        let report = Aggregator::default()
            .aggregate(all_scores([10.0; 10]))
            .expect("aggregate");
        assert_eq!(report.overall_score, 10.0);
        assert_eq!(report.strengths, Category::ALL.to_vec());
        assert!(report.weaknesses.is_empty());
    }

    #[test]
    fn test_missing_category_is_incomplete() {
        let mut scores = all_scores([8.0; 10]);
        scores.retain(|s| s.category != Category::Logging);
        let err = Aggregator::default().aggregate(scores).unwrap_err();
        assert_eq!(
            err,
            AggregateError::IncompleteEvaluation {
                missing: vec![Category::Logging]
            }
        );
        assert!(err.to_string().contains("Logging"));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let mut scores = all_scores([8.0; 10]);
        scores.push(score(Category::Naming, 3.0));
        let err = Aggregator::default().aggregate(scores).unwrap_err();
        assert_eq!(err, AggregateError::DuplicateCategory(Category::Naming));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut scores = all_scores([10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        scores.reverse();
        let report = Aggregator::default().aggregate(scores).expect("aggregate");
        let order: Vec<_> = report.categories.iter().map(|c| c.category).collect();
        assert_eq!(order, Category::ALL.to_vec());
    }

    #[test]
    fn test_strengths_and_weaknesses_ordering() {
        let report = Aggregator::default()
            .aggregate(all_scores([9.0, 9.5, 8.0, 2.0, 6.0, 9.5, 4.0, 7.0, 8.0, 5.96]))
            .expect("aggregate");
        assert_eq!(
            report.strengths,
            vec![Category::Naming, Category::Configuration, Category::Layout]
        );
        // 5.96 rounds to 6.0 and ties with ErrorHandling; declaration order wins
        assert_eq!(
            report.weaknesses,
            vec![
                Category::ClassDesign,
                Category::Testing,
                Category::ErrorHandling,
                Category::VersionControl
            ]
        );
    }

    #[test]
    fn test_rounded_score_decides_threshold() {
        let report = Aggregator::default()
            .aggregate(all_scores([8.96, 6.04, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0]))
            .expect("aggregate");
        assert_eq!(report.strengths, vec![Category::Layout]);
        assert_eq!(report.weaknesses, vec![Category::Naming]);
    }

    #[test]
    fn test_custom_weights() {
        let mut values = [0.0; 10];
        values[Category::Testing.index()] = 10.0;
        let mut weights = [0.0; 10];
        weights[Category::Testing.index()] = 0.5;
        weights[Category::Logging.index()] = 0.5;
        let options = AggregateOptions {
            weights: CategoryWeights::from(weights),
            ..Default::default()
        };
        let report = Aggregator::new(options)
            .aggregate(all_scores(values))
            .expect("aggregate");
        assert_eq!(report.overall_score, 5.0);
    }
}
