//! Evaluation pipeline
//!
//! Orchestrates one full run:
//! 1. Score every registered category in parallel
//! 2. Wait for all of them (join barrier)
//! 3. Aggregate into an `EvaluationReport`
//!
//! The pipeline only reads the fact model and the registry, so running it
//! twice on the same inputs yields the same report.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::ProjectConfig;
use crate::facts::FactModel;
use crate::models::{CategoryScore, EvaluationReport, SnapshotSummary};
use crate::rules::RuleRegistry;
use crate::scoring::{AggregateOptions, Aggregator, CategoryEvaluator};

/// Build the rule registry a configuration asks for
pub fn registry_from_config(config: &ProjectConfig) -> Result<RuleRegistry> {
    let specs = config.rule_specs().context("Invalid rule overrides")?;
    RuleRegistry::from_specs(specs).context("Failed to build rule registry")
}

/// One evaluation run
pub struct Evaluation {
    registry: RuleRegistry,
    options: AggregateOptions,
    /// Worker threads (0 = rayon default)
    workers: usize,
}

impl Evaluation {
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            options: AggregateOptions::default(),
            workers: 0,
        }
    }

    /// Build registry and options from a validated configuration
    pub fn from_config(config: &ProjectConfig) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        let disabled = config.disabled_rules();
        if !disabled.is_empty() {
            debug!("Rules disabled by configuration: {}", disabled.join(", "));
        }
        Ok(Self::new(registry_from_config(config)?).with_options(AggregateOptions::from(config)))
    }

    pub fn with_options(mut self, options: AggregateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Evaluate `facts` and aggregate the result
    ///
    /// Fails with an incomplete-evaluation error if any category has no
    /// registered rules.
    pub fn run(&self, facts: &FactModel) -> Result<EvaluationReport> {
        let start = Instant::now();
        let categories = self.registry.categories();
        info!(
            "Evaluating {} facts with {} rules across {} categories",
            facts.len(),
            self.registry.len(),
            categories.len()
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .context("Failed to start worker pool")?;

        let evaluator = CategoryEvaluator::new(&self.registry);
        let scores: Vec<CategoryScore> = pool.install(|| {
            categories
                .par_iter()
                .map(|category| evaluator.evaluate(*category, facts))
                .collect()
        });

        let report = Aggregator::new(self.options.clone())
            .with_snapshot(SnapshotSummary::from(facts))
            .with_rule_count(self.registry.len())
            .aggregate(scores)?;

        debug!(
            "Evaluation finished in {}ms: {} findings",
            start.elapsed().as_millis(),
            report.findings().count()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::FactKind;
    use crate::models::Category;

    #[test]
    fn test_empty_model_is_all_vacuous() {
        let registry = RuleRegistry::standard().expect("registry");
        let report = Evaluation::new(registry)
            .with_workers(2)
            .run(&FactModel::empty("proj"))
            .expect("run");
        assert_eq!(report.overall_score, 10.0);
        assert!(report.categories.iter().all(|c| c.vacuous));
        assert_eq!(report.rule_count, 31);
    }

    #[test]
    fn test_missing_category_fails() {
        let config: ProjectConfig = toml::from_str(
            r#"
[rules.commit-subject-length]
enabled = false
[rules.no-committed-artifacts]
enabled = false
[rules.gitignore-present]
enabled = false
"#,
        )
        .expect("config");
        let err = Evaluation::from_config(&config)
            .expect("evaluation")
            .run(&FactModel::empty("proj"))
            .unwrap_err();
        assert!(err.to_string().contains("Version Control"), "{err}");
    }

    #[test]
    fn test_snapshot_is_recorded() {
        let facts = FactModel::builder("proj")
            .number(FactKind::FunctionLength, "a.py", 1, 12.0)
            .boolean(FactKind::DocstringPresent, "a.py", 1, true)
            .build()
            .expect("model");
        let report = Evaluation::new(RuleRegistry::standard().expect("registry"))
            .run(&facts)
            .expect("run");
        assert_eq!(report.snapshot.total_facts, 2);
        assert_eq!(report.snapshot.total_functions, 1);
        assert_eq!(
            report.category(Category::FunctionDesign).map(|c| c.score),
            Some(10.0)
        );
    }
}
