//! Project-level configuration support
//!
//! Loads per-project configuration from `stylegrade.toml` or
//! `.stylegraderc.json` in the working directory, or from an explicit
//! `--config` path.
//!
//! # Configuration Format
//!
//! ```toml
//! # stylegrade.toml
//!
//! [scoring]
//! strength_threshold = 9.0
//! weakness_threshold = 6.0
//!
//! # Must sum to 1.0 across all ten categories; unlisted ones default to 0.1
//! [scoring.category_weights]
//! naming = 0.15
//! version_control = 0.05
//!
//! [report]
//! recommendation_cap = 5
//!
//! [rules.function-max-length]
//! limit = 60
//!
//! [rules.commit-subject-length]
//! enabled = false
//!
//! [defaults]
//! format = "text"
//! workers = 8
//! ```

use crate::error::ConfigError;
use crate::models::Category;
use crate::rules::{catalog, RuleSpec, WEIGHT_EPSILON};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Config file names searched, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["stylegrade.toml", ".stylegraderc.json"];

/// Upper bound on worker threads, shared with `--workers`
pub const MAX_WORKERS: usize = 64;

/// Project-level configuration loaded from stylegrade.toml or similar
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProjectConfig {
    /// Category weights and strength/weakness thresholds
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Report rendering options
    #[serde(default)]
    pub report: ReportConfig,

    /// Per-rule overrides keyed by rule id
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOverride>,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Override for a single rule
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RuleOverride {
    /// Whether the rule is enabled (default: true)
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Replacement for the rule's numeric threshold
    #[serde(default)]
    pub limit: Option<f64>,
}

/// Scoring configuration for the aggregate score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Category weight overrides (unlisted categories keep 0.1)
    #[serde(default)]
    pub category_weights: BTreeMap<Category, f64>,

    /// Categories at or above this score are strengths (default: 9.0)
    #[serde(default = "default_strength_threshold")]
    pub strength_threshold: f64,

    /// Categories at or below this score are weaknesses (default: 6.0)
    #[serde(default = "default_weakness_threshold")]
    pub weakness_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            category_weights: BTreeMap::new(),
            strength_threshold: default_strength_threshold(),
            weakness_threshold: default_weakness_threshold(),
        }
    }
}

fn default_strength_threshold() -> f64 {
    9.0
}

fn default_weakness_threshold() -> f64 {
    6.0
}

/// Report rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// Maximum recommendations per category (default: 5)
    #[serde(default = "default_recommendation_cap")]
    pub recommendation_cap: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            recommendation_cap: default_recommendation_cap(),
        }
    }
}

fn default_recommendation_cap() -> usize {
    5
}

/// Default CLI flags from config
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CliDefaults {
    /// Default output format (text, json, markdown)
    #[serde(default)]
    pub format: Option<String>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Weight of each category in the overall score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryWeights([f64; 10]);

impl Default for CategoryWeights {
    fn default() -> Self {
        Self([0.1; 10])
    }
}

impl From<[f64; 10]> for CategoryWeights {
    /// Weights indexed by `Category::index()`
    fn from(weights: [f64; 10]) -> Self {
        Self(weights)
    }
}

impl CategoryWeights {
    /// Equal weights with the given overrides applied
    pub fn with_overrides(overrides: &BTreeMap<Category, f64>) -> Self {
        let mut weights = Self::default();
        for (category, weight) in overrides {
            weights.0[category.index()] = *weight;
        }
        weights
    }

    pub fn get(&self, category: Category) -> f64 {
        self.0[category.index()]
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Validate that weights sum to 1.0 (with tolerance)
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|w| *w >= 0.0) && (self.sum() - 1.0).abs() <= WEIGHT_EPSILON
    }
}

impl ProjectConfig {
    /// Effective category weights
    pub fn category_weights(&self) -> CategoryWeights {
        CategoryWeights::with_overrides(&self.scoring.category_weights)
    }

    /// Validate everything that can be checked before evaluation starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (category, weight) in &self.scoring.category_weights {
            if *weight < 0.0 || !weight.is_finite() {
                return Err(ConfigError::NegativeWeight {
                    category: *category,
                    weight: *weight,
                });
            }
        }
        let weights = self.category_weights();
        if !weights.is_valid() {
            return Err(ConfigError::WeightSum {
                total: weights.sum(),
            });
        }

        for (name, value) in [
            ("strength", self.scoring.strength_threshold),
            ("weakness", self.scoring.weakness_threshold),
        ] {
            if !(0.0..=10.0).contains(&value) {
                return Err(ConfigError::Threshold { name, value });
            }
        }

        if self.report.recommendation_cap == 0 {
            return Err(ConfigError::RecommendationCap);
        }

        if let Some(workers) = self.defaults.workers {
            if !(1..=MAX_WORKERS).contains(&workers) {
                return Err(ConfigError::Workers {
                    workers,
                    max: MAX_WORKERS,
                });
            }
        }

        // Unknown ids, non-finite limits and limit overrides on limitless rules
        self.rule_specs().map(|_| ())
    }

    /// The standard catalog tailored by the `[rules]` overrides
    pub fn rule_specs(&self) -> Result<Vec<RuleSpec>, ConfigError> {
        catalog::tailor(catalog::standard(), &self.rules)
    }

    /// Rule ids disabled by configuration
    pub fn disabled_rules(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|(_, o)| o.enabled == Some(false))
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

/// Load project configuration from a directory
///
/// Returns default configuration if no config file is found or if the
/// file cannot be parsed.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {:#}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from an explicit path (TOML, or JSON by extension)
pub fn load_config_file(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?
    } else {
        toml::from_str(&content).with_context(|| format!("Invalid TOML in {}", path.display()))?
    };
    Ok(config)
}

/// Example configuration written by `stylegrade init`
pub fn example_config() -> &'static str {
    r#"# stylegrade configuration

[scoring]
# Categories at or above this score are listed as strengths
strength_threshold = 9.0
# Categories at or below this score are listed as key weaknesses
weakness_threshold = 6.0

# Category weights must sum to 1.0; unlisted categories weigh 0.1
# [scoring.category_weights]
# naming = 0.15
# version_control = 0.05

[report]
# Maximum recommendations per category
recommendation_cap = 5

# Per-rule overrides (see `stylegrade rules` for ids)
# [rules.function-max-length]
# limit = 60
#
# [rules.commit-subject-length]
# enabled = false

[defaults]
format = "text"
"#
}

#[cfg(test)]
mod tests;
