//! Rule registry
//!
//! Built once at startup from the (tailored) catalog and read-only after
//! that. Registration order is preserved per category so reports are
//! deterministic.

use super::base::Rule;
use super::catalog::RuleSpec;
use super::check::DeclarativeRule;
use crate::error::RegistryError;
use crate::models::Category;
use std::sync::Arc;
use tracing::debug;

/// Tolerance for per-category weight sums
pub const WEIGHT_EPSILON: f64 = 1e-6;

/// Catalog of registered rules, grouped by category
#[derive(Default)]
pub struct RuleRegistry {
    /// One bucket per category, indexed by `Category::index()`
    buckets: [Vec<Arc<dyn Rule>>; 10],
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every spec, then verify each category sums to 1.0
    pub fn from_specs(specs: impl IntoIterator<Item = RuleSpec>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(Arc::new(DeclarativeRule::new(spec)?))?;
        }
        registry.verify()?;
        debug!(
            "Registered {} rules across {} categories",
            registry.len(),
            registry.categories().len()
        );
        Ok(registry)
    }

    /// The standard rubric with no overrides
    pub fn standard() -> Result<Self, RegistryError> {
        Self::from_specs(super::catalog::standard())
    }

    /// Register a rule
    ///
    /// Fails if the id is taken or the category's weights would exceed 1.0.
    pub fn register(&mut self, rule: Arc<dyn Rule>) -> Result<(), RegistryError> {
        if self.get(rule.id()).is_some() {
            return Err(RegistryError::DuplicateRule {
                id: rule.id().to_string(),
            });
        }

        let category = rule.category();
        let weight = rule.weight();
        let total = self.weight_sum(category) + weight;
        if !weight.is_finite() || weight <= 0.0 || total > 1.0 + WEIGHT_EPSILON {
            return Err(RegistryError::InvalidWeight {
                category,
                rule: rule.id().to_string(),
                total,
            });
        }

        self.buckets[category.index()].push(rule);
        Ok(())
    }

    /// Check that every populated category sums to 1.0
    pub fn verify(&self) -> Result<(), RegistryError> {
        for category in self.categories() {
            let total = self.weight_sum(category);
            if (total - 1.0).abs() > WEIGHT_EPSILON {
                let rule = self
                    .rules_for(category)
                    .last()
                    .map(|r| r.id().to_string())
                    .unwrap_or_default();
                return Err(RegistryError::InvalidWeight {
                    category,
                    rule,
                    total,
                });
            }
        }
        Ok(())
    }

    /// Rules for a category, in registration order
    pub fn rules_for(&self, category: Category) -> &[Arc<dyn Rule>] {
        &self.buckets[category.index()]
    }

    /// Categories with at least one rule, in declaration order
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| !self.buckets[c.index()].is_empty())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.iter().find(|r| r.id() == id)
    }

    /// All rules, category by category
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.buckets.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn weight_sum(&self, category: Category) -> f64 {
        self.rules_for(category).iter().map(|r| r.weight()).sum()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.iter().map(|r| r.id()).collect::<Vec<_>>())
            .finish()
    }
}
