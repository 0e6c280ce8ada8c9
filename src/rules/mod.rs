//! Rubric rules
//!
//! This module provides the rule framework and the standard rubric.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      catalog::standard()                    │
//! │  - One RuleSpec per checklist line (data, not code)         │
//! │  - Tailored by config: disabled rules, limit overrides      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       RuleRegistry                          │
//! │  - Rejects duplicate ids and overweight categories          │
//! │  - Rules grouped per category, registration order kept      │
//! │  - Read-only once built                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Rule trait                           │
//! │  - evaluate(facts) -> Option<RuleResult>                    │
//! │  - DeclarativeRule: one Check over one fact kind            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod base;
pub mod catalog;
mod check;
mod registry;

pub use base::Rule;
pub use catalog::RuleSpec;
pub use check::{Check, DeclarativeRule};
pub use registry::{RuleRegistry, WEIGHT_EPSILON};
