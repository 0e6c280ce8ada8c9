//! Configuration module for stylegrade
//!
//! This module handles:
//! - Project-level configuration (stylegrade.toml)
//! - Category weight overrides
//! - Rule enable/disable and threshold overrides
//! - Report and CLI defaults

mod project_config;

pub use project_config::{
    example_config,
    load_config_file,
    load_project_config,
    CategoryWeights,
    CliDefaults,
    ProjectConfig,
    ReportConfig,
    RuleOverride,
    ScoringConfig,
    CONFIG_FILE_NAMES,
    MAX_WORKERS,
};
