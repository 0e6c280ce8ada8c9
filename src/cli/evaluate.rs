//! Evaluate command - score a fact file and render the report

use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::config::{load_config_file, load_project_config, ProjectConfig};
use crate::facts::load_fact_model;
use crate::pipeline::Evaluation;
use crate::reporters::{OutputFormat, ReportBuilder};

/// Arguments of `stylegrade evaluate`
#[derive(Debug)]
pub(super) struct EvaluateArgs {
    pub facts: PathBuf,
    pub config: Option<PathBuf>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub fail_under: Option<f64>,
    pub workers: Option<usize>,
}

pub(super) fn run(args: EvaluateArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref())?;

    let format_name = args
        .format
        .or_else(|| config.defaults.format.clone())
        .unwrap_or_else(|| "text".to_string());
    let format = OutputFormat::from_str(&format_name)?;
    let workers = args.workers.or(config.defaults.workers).unwrap_or(0);

    let facts = load_fact_model(&args.facts)
        .with_context(|| format!("Failed to load facts from {}", args.facts.display()))?;

    let report = Evaluation::from_config(&config)?
        .with_workers(workers)
        .run(&facts)?;

    let rendered = ReportBuilder::new(format, config.report.recommendation_cap).build(&report)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => print!("{rendered}"),
    }

    check_fail_threshold(args.fail_under, report.overall_score);
    Ok(())
}

/// Explicit config paths must load; discovery falls back to defaults
fn resolve_config(explicit: Option<&Path>) -> Result<ProjectConfig> {
    match explicit {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            debug!("Looking for config in {}", cwd.display());
            Ok(load_project_config(&cwd))
        }
    }
}

/// Exit with code 1 when the score is below `--fail-under`
fn check_fail_threshold(fail_under: Option<f64>, overall_score: f64) {
    if let Some(threshold) = fail_under {
        if overall_score < threshold {
            eprintln!(
                "{} Overall score {:.1} is below --fail-under={}",
                style("✗").red(),
                overall_score,
                threshold
            );
            std::process::exit(1);
        }
    }
}
