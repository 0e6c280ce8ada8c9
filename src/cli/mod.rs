//! CLI command definitions and handlers

mod evaluate;
mod facts;
mod init;
mod rules;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::MAX_WORKERS;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > MAX_WORKERS {
        Err(format!("workers cannot exceed {MAX_WORKERS}"))
    } else {
        Ok(n)
    }
}

/// Parse a score threshold on the 0-10 scale
fn parse_score(s: &str) -> Result<f64, String> {
    let score: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid score", s))?;
    if (0.0..=10.0).contains(&score) {
        Ok(score)
    } else {
        Err("score must be between 0 and 10".to_string())
    }
}

/// stylegrade - Rubric-driven style evaluation for Python codebases
///
/// Reads a fact file produced by an extractor and scores the codebase
/// against ten style and architecture categories.
#[derive(Parser, Debug)]
#[command(name = "stylegrade")]
#[command(
    version,
    about = "Score a Python codebase against a ten-category style rubric",
    long_about = "stylegrade reads the source facts an extractor observed about a Python \
codebase (function lengths, names, docstrings, exception handlers, logging calls, tests) \
and scores them against a weighted rubric of ten categories.\n\n\
The result is an overall score out of 10, per-category scores, strengths, weaknesses \
and numbered recommendations.",
    after_help = "\
Examples:
  stylegrade evaluate facts.json                      Text report on stdout
  stylegrade evaluate facts.json --format json        JSON output for scripting
  stylegrade evaluate facts.json --fail-under 7.5     Exit code 1 below 7.5 (CI mode)
  stylegrade rules --category naming                  List the naming rules
  stylegrade init                                     Write a stylegrade.toml"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64, default: one per core)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a fact file and print the report
    #[command(after_help = "\
Examples:
  stylegrade evaluate facts.json
  stylegrade evaluate facts.json --format markdown -o REPORT.md
  stylegrade evaluate facts.json --config ci/stylegrade.toml --fail-under 8")]
    Evaluate {
        /// Fact file (JSON) produced by the extractor
        #[arg(value_name = "FACTS")]
        facts: PathBuf,

        /// Config file (default: stylegrade.toml or .stylegraderc.json in the current directory)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (default: text, or [defaults] format from config)
        #[arg(long, short = 'f', value_parser = ["text", "json", "markdown", "md"])]
        format: Option<String>,

        /// Write the report to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit with code 1 if the overall score is below this value
        #[arg(long, value_parser = parse_score)]
        fail_under: Option<f64>,
    },

    /// List the rubric rules and their weights
    Rules {
        /// Only show one category (e.g. naming, error_handling)
        #[arg(long)]
        category: Option<String>,

        /// Config file whose rule overrides should be applied
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Summarize a fact file without scoring it
    Facts {
        /// Fact file (JSON) produced by the extractor
        #[arg(value_name = "FACTS")]
        facts: PathBuf,
    },

    /// Initialize a stylegrade.toml config file with example settings
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Evaluate {
            facts,
            config,
            format,
            output,
            fail_under,
        } => evaluate::run(evaluate::EvaluateArgs {
            facts,
            config,
            format,
            output,
            fail_under,
            workers: cli.workers,
        }),
        Commands::Rules { category, config } => rules::run(category.as_deref(), config.as_deref()),
        Commands::Facts { facts } => facts::run(&facts),
        Commands::Init { path, force } => init::run(&path, force),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("many").is_err());
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("7.5"), Ok(7.5));
        assert!(parse_score("11").is_err());
        assert!(parse_score("-1").is_err());
    }

    #[test]
    fn test_cli_parses_evaluate() {
        let cli = Cli::try_parse_from([
            "stylegrade",
            "--workers",
            "2",
            "evaluate",
            "facts.json",
            "--format",
            "json",
            "--fail-under",
            "8",
        ])
        .expect("parse");
        assert_eq!(cli.workers, Some(2));
        match cli.command {
            Commands::Evaluate {
                facts,
                format,
                fail_under,
                ..
            } => {
                assert_eq!(facts, PathBuf::from("facts.json"));
                assert_eq!(format.as_deref(), Some("json"));
                assert_eq!(fail_under, Some(8.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
