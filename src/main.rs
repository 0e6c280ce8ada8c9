//! stylegrade - rubric-driven style evaluation CLI
//!
//! Scores the facts an extractor observed about a Python codebase against
//! a ten-category style rubric.

use anyhow::Result;
use clap::Parser;
use stylegrade::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stylegrade={}", cli.log_level)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
