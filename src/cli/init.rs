//! Init command - write an example stylegrade.toml

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::config::{example_config, CONFIG_FILE_NAMES};

/// Run the init command
pub fn run(path: &Path, force: bool) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    println!("\n{} Initializing stylegrade\n", style("✎").bold());

    let config_path = dir.join(CONFIG_FILE_NAMES[0]);
    if config_path.exists() && !force {
        println!(
            "{} Already initialized at {} (use {} to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan(),
            style("--force").yellow()
        );
        return Ok(());
    }

    std::fs::write(&config_path, example_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\n{}", style("Next steps:").bold());
    println!(
        "  1. Extract facts for your codebase into {}",
        style("facts.json").cyan()
    );
    println!(
        "  2. Run {}",
        style("stylegrade evaluate facts.json").cyan()
    );
    println!();

    Ok(())
}
