//! Rules command - list the rubric

use anyhow::{anyhow, Context, Result};
use console::style;
use std::path::Path;

use crate::config::{load_config_file, ProjectConfig};
use crate::models::Category;

pub(super) fn run(category: Option<&str>, config: Option<&Path>) -> Result<()> {
    let filter = category
        .map(|name| {
            Category::parse(name).ok_or_else(|| {
                let valid: Vec<_> = Category::ALL.iter().map(|c| c.key()).collect();
                anyhow!("Unknown category '{}'. Valid categories: {}", name, valid.join(", "))
            })
        })
        .transpose()?;

    let config = match config {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ProjectConfig::default(),
    };
    let specs = config.rule_specs().context("Invalid rule overrides")?;

    for category in Category::ALL {
        if filter.is_some_and(|f| f != category) {
            continue;
        }
        let in_category: Vec<_> = specs.iter().filter(|s| s.category == category).collect();

        println!(
            "\n{} {}",
            style(category.display_name()).bold(),
            style(format!("({})", category.key())).dim()
        );
        if in_category.is_empty() {
            println!("  {}", style("no rules enabled").yellow());
            continue;
        }
        for spec in in_category {
            println!(
                "  {:<28} {:>5.2}  {}",
                style(spec.id).cyan(),
                spec.weight,
                spec.check.summary()
            );
            println!("  {:<28}        {}", "", style(spec.description).dim());
        }
    }
    println!();
    Ok(())
}
