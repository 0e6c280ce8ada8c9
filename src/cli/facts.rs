//! Facts command - summarize a fact file

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::facts::load_fact_model;

pub(super) fn run(path: &Path) -> Result<()> {
    let model = load_fact_model(path)
        .with_context(|| format!("Failed to load facts from {}", path.display()))?;
    let counters = model.counters();

    println!("\n{} {}\n", style("Facts for").bold(), style(model.root().display()).cyan());
    if let Some(at) = model.extracted_at() {
        println!("  Extracted:  {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("  Facts:      {}", model.len());
    println!("  Files:      {}", counters.files);
    println!(
        "  Functions:  {} ({} documented)",
        counters.functions, counters.documented_functions
    );
    println!("  Classes:    {}", counters.classes);
    println!("  Tests:      {}", counters.tests);
    println!("  Handlers:   {}", counters.except_handlers);
    println!("  Log calls:  {}", counters.log_calls);

    println!("\n{}", style("By kind").bold());
    for (kind, count) in model.kind_counts() {
        println!("  {:<26} {}", kind.as_str(), count);
    }
    println!();
    Ok(())
}
