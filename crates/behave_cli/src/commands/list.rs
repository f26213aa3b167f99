//! List command.

use super::{load_config, suite_name, Format, SelectionArgs};
use crate::checks;
use anyhow::{Context, Result};
use behave_core::Runner;
use console::style;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ListedCheck<'a> {
    name: &'a str,
    tags: &'a [String],
    quantifier: String,
}

/// List the checks of `file` that the selection would run.
pub fn run(
    file: &Path,
    config_path: Option<&Path>,
    selection: &SelectionArgs,
    format: &str,
) -> Result<()> {
    let format = Format::parse(format)?;
    let mut config = load_config(config_path)?;
    selection.apply(&mut config.runner);

    let checks = checks::load(file)
        .with_context(|| format!("Failed to load checks from {}", file.display()))?;
    let runner = Runner::new(&config.runner);
    let listed: Vec<ListedCheck> = checks
        .iter()
        .filter(|c| runner.selects(&c.name, &c.tags))
        .map(|c| ListedCheck {
            name: &c.name,
            tags: &c.tags,
            quantifier: c.quantifier.to_string(),
        })
        .collect();

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&listed)?),
        Format::Text => {
            println!(
                "{}",
                style(format!("Checks in {}:", suite_name(file))).bold()
            );
            for check in &listed {
                if check.tags.is_empty() {
                    println!("  {} {}", style(&check.quantifier).cyan(), check.name);
                } else {
                    println!(
                        "  {} {} {}",
                        style(&check.quantifier).cyan(),
                        check.name,
                        style(format!("[{}]", check.tags.join(", "))).dim()
                    );
                }
            }
            println!();
            println!("{} of {} checks selected", listed.len(), checks.len());
        }
    }

    Ok(())
}
