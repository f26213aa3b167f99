//! Run command.

use super::{load_config, suite_name, Format, SelectionArgs};
use crate::checks;
use anyhow::{bail, Context, Result};
use behave_core::{Outcome, Reporter, Runner, SuiteReport, TestResult, TracingReporter};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Advances a progress bar as checks finish.
struct ProgressReporter {
    bar: ProgressBar,
    tracing: TracingReporter,
}

impl Reporter for ProgressReporter {
    fn test_started(&mut self, name: &str) {
        self.bar.set_message(name.to_string());
        self.tracing.test_started(name);
    }

    fn test_finished(&mut self, result: &TestResult) {
        self.bar.inc(1);
        self.tracing.test_finished(result);
    }

    fn suite_finished(&mut self, report: &SuiteReport) {
        self.bar.finish_and_clear();
        self.tracing.suite_finished(report);
    }
}

/// Run the checks in `file`.
pub fn run(
    file: &Path,
    config_path: Option<&Path>,
    selection: &SelectionArgs,
    format: &str,
    fail_fast: bool,
) -> Result<()> {
    let format = Format::parse(format)?;
    let mut config = load_config(config_path)?;
    selection.apply(&mut config.runner);
    config.runner.fail_fast |= fail_fast;

    let checks = checks::load(file)
        .with_context(|| format!("Failed to load checks from {}", file.display()))?;
    let mut suite = checks::into_suite(&suite_name(file), checks, config.inspectors)?;
    let runner = Runner::new(&config.runner);

    let selected = suite
        .tests()
        .iter()
        .filter(|t| runner.selects(t.name(), t.tags()))
        .count();

    let bar = if format == Format::Text {
        let pb = ProgressBar::new(selected as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg:30!} [{bar:40.cyan/blue}] {pos}/{len}")?
                .progress_chars("█▓▒░  "),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut reporter = ProgressReporter {
        bar,
        tracing: TracingReporter,
    };
    let report = runner.run(&mut suite, &mut reporter);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => print_report(&report),
    }

    if !report.is_success() {
        bail!("{} of {} checks failed", report.failed, report.total());
    }
    Ok(())
}

fn print_report(report: &SuiteReport) {
    println!();
    println!("{}", style(format!("Checks in {}:", report.suite)).bold());

    for result in &report.results {
        match result.outcome {
            Outcome::Passed => println!("  {} {}", style("✓").green(), result.name),
            Outcome::Failed => {
                println!("  {} {}", style("×").red(), style(&result.name).red());
                if let Some(message) = &result.message {
                    for line in message.lines() {
                        println!("      {}", line);
                    }
                }
            }
            Outcome::Pending => println!(
                "  {} {} {}",
                style("…").yellow(),
                result.name,
                style("(pending)").yellow()
            ),
            Outcome::Ignored => println!(
                "  {} {} {}",
                style("-").dim(),
                style(&result.name).dim(),
                style("(ignored)").dim()
            ),
        }
    }

    println!();
    if report.is_success() {
        println!("{} {}", style("✓").green(), style(report.summary()).green());
    } else {
        println!("{}", style(report.summary()).red().bold());
    }
}
