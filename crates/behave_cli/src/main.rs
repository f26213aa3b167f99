//! Behave CLI - runs declarative quantified checks from TOML files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod checks;
mod commands;

use commands::SelectionArgs;

#[derive(Parser)]
#[command(name = "behave")]
#[command(about = "Quantified assertions over collections", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./behave.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the checks in a check file
    Run {
        /// Path to the check file
        file: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Stop after the first failing check
        #[arg(long)]
        fail_fast: bool,
    },
    /// List the checks that would run
    List {
        /// Path to the check file
        file: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the effective configuration
    Config {
        /// Write a default behave.toml to the current directory
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run {
            file,
            selection,
            format,
            fail_fast,
        } => commands::run::run(&file, config_path, &selection, &format, fail_fast),
        Commands::List {
            file,
            selection,
            format,
        } => commands::list::run(&file, config_path, &selection, &format),
        Commands::Config { init } => commands::config::run(config_path, init),
    }
}
