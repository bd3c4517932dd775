//! Dynaform
//!
//! Dynamic form engine: schema validation, dependency-aware form
//! simulation, and HTML markup generation.

use clap::Parser;
use colored::Colorize;
use dynaform_cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match dynaform_cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {:#}", "error:".red().bold(), error);
            ExitCode::FAILURE
        }
    }
}
