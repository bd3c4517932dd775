//! # Dynaform CLI
//!
//! Command-line interface for Dynaform.
//!
//! This crate provides CLI tools for working with field-schema documents
//! from the command line without a frontend.
//!
//! ## Commands
//!
//! - `validate` - Validate a schema document
//! - `info` - Display fields, layout, and dependencies of a schema
//! - `generate` - Emit HTML form markup from a schema
//! - `simulate` - Drive a live form: write values, watch propagation, submit
//!

pub mod commands;

// Re-export dependencies for use in main.rs
pub use dynaform_codegen;
pub use dynaform_core;
pub use dynaform_form;
pub use dynaform_schema;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Argument definitions
// ============================================================================

/// Dynamic form engine: validate schemas, inspect layouts, generate markup
#[derive(Debug, Parser)]
#[command(name = "dynaform", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a schema document, reporting every violation
    Validate {
        /// Path to the schema JSON file, or `-` for stdin
        file: PathBuf,
    },

    /// Display the fields, row layout, and dependencies of a schema
    Info {
        /// Path to the schema JSON file, or `-` for stdin
        file: PathBuf,
    },

    /// Generate HTML form markup from a schema
    Generate {
        /// Path to the schema JSON file, or `-` for stdin
        file: PathBuf,

        /// Write the markup here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Omit row comments from the markup
        #[arg(long)]
        no_comments: bool,
    },

    /// Drive a live form: apply writes in order, then optionally submit
    Simulate {
        /// Path to the schema JSON file, or `-` for stdin
        file: PathBuf,

        /// A write to apply, as NAME=VALUE (repeatable, applied in order)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        sets: Vec<String>,

        /// Submit after the writes and print the value map as JSON
        #[arg(long)]
        submit: bool,
    },
}

/// Dispatch a parsed invocation
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Validate { file } => commands::validate(&file),
        Command::Info { file } => commands::info(&file),
        Command::Generate {
            file,
            output,
            no_comments,
        } => commands::generate(&file, output.as_deref(), no_comments),
        Command::Simulate { file, sets, submit } => commands::simulate(&file, &sets, submit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["dynaform", "validate", "schema.json"]).unwrap();
        assert!(matches!(cli.command, Command::Validate { .. }));

        let cli = Cli::try_parse_from([
            "dynaform", "simulate", "schema.json", "--set", "a=1", "--set", "b=2", "--submit",
        ])
        .unwrap();
        match cli.command {
            Command::Simulate { sets, submit, .. } => {
                assert_eq!(sets, vec!["a=1", "b=2"]);
                assert!(submit);
            }
            _ => panic!("expected simulate"),
        }
    }
}
