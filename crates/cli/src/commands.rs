//! Command implementations
//!
//! Each subcommand reads the schema document (file or stdin), hands it to
//! the engine crates, and prints human-oriented output. Validation
//! failures are printed in full, one line per violation, before the
//! command exits non-zero.

use anyhow::{Context, bail};
use colored::Colorize;
use dynaform_codegen::{CodeGenContext, GeneratedFile, render_form};
use dynaform_core::{FieldType, FieldValue};
use dynaform_form::FormController;
use dynaform_schema::{FieldSchema, group_rows, parse_schema};
use std::io::Read;
use std::path::Path;

// ============================================================================
// validate
// ============================================================================

/// Parse and validate a schema, printing every violation or a summary
pub fn validate(file: &Path) -> anyhow::Result<()> {
    let fields = read_schema(file)?;
    let rows = group_rows(&fields);
    println!(
        "{} schema valid: {} field(s) in {} row(s)",
        "✓".green().bold(),
        fields.len(),
        rows.len()
    );
    Ok(())
}

// ============================================================================
// info
// ============================================================================

/// Print the field table, dependency summary, and row layout of a schema
pub fn info(file: &Path) -> anyhow::Result<()> {
    let fields = read_schema(file)?;

    println!(
        "{:<16} {:<8} {:<9} {:<5} DEPENDENCIES",
        "NAME".bold(),
        "TYPE".bold(),
        "REQUIRED".bold(),
        "SPAN".bold()
    );
    for field in &fields {
        println!(
            "{:<16} {:<8} {:<9} {:<5} {}",
            field.name,
            field.field_type.display_name(),
            if field.required { "yes" } else { "no" },
            field.effective_span(),
            dependency_summary(field)
        );
    }

    println!();
    for (number, row) in group_rows(&fields).iter().enumerate() {
        let names: Vec<&str> = row.fields.iter().map(|&i| fields[i].name.as_str()).collect();
        println!("row {}: {} ({}/24)", number + 1, names.join(", "), row.span);
    }

    Ok(())
}

fn dependency_summary(field: &FieldSchema) -> String {
    let mut parts = Vec::new();
    if let Some(controller) = field.controlling_field() {
        parts.push(format!("depends on {}", controller));
    }
    if let Some(mapping) = &field.reverse_mapping {
        parts.push(format!("fills {}", mapping.targets.join(", ")));
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join("; ")
    }
}

// ============================================================================
// generate
// ============================================================================

/// Validate a schema and emit its HTML form markup
pub fn generate(file: &Path, output: Option<&Path>, no_comments: bool) -> anyhow::Result<()> {
    let fields = read_schema(file)?;

    let mut ctx = CodeGenContext::new();
    if no_comments {
        ctx = ctx.without_comments();
    }

    match output {
        Some(path) => {
            let generated = GeneratedFile::html(path, &fields, &ctx)?;
            generated.write_to(Path::new("."))?;
            println!("{} wrote {}", "✓".green().bold(), path.display());
        }
        None => {
            let markup = render_form(&fields, &ctx)?;
            print!("{}", markup);
        }
    }

    Ok(())
}

// ============================================================================
// simulate
// ============================================================================

/// Build a live form, apply writes in order, and optionally submit
pub fn simulate(file: &Path, sets: &[String], submit: bool) -> anyhow::Result<()> {
    let fields = read_schema(file)?;
    let mut form = match FormController::new(fields) {
        Ok(form) => form,
        Err(report) => {
            print_report(&report);
            bail!("schema rejected with {} error(s)", report.len());
        }
    };

    for assignment in sets {
        let (name, raw) = parse_assignment(assignment)?;
        let Some(field) = form.field(name) else {
            bail!("unknown field '{}'", name);
        };
        let value = parse_cli_value(field.field_type, raw)?;
        let dirty = form.set_value(name, value)?;
        let touched: Vec<&str> = dirty.iter().map(String::as_str).collect();
        println!(
            "{} {} = {} (touched: {})",
            "set".cyan(),
            name,
            raw,
            touched.join(", ")
        );
    }

    if submit {
        match form.submit() {
            Ok(values) => println!("{}", serde_json::to_string_pretty(&values)?),
            Err(report) => {
                print_report(&report);
                bail!("submit failed with {} error(s)", report.len());
            }
        }
    }

    Ok(())
}

/// Split a NAME=VALUE argument
fn parse_assignment(raw: &str) -> anyhow::Result<(&str, &str)> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .with_context(|| format!("expected NAME=VALUE, got '{}'", raw))
}

/// Interpret a raw command-line value against the field's declared type
fn parse_cli_value(field_type: FieldType, raw: &str) -> anyhow::Result<FieldValue> {
    match field_type {
        // Date text is coerced by the controller at the write boundary
        FieldType::String | FieldType::Date => Ok(FieldValue::Text(raw.to_string())),
        FieldType::Number => raw
            .parse::<f64>()
            .map(FieldValue::Number)
            .with_context(|| format!("'{}' is not a number", raw)),
        FieldType::Boolean => match raw {
            "true" => Ok(FieldValue::Boolean(true)),
            "false" => Ok(FieldValue::Boolean(false)),
            _ => bail!("'{}' is not true or false", raw),
        },
        // Option values may be numbers or booleans; anything else is text
        FieldType::Select => Ok(match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Bool(b)) => FieldValue::Boolean(b),
            Ok(serde_json::Value::Number(n)) => n
                .as_f64()
                .map(FieldValue::Number)
                .unwrap_or_else(|| FieldValue::Text(raw.to_string())),
            _ => FieldValue::Text(raw.to_string()),
        }),
    }
}

// ============================================================================
// Input handling
// ============================================================================

/// Read and validate a schema document from a file or stdin (`-`),
/// printing every violation before failing
fn read_schema(file: &Path) -> anyhow::Result<Vec<FieldSchema>> {
    let text = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read schema from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?
    };

    match parse_schema(&text) {
        Ok(fields) => {
            tracing::debug!(count = fields.len(), "schema accepted");
            Ok(fields)
        }
        Err(report) => {
            print_report(&report);
            bail!("schema rejected with {} error(s)", report.len());
        }
    }
}

fn print_report(report: &dynaform_core::ErrorReport) {
    for error in report.iter() {
        eprintln!("{} {}", "✗".red().bold(), error);
    }
}

// ============================================================================
// Tests
// ============================================================================
