//! # Dynaform Codegen
//!
//! Markup generation for Dynaform.
//!
//! This crate turns an accepted field schema into exportable HTML form
//! markup:
//!
//! - **Markup**: [`render_form`] / [`render_field`], fixed-template HTML
//!   for the five field types, grouped by layout rows
//! - **Output**: [`GeneratedFile`], a path/content pair the CLI writes to
//!   disk or prints to stdout

// ============================================================================
// Modules
// ============================================================================

pub mod markup;

// ============================================================================
// Re-exports
// ============================================================================

pub use markup::{FormDocument, element_id, render_field, render_form};

pub use dynaform_core::{CodeGenContext, CodeGenerable};

use dynaform_core::FormResult;
use std::path::{Path, PathBuf};

// ============================================================================
// GeneratedFile
// ============================================================================

/// A single generated output file
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Relative output path
    pub path: PathBuf,

    /// File content
    pub content: String,
}

impl GeneratedFile {
    /// Create a new generated file
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Render a schema into an HTML file
    pub fn html(
        path: impl Into<PathBuf>,
        fields: &[dynaform_schema::FieldSchema],
        ctx: &CodeGenContext,
    ) -> FormResult<Self> {
        Ok(Self::new(path, render_form(fields, ctx)?))
    }

    /// Write the file under a base directory, creating parents as needed
    pub fn write_to(&self, base_dir: impl AsRef<Path>) -> FormResult<()> {
        let full_path = base_dir.as_ref().join(&self.path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full_path, &self.content)?;
        Ok(())
    }
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dynaform_schema::FieldSchema;

    #[test]
    fn test_generated_file_html() {
        let fields = vec![FieldSchema::string("firstName", "ชื่อ")];
        let file = GeneratedFile::html("form.html", &fields, &CodeGenContext::new()).unwrap();
        assert_eq!(file.path, PathBuf::from("form.html"));
        assert!(file.content.contains("first-name"));
    }
}
