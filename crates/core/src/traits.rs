//! Core traits for Dynaform
//!
//! The traits here define the behaviors shared across the schema and
//! codegen layers: self-validation and text emission.

use crate::error::FormResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can check their own internal consistency
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or a `FormError` describing the problem.
    fn validate(&self) -> FormResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// CodeGenerable Trait
// ============================================================================

/// Context passed to markup generation methods
#[derive(Debug, Clone)]
pub struct CodeGenContext {
    /// Indentation level
    pub indent_level: usize,

    /// Number of spaces per indent level
    pub spaces_per_indent: usize,

    /// Whether to include comments in the generated markup
    pub include_comments: bool,
}

impl CodeGenContext {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            spaces_per_indent: 2,
            include_comments: true,
        }
    }

    /// Get the current indentation string
    pub fn indent(&self) -> String {
        " ".repeat(self.indent_level * self.spaces_per_indent)
    }

    /// Create a new context with increased indentation
    pub fn indented(&self) -> Self {
        Self {
            indent_level: self.indent_level + 1,
            ..self.clone()
        }
    }

    /// Disable comment emission
    pub fn without_comments(mut self) -> Self {
        self.include_comments = false;
        self
    }
}

impl Default for CodeGenContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for types that can emit a source-text representation
pub trait CodeGenerable {
    /// Generate text for this type
    fn generate(&self, ctx: &CodeGenContext) -> FormResult<String>;

    /// Generate text with the default context
    fn generate_default(&self) -> FormResult<String> {
        self.generate(&CodeGenContext::new())
    }
}

// ============================================================================
// Tests
// ============================================================================
