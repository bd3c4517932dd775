//! # Dynaform Schema
//!
//! The field-schema data model for Dynaform.
//!
//! A form is described by a flat JSON array of field objects. This crate
//! provides:
//!
//! - **Model**: [`FieldSchema`], [`DependsOn`] (forward narrowing), and
//!   [`ReverseMapping`] (autofill)
//! - **Validation**: [`parse_schema`] / [`validate_schema`], which collect
//!   every shape violation into one report before any schema is accepted
//! - **Layout**: [`group_rows`], the 24-unit row grouping
//!
//! The schema array is immutable once accepted; a new import replaces it
//! wholesale.

pub mod field;
pub mod layout;
pub mod validate;

// Re-export commonly used types at crate root
pub use field::{DependsOn, FieldSchema, ReverseMapping};
pub use layout::{Row, group_rows};
pub use validate::{load_schema, parse_schema, validate_schema};

// Re-export core types that are commonly used with schemas
pub use dynaform_core::{
    ErrorReport, FieldType, FieldValue, FormError, FormResult, OptionItem, ROW_SPAN_MAX,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
