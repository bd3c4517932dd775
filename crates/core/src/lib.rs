//! # Dynaform Core
//!
//! Core types, traits, and error handling for the Dynaform form engine.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace:
//!
//! - **Types**: the field type tag, the tagged value union, select options
//! - **Traits**: `Validatable` and `CodeGenerable`
//! - **Errors**: unified error handling with `FormError`, `FormResult`,
//!   and the multi-error `ErrorReport`

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ErrorReport, FormError, FormResult};
pub use traits::{CodeGenContext, CodeGenerable, Validatable};
pub use types::{FieldType, FieldValue, OptionItem, ROW_SPAN_MAX, in_options};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
