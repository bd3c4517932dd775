//! # Dynaform Form
//!
//! The form runtime: live state over a validated schema.
//!
//! - **State**: [`FormState`], the current value and option-list maps
//! - **Resolution**: [`DependencyResolver`], the worklist that runs
//!   autofill and option narrowing until the state settles
//! - **Rendering**: [`describe`] / [`WidgetDescriptor`], pure projections
//!   of one field against the current state
//! - **Control**: [`FormController`], the single write path that
//!   type-checks, stores, propagates, and finally validates at submit
//! - **Address data**: [`AddressTable`] and [`address_schema`], the
//!   builtin Thai address dataset and the field group generated from it

pub mod address;
pub mod controller;
pub mod renderer;
pub mod resolver;
pub mod state;

// Re-export the runtime surface at crate root
pub use address::{AddressRecord, AddressTable, PostcodeResolution, address_schema};
pub use controller::FormController;
pub use renderer::{WidgetDescriptor, WidgetKind, describe};
pub use resolver::DependencyResolver;
pub use state::FormState;

// Re-export the schema and core types callers interact with
pub use dynaform_schema::{DependsOn, FieldSchema, ReverseMapping, Row, group_rows};

pub use dynaform_core::{
    ErrorReport, FieldType, FieldValue, FormError, FormResult, OptionItem, ROW_SPAN_MAX,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
