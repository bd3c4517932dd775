//! Row layout grouping
//!
//! Fields are laid out on a 24-unit grid. Consecutive fields accumulate
//! into a row until an addition would exceed the row budget, at which
//! point a new row starts. Grouping never reorders fields.

use crate::field::FieldSchema;
use dynaform_core::ROW_SPAN_MAX;

/// One layout row: indices into the schema array plus the used span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Indices of the fields in this row, in schema order
    pub fields: Vec<usize>,

    /// Accumulated span, at most [`ROW_SPAN_MAX`]
    pub span: u8,
}

/// Group a schema's fields into rows of at most 24 span units.
pub fn group_rows(fields: &[FieldSchema]) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    let mut current = Row {
        fields: Vec::new(),
        span: 0,
    };

    for (index, field) in fields.iter().enumerate() {
        let span = field.effective_span();
        if current.span + span > ROW_SPAN_MAX && !current.fields.is_empty() {
            rows.push(std::mem::replace(
                &mut current,
                Row {
                    fields: Vec::new(),
                    span: 0,
                },
            ));
        }
        current.fields.push(index);
        current.span += span;
    }

    if !current.fields.is_empty() {
        rows.push(current);
    }

    rows
}

// ============================================================================
// Tests
// ============================================================================
