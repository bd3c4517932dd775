//! Form controller
//!
//! `FormController` owns a validated schema plus the live state and is the
//! single write path: every value enters through [`FormController::set_value`],
//! which type-checks it against the field's declaration, stores it, and
//! runs the dependency wave. Reads are cheap projections.

use crate::renderer::{WidgetDescriptor, describe};
use crate::resolver::DependencyResolver;
use crate::state::FormState;
use chrono::NaiveDate;
use dynaform_core::{
    ErrorReport, FieldType, FieldValue, FormError, FormResult, Validatable, in_options,
};
use dynaform_schema::{FieldSchema, Row, group_rows, parse_schema};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// A live form over a validated schema
#[derive(Debug)]
pub struct FormController {
    fields: Vec<FieldSchema>,
    state: FormState,
    resolver: DependencyResolver,
}

impl FormController {
    /// Create a controller over an already-validated schema.
    ///
    /// Field-level checks are re-run and static option lists seeded, so a
    /// hand-built schema gets the same guarantees as an imported one.
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self, ErrorReport> {
        let mut report = ErrorReport::new();
        for (index, field) in fields.iter().enumerate() {
            if let Err(e) = field.validate() {
                report.push(FormError::field(index, e.to_string()));
            }
        }

        let mut state = FormState::new();
        for field in &fields {
            if field.field_type == FieldType::Select {
                // Dependent selects start empty until their controller is set
                let seed = if field.is_dependent() {
                    Vec::new()
                } else {
                    field.static_options().to_vec()
                };
                state.set_options(&field.name, seed);
            }
        }

        let resolver = DependencyResolver::new(&fields);
        report.into_result(Self {
            fields,
            state,
            resolver,
        })
    }

    /// Parse, validate, and wrap a raw JSON schema document
    pub fn from_json(raw: &str) -> Result<Self, ErrorReport> {
        Self::new(parse_schema(raw)?)
    }

    /// The schema, in declaration order
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// The live state
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// The current value of a field
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.state.value(name)
    }

    /// Look up a field's schema by name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Write a value into a field and run its dependency wave.
    ///
    /// Returns the names of every field the wave touched. Writing the value
    /// a field already holds is a no-op.
    pub fn set_value(
        &mut self,
        name: &str,
        value: FieldValue,
    ) -> FormResult<BTreeSet<String>> {
        let field = self
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        let value = coerce(field, value)?;

        if !self.state.set_value(name, value) {
            return Ok(BTreeSet::new());
        }
        debug!(field = %name, "value written");
        self.resolver.propagate(&self.fields, &mut self.state, name)
    }

    /// Clear a field and run its dependency wave (dependent option lists
    /// empty out, their selections clear in turn)
    pub fn clear_value(&mut self, name: &str) -> FormResult<BTreeSet<String>> {
        if self.field(name).is_none() {
            return Err(FormError::UnknownField(name.to_string()));
        }
        if !self.state.clear_value(name) {
            return Ok(BTreeSet::new());
        }
        debug!(field = %name, "value cleared");
        self.resolver.propagate(&self.fields, &mut self.state, name)
    }

    /// Describe every field's widget against the current state
    pub fn widgets(&self) -> Vec<WidgetDescriptor> {
        self.fields.iter().map(|f| describe(f, &self.state)).collect()
    }

    /// The 24-unit row layout of the schema
    pub fn rows(&self) -> Vec<Row> {
        group_rows(&self.fields)
    }

    /// Validate and collect the final value map.
    ///
    /// Every violation is reported at once: required fields without a
    /// value, and select values no longer present in their current option
    /// list.
    pub fn submit(&self) -> Result<BTreeMap<String, FieldValue>, ErrorReport> {
        let mut report = ErrorReport::new();

        for field in &self.fields {
            let value = self.state.value(&field.name);

            if field.required && value.is_none() {
                report.push(FormError::RequiredFieldMissing(field.name.clone()));
                continue;
            }

            if field.field_type == FieldType::Select {
                if let Some(value) = value {
                    let options = if field.is_dependent() {
                        self.state.options(&field.name)
                    } else {
                        field.static_options()
                    };
                    if !in_options(options, value) {
                        report.push(FormError::stale(&field.name, value.key()));
                    }
                }
            }
        }

        report.into_result(self.state.snapshot())
    }
}

/// Check a written value against the field's declared type.
///
/// Date fields accept ISO-8601 text (JSON has no date literal) and store
/// it as a proper date. Select fields accept any scalar; membership in the
/// current option list is a submit-time concern.
fn coerce(field: &FieldSchema, value: FieldValue) -> FormResult<FieldValue> {
    let actual = value.field_type();
    match field.field_type {
        FieldType::String | FieldType::Number | FieldType::Boolean => {
            if actual == field.field_type {
                Ok(value)
            } else {
                Err(FormError::type_mismatch(
                    &field.name,
                    field.field_type.display_name(),
                    actual.display_name(),
                ))
            }
        }
        FieldType::Date => match &value {
            FieldValue::Date(_) => Ok(value),
            FieldValue::Text(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(FieldValue::Date)
                .map_err(|_| {
                    FormError::type_mismatch(&field.name, "date (YYYY-MM-DD)", actual.display_name())
                }),
            _ => Err(FormError::type_mismatch(
                &field.name,
                "date (YYYY-MM-DD)",
                actual.display_name(),
            )),
        },
        FieldType::Select => match value {
            FieldValue::Date(_) => Err(FormError::type_mismatch(
                &field.name,
                "select",
                actual.display_name(),
            )),
            other => Ok(other),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================
