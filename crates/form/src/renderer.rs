//! Widget descriptors
//!
//! The renderer is a pure projection: given a field schema and the current
//! state, it describes the concrete input widget a frontend should draw.
//! It never mutates state, so any UI layer (or the CLI simulator) can call
//! it freely.

use crate::state::FormState;
use dynaform_core::{FieldType, FieldValue, OptionItem};
use dynaform_schema::FieldSchema;

/// The concrete input control a field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Single-line text input
    TextInput,
    /// Numeric input with spinners
    NumberInput,
    /// On/off toggle
    Switch,
    /// Dropdown select
    Select,
    /// Calendar date picker
    DatePicker,
}

impl WidgetKind {
    /// The widget used for a field type
    pub fn for_field_type(field_type: FieldType) -> Self {
        match field_type {
            FieldType::String => WidgetKind::TextInput,
            FieldType::Number => WidgetKind::NumberInput,
            FieldType::Boolean => WidgetKind::Switch,
            FieldType::Select => WidgetKind::Select,
            FieldType::Date => WidgetKind::DatePicker,
        }
    }
}

/// Everything a frontend needs to draw one field right now
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDescriptor {
    pub kind: WidgetKind,
    pub name: String,
    pub label: String,
    pub required: bool,
    pub span: u8,

    /// Current value, if any
    pub value: Option<FieldValue>,

    /// Current option list; static or narrowed, per the field's declaration
    pub options: Vec<OptionItem>,

    /// Hint text shown while empty; toggles have none
    pub placeholder: Option<String>,

    /// Message shown when a required field is left empty
    pub validation_message: Option<String>,
}

/// Describe the widget for one field against the current state
pub fn describe(field: &FieldSchema, state: &FormState) -> WidgetDescriptor {
    let options = if field.is_dependent() {
        state.options(&field.name).to_vec()
    } else {
        field.static_options().to_vec()
    };

    WidgetDescriptor {
        kind: WidgetKind::for_field_type(field.field_type),
        name: field.name.clone(),
        label: field.label.clone(),
        required: field.required,
        span: field.effective_span(),
        value: state.value(&field.name).cloned(),
        options,
        placeholder: field.placeholder_text(),
        validation_message: field.required.then(|| requirement_message(field)),
    }
}

/// The required-field message, matching the placeholder's verb
fn requirement_message(field: &FieldSchema) -> String {
    match field.field_type {
        FieldType::Select | FieldType::Date => format!("กรุณาเลือก{}", field.label),
        _ => format!("กรุณากรอก{}", field.label),
    }
}

// ============================================================================
// Tests
// ============================================================================
