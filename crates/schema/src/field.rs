//! Field schema definitions
//!
//! This module contains the `FieldSchema` struct and the two dependency
//! declarations a schema author can attach to a field: forward narrowing
//! (`DependsOn`) and autofill (`ReverseMapping`).

use dynaform_core::{FieldType, FieldValue, FormError, FormResult, OptionItem, ROW_SPAN_MAX, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// FieldSchema
// ============================================================================

/// Declarative description of one form input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Field type tag
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Display text
    pub label: String,

    /// Unique key within the schema; map key for field values
    pub name: String,

    /// Whether the field must have a value at submit
    #[serde(default)]
    pub required: bool,

    /// Placeholder text override (falls back to a per-type template)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Static option list; required for selects without `dependsOn`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionItem>>,

    /// Layout weight, 1–24; a full row is 24
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<u8>,

    /// Forward dependency: option lists computed from another field's value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOn>,

    /// Autofill rule: this field's value writes into other fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_mapping: Option<ReverseMapping>,
}

impl FieldSchema {
    /// Create a new field with the given name, label, and type
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_type,
            label: label.into(),
            name: name.into(),
            required: false,
            placeholder: None,
            options: None,
            span: None,
            depends_on: None,
            reverse_mapping: None,
        }
    }

    /// Create a string field
    pub fn string(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::String)
    }

    /// Create a number field
    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Number)
    }

    /// Create a boolean field
    pub fn boolean(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Boolean)
    }

    /// Create a select field with a static option list
    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<OptionItem>,
    ) -> Self {
        let mut field = Self::new(name, label, FieldType::Select);
        field.options = Some(options);
        field
    }

    /// Create a date field
    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Date)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the placeholder text
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the layout span
    pub fn with_span(mut self, span: u8) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach a forward dependency
    pub fn with_depends_on(mut self, depends_on: DependsOn) -> Self {
        self.depends_on = Some(depends_on);
        self
    }

    /// Attach a reverse mapping
    pub fn with_reverse_mapping(mut self, mapping: ReverseMapping) -> Self {
        self.reverse_mapping = Some(mapping);
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// The span used for layout; defaults to a full row
    pub fn effective_span(&self) -> u8 {
        self.span.unwrap_or(ROW_SPAN_MAX).min(ROW_SPAN_MAX)
    }

    /// The static option list, empty when none is declared
    pub fn static_options(&self) -> &[OptionItem] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Whether this field's options are computed from another field
    pub fn is_dependent(&self) -> bool {
        self.depends_on.is_some()
    }

    /// Name of the controlling field, if any
    pub fn controlling_field(&self) -> Option<&str> {
        self.depends_on.as_ref().map(|d| d.field.as_str())
    }

    /// The placeholder shown while empty: the explicit override, else a
    /// per-type Thai template. Toggles have none.
    pub fn placeholder_text(&self) -> Option<String> {
        if let Some(text) = &self.placeholder {
            return Some(text.clone());
        }
        match self.field_type {
            FieldType::String | FieldType::Number => Some(format!("กรุณากรอก{}", self.label)),
            FieldType::Select | FieldType::Date => Some(format!("กรุณาเลือก{}", self.label)),
            FieldType::Boolean => None,
        }
    }
}

impl Validatable for FieldSchema {
    fn validate(&self) -> FormResult<()> {
        if self.name.is_empty() {
            return Err(FormError::shape("field name cannot be empty"));
        }
        if self.label.is_empty() {
            return Err(FormError::shape("field label cannot be empty"));
        }
        if let Some(span) = self.span {
            if span < 1 || span > ROW_SPAN_MAX {
                return Err(FormError::shape(format!(
                    "span {} out of range 1..={}",
                    span, ROW_SPAN_MAX
                )));
            }
        }
        if self.field_type == FieldType::Select
            && self.depends_on.is_none()
            && self.static_options().is_empty()
        {
            return Err(FormError::shape(
                "select field without dependsOn requires a non-empty option list",
            ));
        }
        if let Some(dep) = &self.depends_on {
            if dep.field == self.name {
                return Err(FormError::shape("field cannot depend on itself"));
            }
        }
        if let Some(rm) = &self.reverse_mapping {
            if rm.targets.iter().any(|t| t == &self.name) {
                return Err(FormError::shape("field cannot reverse-map onto itself"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// DependsOn
// ============================================================================

/// Forward dependency declaration.
///
/// The option map is keyed by the controlling value's canonical string
/// form (`FieldValue::key`); a controlling value with no entry empties the
/// dependent field's option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependsOn {
    /// Name of the controlling field
    pub field: String,

    /// Replacement option list per controlling value
    pub options: BTreeMap<String, Vec<OptionItem>>,
}

impl DependsOn {
    /// Create a dependency on the given field with an empty option map
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            options: BTreeMap::new(),
        }
    }

    /// Add the option list used when the controlling field holds `key`
    pub fn when(mut self, key: impl Into<String>, options: Vec<OptionItem>) -> Self {
        self.options.insert(key.into(), options);
        self
    }

    /// The option list for a controlling value, empty when unmapped
    pub fn options_for(&self, value: Option<&FieldValue>) -> Vec<OptionItem> {
        value
            .and_then(|v| self.options.get(&v.key()))
            .cloned()
            .unwrap_or_default()
    }
}

// ============================================================================
// ReverseMapping
// ============================================================================

/// Autofill declaration: from this field's value, derive and write values
/// into the target fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseMapping {
    /// Target field names, in write order
    pub targets: Vec<String>,

    /// Per-value record of target fills, keyed like `DependsOn::options`
    pub values: BTreeMap<String, BTreeMap<String, FieldValue>>,
}

impl ReverseMapping {
    /// Create a reverse mapping onto the given targets
    pub fn new(targets: Vec<String>) -> Self {
        Self {
            targets,
            values: BTreeMap::new(),
        }
    }

    /// Add the fill record applied when this field holds `key`
    pub fn when(mut self, key: impl Into<String>, fills: BTreeMap<String, FieldValue>) -> Self {
        self.values.insert(key.into(), fills);
        self
    }

    /// The fill record for a value, if declared
    pub fn fills_for(&self, value: &FieldValue) -> Option<&BTreeMap<String, FieldValue>> {
        self.values.get(&value.key())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_builder() {
        let field = FieldSchema::string("firstName", "ชื่อ")
            .required()
            .with_span(12)
            .with_placeholder("Firstname");

        assert_eq!(field.field_type, FieldType::String);
        assert!(field.required);
        assert_eq!(field.effective_span(), 12);
        assert_eq!(field.placeholder.as_deref(), Some("Firstname"));
    }

    #[test]
    fn test_effective_span_defaults_to_full_row() {
        let field = FieldSchema::string("a", "A");
        assert_eq!(field.effective_span(), ROW_SPAN_MAX);
    }

    #[test]
    fn test_select_without_options_is_invalid() {
        let field = FieldSchema::new("gender", "เพศ", FieldType::Select);
        assert!(field.validate().is_err());

        let field = FieldSchema::select("gender", "เพศ", vec![OptionItem::new("ชาย", "male")]);
        assert!(field.validate().is_ok());
    }

    #[test]
    fn test_dependent_select_needs_no_static_options() {
        let field = FieldSchema::new("district", "เขต/อำเภอ", FieldType::Select)
            .with_depends_on(DependsOn::new("province"));
        assert!(field.validate().is_ok());
        assert_eq!(field.controlling_field(), Some("province"));
    }

    #[test]
    fn test_self_dependency_is_invalid() {
        let field = FieldSchema::new("a", "A", FieldType::Select)
            .with_depends_on(DependsOn::new("a"));
        assert!(field.validate().is_err());

        let field = FieldSchema::string("b", "B")
            .with_reverse_mapping(ReverseMapping::new(vec!["b".to_string()]));
        assert!(field.validate().is_err());
    }

    #[test]
    fn test_span_bounds() {
        assert!(FieldSchema::string("a", "A").with_span(0).validate().is_err());
        assert!(FieldSchema::string("a", "A").with_span(25).validate().is_err());
        assert!(FieldSchema::string("a", "A").with_span(1).validate().is_ok());
        assert!(FieldSchema::string("a", "A").with_span(24).validate().is_ok());
    }

    #[test]
    fn test_placeholder_text_templates() {
        assert_eq!(
            FieldSchema::string("firstName", "ชื่อ").placeholder_text().as_deref(),
            Some("กรุณากรอกชื่อ")
        );
        assert_eq!(
            FieldSchema::date("birthDate", "วันเกิด").placeholder_text().as_deref(),
            Some("กรุณาเลือกวันเกิด")
        );
        assert_eq!(FieldSchema::boolean("ok", "OK").placeholder_text(), None);
        assert_eq!(
            FieldSchema::string("postcode", "Postcode")
                .with_placeholder("Postcode")
                .placeholder_text()
                .as_deref(),
            Some("Postcode")
        );
    }

    #[test]
    fn test_depends_on_options_for() {
        let dep = DependsOn::new("province")
            .when("ขอนแก่น", vec![OptionItem::plain("เมืองขอนแก่น")]);

        let opts = dep.options_for(Some(&FieldValue::from("ขอนแก่น")));
        assert_eq!(opts.len(), 1);

        assert!(dep.options_for(Some(&FieldValue::from("กระบี่"))).is_empty());
        assert!(dep.options_for(None).is_empty());
    }

    #[test]
    fn test_serde_wire_format() {
        let json = r#"{
            "type": "select",
            "label": "เขต/อำเภอ",
            "name": "district",
            "dependsOn": {
                "field": "province",
                "options": { "ขอนแก่น": [ { "label": "เมืองขอนแก่น", "value": "เมืองขอนแก่น" } ] }
            }
        }"#;

        let field: FieldSchema = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Select);
        assert!(!field.required);
        assert_eq!(field.controlling_field(), Some("province"));

        // camelCase keys survive a round trip
        let back = serde_json::to_value(&field).unwrap();
        assert!(back.get("dependsOn").is_some());
        assert_eq!(back.get("type").unwrap(), "select");
    }
}
