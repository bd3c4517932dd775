//! Core types used throughout Dynaform
//!
//! This module contains the fundamental types of the form engine: the
//! five-way field type tag, the tagged value union stored in form state,
//! and select option entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum accumulated span of a single layout row
pub const ROW_SPAN_MAX: u8 = 24;

// ============================================================================
// FieldType
// ============================================================================

/// The declared type of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text input
    String,
    /// Numeric input
    Number,
    /// Toggle switch
    Boolean,
    /// Dropdown select
    Select,
    /// Date picker
    Date,
}

impl FieldType {
    /// Get a user-friendly display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
            FieldType::Date => "date",
        }
    }

    /// Parse a field type from its schema tag
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(FieldType::String),
            "number" => Some(FieldType::Number),
            "boolean" => Some(FieldType::Boolean),
            "select" => Some(FieldType::Select),
            "date" => Some(FieldType::Date),
            _ => None,
        }
    }

    /// Get all field types
    pub fn all() -> &'static [FieldType] {
        &[
            FieldType::String,
            FieldType::Number,
            FieldType::Boolean,
            FieldType::Select,
            FieldType::Date,
        ]
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// FieldValue
// ============================================================================

/// A form field's current value, tagged by kind.
///
/// JSON carries no date literal, so untagged deserialization never produces
/// `Date` directly; date fields coerce ISO-8601 text at the write boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl FieldValue {
    /// The field type this value's tag corresponds to.
    ///
    /// `Text` maps to `String`; whether it also satisfies a `select` or
    /// `date` field is decided at the write boundary.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Boolean(_) => FieldType::Boolean,
            FieldValue::Number(_) => FieldType::Number,
            FieldValue::Text(_) => FieldType::String,
            FieldValue::Date(_) => FieldType::Date,
        }
    }

    /// Canonical string form, used to index dependency option maps
    pub fn key(&self) -> String {
        match self {
            FieldValue::Boolean(v) => v.to_string(),
            FieldValue::Number(v) => format!("{}", v),
            FieldValue::Text(v) => v.clone(),
            FieldValue::Date(v) => v.format("%Y-%m-%d").to_string(),
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Try to get as date
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        FieldValue::Date(v)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ============================================================================
// OptionItem
// ============================================================================

/// One entry of a select field's option list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionItem {
    /// Display text
    pub label: String,

    /// Stored value when chosen
    pub value: FieldValue,
}

impl OptionItem {
    /// Create a new option
    pub fn new(label: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Create an option whose label and value are the same string
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            label: text.clone(),
            value: FieldValue::Text(text),
        }
    }
}

/// Check whether a value is a member of an option list
pub fn in_options(options: &[OptionItem], value: &FieldValue) -> bool {
    options.iter().any(|o| &o.value == value)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_type_parse() {
        assert_eq!(FieldType::parse("string"), Some(FieldType::String));
        assert_eq!(FieldType::parse("select"), Some(FieldType::Select));
        assert_eq!(FieldType::parse("textarea"), None);
        assert_eq!(FieldType::parse(""), None);
    }

    #[test]
    fn test_field_type_all_round_trips() {
        for ft in FieldType::all() {
            assert_eq!(FieldType::parse(ft.display_name()), Some(*ft));
        }
    }

    #[test]
    fn test_field_value_tags() {
        assert_eq!(FieldValue::from(true).field_type(), FieldType::Boolean);
        assert_eq!(FieldValue::from(3.5).field_type(), FieldType::Number);
        assert_eq!(FieldValue::from("hi").field_type(), FieldType::String);

        let d = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(FieldValue::from(d).field_type(), FieldType::Date);
    }

    #[test]
    fn test_field_value_key() {
        assert_eq!(FieldValue::from(true).key(), "true");
        assert_eq!(FieldValue::from(42i64).key(), "42");
        assert_eq!(FieldValue::from(1.5).key(), "1.5");
        assert_eq!(FieldValue::from("male").key(), "male");

        let d = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(FieldValue::from(d).key(), "2024-05-17");
    }

    #[test]
    fn test_field_value_untagged_deserialization() {
        let v: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FieldValue::Boolean(true));

        let v: FieldValue = serde_json::from_str("7").unwrap();
        assert_eq!(v, FieldValue::Number(7.0));

        // Strings stay text even when they look like dates
        let v: FieldValue = serde_json::from_str("\"2024-05-17\"").unwrap();
        assert_eq!(v, FieldValue::Text("2024-05-17".to_string()));
    }

    #[test]
    fn test_option_item() {
        let opt = OptionItem::new("ชาย", "male");
        assert_eq!(opt.label, "ชาย");
        assert_eq!(opt.value, FieldValue::Text("male".to_string()));

        let opt = OptionItem::plain("ขอนแก่น");
        assert_eq!(opt.label, opt.value.key());
    }

    #[test]
    fn test_in_options() {
        let options = vec![OptionItem::new("ชาย", "male"), OptionItem::new("หญิง", "female")];
        assert!(in_options(&options, &FieldValue::from("male")));
        assert!(!in_options(&options, &FieldValue::from("other")));
        assert!(!in_options(&[], &FieldValue::from("male")));
    }
}
