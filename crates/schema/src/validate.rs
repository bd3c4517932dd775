//! Schema import validation
//!
//! The validator checks an untyped JSON value against the field-schema
//! shape before anything is trusted. Every violation is collected into a
//! single [`ErrorReport`] so the caller can display a complete report;
//! no partial schema is ever accepted.

use crate::field::{DependsOn, FieldSchema, ReverseMapping};
use dynaform_core::{ErrorReport, FieldType, FieldValue, FormError, OptionItem, ROW_SPAN_MAX};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Parse raw schema text (pasted JSON or uploaded file content) into a
/// validated field-schema array.
pub fn parse_schema(text: &str) -> Result<Vec<FieldSchema>, ErrorReport> {
    let raw: Value = serde_json::from_str(text)
        .map_err(|e| ErrorReport::from(FormError::parse(e.to_string())))?;
    validate_schema(&raw)
}

/// Load and validate a schema from a `.json` file.
pub fn load_schema(path: impl AsRef<Path>) -> Result<Vec<FieldSchema>, ErrorReport> {
    let text = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ErrorReport::from(FormError::Io(e)))?;
    parse_schema(&text)
}

/// Validate an untyped JSON value against the field-schema shape.
///
/// Pure over its input. Returns the typed schema in field order on
/// success, or ALL collected errors on failure.
pub fn validate_schema(raw: &Value) -> Result<Vec<FieldSchema>, ErrorReport> {
    let Some(entries) = raw.as_array() else {
        return Err(FormError::shape("top-level JSON value must be an array").into());
    };

    let mut report = ErrorReport::new();
    let mut fields = Vec::with_capacity(entries.len());

    // Names declared anywhere in the array, for reference checks
    let declared: HashSet<&str> = entries
        .iter()
        .filter_map(|e| e.get("name").and_then(Value::as_str))
        .collect();

    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (index, entry) in entries.iter().enumerate() {
        // Duplicate names are reported even when the entry has other
        // shape errors
        if let Some(name) = entry.get("name").and_then(Value::as_str) {
            if let Some(first) = seen.get(name) {
                report.push(FormError::field(
                    index,
                    format!("duplicate field name '{}' (first at {})", name, first),
                ));
            } else {
                seen.insert(name, index);
            }
        }

        if let Some(field) = validate_entry(index, entry, &declared, &mut report) {
            fields.push(field);
        }
    }

    report.into_result(fields)
}

/// Validate one array entry; returns the typed field when its own shape is
/// acceptable, pushing every violation onto the report either way.
fn validate_entry(
    index: usize,
    entry: &Value,
    declared: &HashSet<&str>,
    report: &mut ErrorReport,
) -> Option<FieldSchema> {
    let Some(obj) = entry.as_object() else {
        report.push(FormError::field(index, "entry is not an object"));
        return None;
    };

    let mut ok = true;

    let field_type = match obj.get("type").and_then(Value::as_str) {
        Some(tag) => match FieldType::parse(tag) {
            Some(ft) => Some(ft),
            None => {
                report.push(FormError::field(
                    index,
                    format!("'type' must be one of string|number|boolean|select|date, got '{}'", tag),
                ));
                ok = false;
                None
            }
        },
        None => {
            report.push(FormError::field(index, "missing or non-string 'type'"));
            ok = false;
            None
        }
    };

    let label = match obj.get("label").and_then(Value::as_str) {
        Some(l) => Some(l.to_string()),
        None => {
            report.push(FormError::field(index, "missing or non-string 'label'"));
            ok = false;
            None
        }
    };

    let name = match obj.get("name").and_then(Value::as_str) {
        Some(n) if !n.is_empty() => Some(n.to_string()),
        _ => {
            report.push(FormError::field(index, "missing or non-string 'name'"));
            ok = false;
            None
        }
    };

    let required = match obj.get("required") {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            report.push(FormError::field(index, "'required' must be a boolean"));
            ok = false;
            false
        }
    };

    let placeholder = match obj.get("placeholder") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            report.push(FormError::field(index, "'placeholder' must be a string"));
            ok = false;
            None
        }
    };

    let span = match obj.get("span") {
        None => None,
        Some(v) => match v.as_u64() {
            Some(n) if (1..=ROW_SPAN_MAX as u64).contains(&n) => Some(n as u8),
            _ => {
                report.push(FormError::field(
                    index,
                    format!("'span' must be an integer in 1..={}", ROW_SPAN_MAX),
                ));
                ok = false;
                None
            }
        },
    };

    let options = match obj.get("options") {
        None => None,
        Some(v) => validate_options(index, "options", v, report).or_else(|| {
            ok = false;
            None
        }),
    };

    let depends_on = match obj.get("dependsOn") {
        None => None,
        Some(v) => match validate_depends_on(index, v, name.as_deref(), declared, report) {
            Some(dep) => Some(dep),
            None => {
                ok = false;
                None
            }
        },
    };

    let reverse_mapping = match obj.get("reverseMapping") {
        None => None,
        Some(v) => match validate_reverse_mapping(index, v, name.as_deref(), declared, report) {
            Some(rm) => Some(rm),
            None => {
                ok = false;
                None
            }
        },
    };

    // Selects need options unless another field narrows them
    if field_type == Some(FieldType::Select)
        && depends_on.is_none()
        && options.as_ref().is_none_or(|o| o.is_empty())
    {
        report.push(FormError::field(
            index,
            "'select' field requires a non-empty 'options' array or a 'dependsOn' declaration",
        ));
        ok = false;
    }

    if !ok {
        return None;
    }

    Some(FieldSchema {
        field_type: field_type?,
        label: label?,
        name: name?,
        required,
        placeholder,
        options,
        span,
        depends_on,
        reverse_mapping,
    })
}

/// A scalar option/fill value: string, number, or boolean
fn scalar_value(v: &Value) -> Option<FieldValue> {
    match v {
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::Bool(b) => Some(FieldValue::Boolean(*b)),
        _ => None,
    }
}

fn validate_options(
    index: usize,
    context: &str,
    raw: &Value,
    report: &mut ErrorReport,
) -> Option<Vec<OptionItem>> {
    let Some(entries) = raw.as_array() else {
        report.push(FormError::field(index, format!("'{}' must be an array", context)));
        return None;
    };

    let mut options = Vec::with_capacity(entries.len());
    let mut ok = true;

    for (opt_index, entry) in entries.iter().enumerate() {
        let label = entry.get("label").and_then(Value::as_str);
        let value = entry.get("value").and_then(scalar_value);
        match (label, value) {
            (Some(label), Some(value)) => options.push(OptionItem::new(label, value)),
            _ => {
                report.push(FormError::field(
                    index,
                    format!(
                        "{}[{}] must have a string 'label' and a string|number|boolean 'value'",
                        context, opt_index
                    ),
                ));
                ok = false;
            }
        }
    }

    ok.then_some(options)
}

fn validate_depends_on(
    index: usize,
    raw: &Value,
    own_name: Option<&str>,
    declared: &HashSet<&str>,
    report: &mut ErrorReport,
) -> Option<DependsOn> {
    let Some(obj) = raw.as_object() else {
        report.push(FormError::field(index, "'dependsOn' must be an object"));
        return None;
    };

    let field = match obj.get("field").and_then(Value::as_str) {
        Some(f) => f.to_string(),
        None => {
            report.push(FormError::field(index, "'dependsOn.field' must be a string"));
            return None;
        }
    };

    if Some(field.as_str()) == own_name {
        report.push(FormError::field(index, "'dependsOn.field' refers to the field itself"));
        return None;
    }
    if !declared.contains(field.as_str()) {
        report.push(FormError::field(
            index,
            format!("'dependsOn.field' refers to unknown field '{}'", field),
        ));
        return None;
    }

    let Some(map) = obj.get("options").and_then(Value::as_object) else {
        report.push(FormError::field(index, "'dependsOn.options' must be an object"));
        return None;
    };

    let mut options = BTreeMap::new();
    let mut ok = true;
    for (key, list) in map {
        let context = format!("dependsOn.options['{}']", key);
        match validate_options(index, &context, list, report) {
            Some(list) => {
                options.insert(key.clone(), list);
            }
            None => ok = false,
        }
    }

    ok.then_some(DependsOn { field, options })
}

fn validate_reverse_mapping(
    index: usize,
    raw: &Value,
    own_name: Option<&str>,
    declared: &HashSet<&str>,
    report: &mut ErrorReport,
) -> Option<ReverseMapping> {
    let Some(obj) = raw.as_object() else {
        report.push(FormError::field(index, "'reverseMapping' must be an object"));
        return None;
    };

    let Some(raw_targets) = obj.get("targets").and_then(Value::as_array) else {
        report.push(FormError::field(index, "'reverseMapping.targets' must be an array"));
        return None;
    };

    let mut targets = Vec::with_capacity(raw_targets.len());
    let mut ok = true;
    for t in raw_targets {
        match t.as_str() {
            Some(t) if Some(t) == own_name => {
                report.push(FormError::field(
                    index,
                    "'reverseMapping.targets' contains the field itself",
                ));
                ok = false;
            }
            Some(t) if !declared.contains(t) => {
                report.push(FormError::field(
                    index,
                    format!("'reverseMapping.targets' refers to unknown field '{}'", t),
                ));
                ok = false;
            }
            Some(t) => targets.push(t.to_string()),
            None => {
                report.push(FormError::field(
                    index,
                    "'reverseMapping.targets' entries must be strings",
                ));
                ok = false;
            }
        }
    }

    let Some(raw_values) = obj.get("values").and_then(Value::as_object) else {
        report.push(FormError::field(index, "'reverseMapping.values' must be an object"));
        return None;
    };

    let mut values = BTreeMap::new();
    for (key, record) in raw_values {
        let Some(record) = record.as_object() else {
            report.push(FormError::field(
                index,
                format!("'reverseMapping.values['{}']' must be an object", key),
            ));
            ok = false;
            continue;
        };
        let mut fills = BTreeMap::new();
        for (target, v) in record {
            match scalar_value(v) {
                Some(v) => {
                    fills.insert(target.clone(), v);
                }
                None => {
                    report.push(FormError::field(
                        index,
                        format!(
                            "'reverseMapping.values['{}'].{}' must be string|number|boolean",
                            key, target
                        ),
                    ));
                    ok = false;
                }
            }
        }
        values.insert(key.clone(), fills);
    }

    ok.then_some(ReverseMapping { targets, values })
}

// ============================================================================
// Tests
// ============================================================================
