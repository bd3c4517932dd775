//! Form state
//!
//! `FormState` is an explicit value object owned by the controller and
//! passed by reference to the resolver and renderer. It holds the current
//! field values plus the currently-available option list of every
//! dependent select field; there are no process-wide singletons.

use dynaform_core::{FieldValue, OptionItem};
use std::collections::{BTreeMap, HashMap};

/// Current field values and per-field option lists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: HashMap<String, FieldValue>,
    options: HashMap<String, Vec<OptionItem>>,
}

impl FormState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// The current value of a field, if set
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Set a field's value; returns true when the stored value changed
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> bool {
        match self.values.get(name) {
            Some(existing) if existing == &value => false,
            _ => {
                self.values.insert(name.to_string(), value);
                true
            }
        }
    }

    /// Clear a field's value; returns true when a value was present
    pub fn clear_value(&mut self, name: &str) -> bool {
        self.values.remove(name).is_some()
    }

    /// The currently-available option list of a field
    pub fn options(&self, name: &str) -> &[OptionItem] {
        self.options.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace a field's option list; returns true when the list changed
    pub fn set_options(&mut self, name: &str, options: Vec<OptionItem>) -> bool {
        if self.options(name) == options.as_slice() {
            return false;
        }
        self.options.insert(name.to_string(), options);
        true
    }

    /// Number of fields with a set value
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether no field has a value
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// An ordered snapshot of the current value map
    pub fn snapshot(&self) -> BTreeMap<String, FieldValue> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
