//! Dependency propagation
//!
//! When a field's value changes, two kinds of declared dependencies fire:
//! reverse mappings write derived values into target fields, and forward
//! dependencies recompute the option lists of dependent selects, clearing
//! any selection that fell out of its narrowed list. Both effects can
//! trigger further waves, so propagation runs a FIFO worklist until the
//! state settles.
//!
//! A field may be *revisited* with the value it already holds; that is a
//! no-op and lets mutually-referencing autofill rules (postcode and
//! sub-district fill each other) terminate. Re-mutating a field that
//! already settled in the same wave is a schema conflict and fails the
//! whole wave.

use crate::state::FormState;
use dynaform_core::{FormError, FormResult, in_options};
use dynaform_schema::FieldSchema;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::debug;

/// Worklist-based propagation over a fixed schema.
///
/// Built once per schema; holds the field name index and the reverse of
/// the `dependsOn` edges so each wave only touches affected fields.
#[derive(Debug)]
pub struct DependencyResolver {
    /// Field name -> index into the schema array
    index: HashMap<String, usize>,

    /// Controlling field name -> indices of fields that depend on it
    dependents: HashMap<String, Vec<usize>>,
}

impl DependencyResolver {
    /// Build the resolver's indices for a schema
    pub fn new(fields: &[FieldSchema]) -> Self {
        let mut index = HashMap::new();
        let mut dependents: HashMap<String, Vec<usize>> = HashMap::new();

        for (i, field) in fields.iter().enumerate() {
            index.insert(field.name.clone(), i);
            if let Some(controller) = field.controlling_field() {
                dependents.entry(controller.to_string()).or_default().push(i);
            }
        }

        Self { index, dependents }
    }

    /// Propagate a change of `changed` through the schema.
    ///
    /// Returns the names of every field whose value or option list changed
    /// during the wave, including `changed` itself. State is left
    /// untouched past the point of failure when the wave conflicts.
    pub fn propagate(
        &self,
        fields: &[FieldSchema],
        state: &mut FormState,
        changed: &str,
    ) -> FormResult<BTreeSet<String>> {
        let mut dirty = BTreeSet::new();
        dirty.insert(changed.to_string());

        let mut queue = VecDeque::new();
        let mut queued = HashSet::new();
        let mut visited: HashSet<String> = HashSet::new();

        queue.push_back(changed.to_string());
        queued.insert(changed.to_string());

        while let Some(name) = queue.pop_front() {
            visited.insert(name.clone());

            self.apply_reverse_mapping(
                fields, state, &name, &visited, &mut queued, &mut queue, &mut dirty,
            )?;
            self.narrow_dependents(
                fields, state, &name, &visited, &mut queued, &mut queue, &mut dirty,
            )?;
        }

        Ok(dirty)
    }

    /// Write the autofill record of `name`'s current value into its targets
    #[allow(clippy::too_many_arguments)]
    fn apply_reverse_mapping(
        &self,
        fields: &[FieldSchema],
        state: &mut FormState,
        name: &str,
        visited: &HashSet<String>,
        queued: &mut HashSet<String>,
        queue: &mut VecDeque<String>,
        dirty: &mut BTreeSet<String>,
    ) -> FormResult<()> {
        let Some(&idx) = self.index.get(name) else {
            return Ok(());
        };
        let Some(mapping) = &fields[idx].reverse_mapping else {
            return Ok(());
        };
        let Some(value) = state.value(name).cloned() else {
            return Ok(());
        };
        let Some(fills) = mapping.fills_for(&value) else {
            return Ok(());
        };

        for target in &mapping.targets {
            let Some(fill) = fills.get(target) else {
                continue;
            };
            // Revisits that would write the value already held are no-ops
            if state.value(target) == Some(fill) {
                continue;
            }
            if visited.contains(target) {
                return Err(FormError::ConflictingPropagation(target.clone()));
            }

            debug!(field = %name, %target, value = %fill, "autofill");
            state.set_value(target, fill.clone());
            dirty.insert(target.clone());
            if queued.insert(target.clone()) {
                queue.push_back(target.clone());
            }
        }

        Ok(())
    }

    /// Recompute the option lists of every field that depends on `name`
    #[allow(clippy::too_many_arguments)]
    fn narrow_dependents(
        &self,
        fields: &[FieldSchema],
        state: &mut FormState,
        name: &str,
        visited: &HashSet<String>,
        queued: &mut HashSet<String>,
        queue: &mut VecDeque<String>,
        dirty: &mut BTreeSet<String>,
    ) -> FormResult<()> {
        let Some(indices) = self.dependents.get(name) else {
            return Ok(());
        };

        for &idx in indices {
            let dependent = &fields[idx];
            let Some(declaration) = &dependent.depends_on else {
                continue;
            };

            let options = declaration.options_for(state.value(name));
            let current = state.value(&dependent.name).cloned();

            if state.set_options(&dependent.name, options.clone()) {
                debug!(field = %dependent.name, count = options.len(), "options narrowed");
                dirty.insert(dependent.name.clone());
            }

            // An option-list change alone does not cascade; only losing
            // the current selection does
            let Some(current) = current else {
                continue;
            };
            if in_options(&options, &current) {
                continue;
            }
            if visited.contains(&dependent.name) {
                return Err(FormError::ConflictingPropagation(dependent.name.clone()));
            }

            debug!(field = %dependent.name, value = %current, "stale selection cleared");
            state.clear_value(&dependent.name);
            dirty.insert(dependent.name.clone());
            if queued.insert(dependent.name.clone()) {
                queue.push_back(dependent.name.clone());
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{AddressTable, address_schema};
    use dynaform_core::{FieldValue, OptionItem};
    use dynaform_schema::{DependsOn, ReverseMapping};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn narrowing_schema() -> Vec<FieldSchema> {
        vec![
            FieldSchema::select(
                "province",
                "Province",
                vec![OptionItem::plain("ขอนแก่น"), OptionItem::plain("นครพนม")],
            ),
            FieldSchema::new("district", "District", dynaform_core::FieldType::Select)
                .with_depends_on(
                    DependsOn::new("province")
                        .when(
                            "ขอนแก่น",
                            vec![
                                OptionItem::plain("เมืองขอนแก่น"),
                                OptionItem::plain("บ้านไผ่"),
                            ],
                        )
                        .when(
                            "นครพนม",
                            vec![
                                OptionItem::plain("เมืองนครพนม"),
                                OptionItem::plain("ธาตุพนม"),
                            ],
                        ),
                ),
        ]
    }

    #[test]
    fn test_forward_narrowing_replaces_options() {
        let fields = narrowing_schema();
        let resolver = DependencyResolver::new(&fields);
        let mut state = FormState::new();

        state.set_value("province", FieldValue::from("ขอนแก่น"));
        let dirty = resolver.propagate(&fields, &mut state, "province").unwrap();

        assert!(dirty.contains("district"));
        let labels: Vec<&str> = state.options("district").iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["เมืองขอนแก่น", "บ้านไผ่"]);
    }

    #[test]
    fn test_narrowing_clears_stale_selection() {
        let fields = narrowing_schema();
        let resolver = DependencyResolver::new(&fields);
        let mut state = FormState::new();

        state.set_value("province", FieldValue::from("ขอนแก่น"));
        resolver.propagate(&fields, &mut state, "province").unwrap();
        state.set_value("district", FieldValue::from("บ้านไผ่"));

        // Switching province invalidates the chosen district
        state.set_value("province", FieldValue::from("นครพนม"));
        let dirty = resolver.propagate(&fields, &mut state, "province").unwrap();

        assert!(dirty.contains("district"));
        assert_eq!(state.value("district"), None);
    }

    #[test]
    fn test_surviving_selection_is_kept() {
        let fields = narrowing_schema();
        let resolver = DependencyResolver::new(&fields);
        let mut state = FormState::new();

        state.set_value("province", FieldValue::from("ขอนแก่น"));
        resolver.propagate(&fields, &mut state, "province").unwrap();
        state.set_value("district", FieldValue::from("เมืองขอนแก่น"));

        // Re-selecting the same province leaves the district alone
        resolver.propagate(&fields, &mut state, "province").unwrap();
        assert_eq!(state.value("district"), Some(&FieldValue::from("เมืองขอนแก่น")));
    }

    #[test]
    fn test_unmapped_controlling_value_empties_options() {
        let fields = narrowing_schema();
        let resolver = DependencyResolver::new(&fields);
        let mut state = FormState::new();

        state.set_value("province", FieldValue::from("ขอนแก่น"));
        resolver.propagate(&fields, &mut state, "province").unwrap();
        state.set_value("district", FieldValue::from("บ้านไผ่"));

        // A controlling value with no entry in the narrowing map
        state.set_value("province", FieldValue::from("เชียงใหม่"));
        resolver.propagate(&fields, &mut state, "province").unwrap();

        assert!(state.options("district").is_empty());
        assert_eq!(state.value("district"), None);
    }

    #[test]
    fn test_clearing_controller_empties_dependent() {
        let fields = narrowing_schema();
        let resolver = DependencyResolver::new(&fields);
        let mut state = FormState::new();

        state.set_value("province", FieldValue::from("ขอนแก่น"));
        resolver.propagate(&fields, &mut state, "province").unwrap();
        state.set_value("district", FieldValue::from("บ้านไผ่"));

        state.clear_value("province");
        resolver.propagate(&fields, &mut state, "province").unwrap();

        assert!(state.options("district").is_empty());
        assert_eq!(state.value("district"), None);
    }

    #[test]
    fn test_reverse_mapping_fills_targets() {
        let fields = vec![
            FieldSchema::string("postcode", "Postcode").with_reverse_mapping(
                ReverseMapping::new(vec!["province".to_string()]).when("40110", {
                    let mut fills = BTreeMap::new();
                    fills.insert("province".to_string(), FieldValue::from("ขอนแก่น"));
                    fills
                }),
            ),
            FieldSchema::string("province", "Province"),
        ];
        let resolver = DependencyResolver::new(&fields);
        let mut state = FormState::new();

        state.set_value("postcode", FieldValue::from("40110"));
        let dirty = resolver.propagate(&fields, &mut state, "postcode").unwrap();

        assert!(dirty.contains("province"));
        assert_eq!(state.value("province"), Some(&FieldValue::from("ขอนแก่น")));
    }

    #[test]
    fn test_reverse_mapping_is_idempotent() {
        let fields = address_schema(AddressTable::builtin());
        let resolver = DependencyResolver::new(&fields);
        let mut state = FormState::new();

        state.set_value("postcode", FieldValue::from("40000"));
        resolver.propagate(&fields, &mut state, "postcode").unwrap();
        let first = state.clone();

        // Re-running the same wave changes nothing
        resolver.propagate(&fields, &mut state, "postcode").unwrap();
        assert_eq!(state, first);
    }

    #[test]
    fn test_consistent_mutual_autofill_terminates() {
        // a and b fill each other with agreeing values
        let mut a_fills = BTreeMap::new();
        a_fills.insert("b".to_string(), FieldValue::from("2"));
        let mut b_fills = BTreeMap::new();
        b_fills.insert("a".to_string(), FieldValue::from("1"));

        let fields = vec![
            FieldSchema::string("a", "A").with_reverse_mapping(
                ReverseMapping::new(vec!["b".to_string()]).when("1", a_fills),
            ),
            FieldSchema::string("b", "B").with_reverse_mapping(
                ReverseMapping::new(vec!["a".to_string()]).when("2", b_fills),
            ),
        ];
        let resolver = DependencyResolver::new(&fields);
        let mut state = FormState::new();

        state.set_value("a", FieldValue::from("1"));
        let dirty = resolver.propagate(&fields, &mut state, "a").unwrap();

        assert_eq!(state.value("b"), Some(&FieldValue::from("2")));
        assert_eq!(dirty.len(), 2);
    }

    #[test]
    fn test_conflicting_mutual_autofill_fails() {
        // b's autofill disagrees with the value the user gave a
        let mut a_fills = BTreeMap::new();
        a_fills.insert("b".to_string(), FieldValue::from("2"));
        let mut b_fills = BTreeMap::new();
        b_fills.insert("a".to_string(), FieldValue::from("conflict"));

        let fields = vec![
            FieldSchema::string("a", "A").with_reverse_mapping(
                ReverseMapping::new(vec!["b".to_string()]).when("1", a_fills),
            ),
            FieldSchema::string("b", "B").with_reverse_mapping(
                ReverseMapping::new(vec!["a".to_string()]).when("2", b_fills),
            ),
        ];
        let resolver = DependencyResolver::new(&fields);
        let mut state = FormState::new();

        state.set_value("a", FieldValue::from("1"));
        let err = resolver.propagate(&fields, &mut state, "a").unwrap_err();
        assert!(matches!(err, FormError::ConflictingPropagation(name) if name == "a"));
    }

    #[test]
    fn test_postcode_wave_fills_and_narrows() {
        let fields = address_schema(AddressTable::builtin());
        let resolver = DependencyResolver::new(&fields);
        let mut state = FormState::new();

        state.set_value("postcode", FieldValue::from("40000"));
        let dirty = resolver.propagate(&fields, &mut state, "postcode").unwrap();

        assert_eq!(state.value("province"), Some(&FieldValue::from("ขอนแก่น")));
        assert_eq!(state.value("district"), Some(&FieldValue::from("เมืองขอนแก่น")));
        assert_eq!(state.value("subDistrict"), None);

        let subs: Vec<&str> = state
            .options("subDistrict")
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(subs, vec!["ในเมือง", "บ้านเป็ด"]);
        assert!(dirty.contains("district"));
        assert!(dirty.contains("subDistrict"));
    }

    #[test]
    fn test_sub_district_backfills_postcode() {
        let fields = address_schema(AddressTable::builtin());
        let resolver = DependencyResolver::new(&fields);
        let mut state = FormState::new();

        state.set_value("postcode", FieldValue::from("40000"));
        resolver.propagate(&fields, &mut state, "postcode").unwrap();

        // Picking the unambiguous sub-district completes the address and
        // the backfill wave agrees with every value already present
        state.set_value("subDistrict", FieldValue::from("บ้านเป็ด"));
        resolver.propagate(&fields, &mut state, "subDistrict").unwrap();

        assert_eq!(state.value("postcode"), Some(&FieldValue::from("40000")));
        assert_eq!(state.value("province"), Some(&FieldValue::from("ขอนแก่น")));
    }
}
