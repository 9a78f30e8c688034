#![forbid(unsafe_code)]

//! Per-field comparator descriptors and the diff algorithm.
//!
//! A [`FieldComparator`] ties one tracked field to its live value
//! stream, its setter, and an optional custom equality function. The
//! descriptor uses named fields rather than the positional-tuple
//! convention of the system this was ported from.
//!
//! [`run_comparators`] is the pure diff: given the last-saved snapshot
//! and the current field values, it returns the partial state of
//! differing fields, or `None` when nothing differs.
//!
//! # Invariants
//!
//! 1. Diff keys are always a subset of the comparator set's keys.
//! 2. A key appears in the diff iff its comparator reports inequality.
//! 3. An absent snapshot means everything current is unsaved: the diff
//!    is the full current-field set.
//!
//! # Failure Modes
//!
//! - **Custom comparator panics**: not caught; propagates to whoever
//!   drove the diff. Caller-supplied comparator logic is trusted.

use paneldiff_reactive::Observable;
use std::collections::BTreeMap;

use crate::panel::PanelState;

/// Custom equality for one field: `(saved, current, full_saved,
/// full_current) -> equal`. `saved` is `None` when the snapshot has no
/// value for the field.
pub type EqualityFn<V> =
    Box<dyn Fn(Option<&V>, &V, &PanelState<V>, &PanelState<V>) -> bool>;

/// Setter for one field. Receives `None` when a reset finds no saved
/// value for the field.
pub type SetterFn<V> = Box<dyn Fn(Option<V>)>;

/// Descriptor for one tracked field: live value stream, setter, and
/// optional custom equality.
pub struct FieldComparator<V> {
    /// Live, observable value of the field.
    pub value: Observable<V>,
    /// Mutates the field's live value.
    pub set: SetterFn<V>,
    /// Custom equality; identity comparison when absent.
    pub equals: Option<EqualityFn<V>>,
}

impl<V> FieldComparator<V> {
    /// Descriptor with default (identity) equality.
    #[must_use]
    pub fn new(value: Observable<V>, set: impl Fn(Option<V>) + 'static) -> Self {
        Self {
            value,
            set: Box::new(set),
            equals: None,
        }
    }

    /// Attach a custom equality function.
    #[must_use]
    pub fn with_equality(
        mut self,
        equals: impl Fn(Option<&V>, &V, &PanelState<V>, &PanelState<V>) -> bool + 'static,
    ) -> Self {
        self.equals = Some(Box::new(equals));
        self
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for FieldComparator<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldComparator")
            .field("value", &self.value)
            .field("custom_equality", &self.equals.is_some())
            .finish()
    }
}

/// The set of tracked fields, keyed by field name.
///
/// Key order is deterministic (sorted); insertion order is irrelevant.
pub struct ComparatorSet<V> {
    fields: BTreeMap<String, FieldComparator<V>>,
}

impl<V> ComparatorSet<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Add a tracked field (builder pattern). A duplicate name replaces
    /// the previous descriptor.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, comparator: FieldComparator<V>) -> Self {
        self.insert(name, comparator);
        self
    }

    /// Add a tracked field (mutating). A duplicate name replaces the
    /// previous descriptor.
    pub fn insert(&mut self, name: impl Into<String>, comparator: FieldComparator<V>) {
        self.fields.insert(name.into(), comparator);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldComparator<V>> {
        self.fields.get(name)
    }

    /// Field names in deterministic (sorted) order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldComparator<V>)> {
        self.fields.iter()
    }
}

impl<V: Clone + PartialEq + 'static> ComparatorSet<V> {
    /// Current value of every tracked field, read synchronously.
    #[must_use]
    pub fn current_values(&self) -> PanelState<V> {
        self.fields
            .iter()
            .map(|(name, comparator)| (name.clone(), comparator.value.get()))
            .collect()
    }
}

impl<V> Default for ComparatorSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for ComparatorSet<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}

/// Diff the current field values against the last-saved snapshot.
///
/// Returns `None` when no tracked field differs, otherwise the partial
/// state containing exactly the differing fields' current values. An
/// absent snapshot yields the full current-field set unchanged.
#[must_use]
pub fn run_comparators<V: Clone + PartialEq + 'static>(
    comparators: &ComparatorSet<V>,
    last_saved: Option<&PanelState<V>>,
    current: &PanelState<V>,
) -> Option<PanelState<V>> {
    let Some(saved) = last_saved else {
        // Tracking is supported but nothing is saved for this panel:
        // all of the current state is unsaved.
        return Some(current.clone());
    };

    let mut changes = PanelState::new();
    for (name, comparator) in comparators.iter() {
        let Some(current_value) = current.get(name) else {
            continue;
        };
        let saved_value = saved.get(name);
        let equal = match &comparator.equals {
            Some(equals) => equals(saved_value, current_value, saved, current),
            None => saved_value == Some(current_value),
        };
        if !equal {
            changes.insert(name.clone(), current_value.clone());
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: &str) -> FieldComparator<String> {
        FieldComparator::new(Observable::new(value.to_string()), |_| {})
    }

    fn state(pairs: &[(&str, &str)]) -> PanelState<String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn no_snapshot_reports_everything() {
        let comparators = ComparatorSet::new().with_field("title", field("A"));
        let current = state(&[("title", "A")]);
        let diff = run_comparators(&comparators, None, &current);
        assert_eq!(diff, Some(current));
    }

    #[test]
    fn equal_values_produce_no_diff() {
        let comparators = ComparatorSet::new()
            .with_field("title", field("A"))
            .with_field("span", field("3"));
        let saved = state(&[("title", "A"), ("span", "3")]);
        let current = saved.clone();
        assert_eq!(run_comparators(&comparators, Some(&saved), &current), None);
    }

    #[test]
    fn only_differing_fields_appear() {
        let comparators = ComparatorSet::new()
            .with_field("title", field("B"))
            .with_field("span", field("3"));
        let saved = state(&[("title", "A"), ("span", "3")]);
        let current = state(&[("title", "B"), ("span", "3")]);

        let diff = run_comparators(&comparators, Some(&saved), &current);
        assert_eq!(diff, Some(state(&[("title", "B")])));
    }

    #[test]
    fn missing_saved_value_counts_as_changed() {
        let comparators = ComparatorSet::new().with_field("title", field("A"));
        let saved = state(&[]);
        let current = state(&[("title", "A")]);

        let diff = run_comparators(&comparators, Some(&saved), &current);
        assert_eq!(diff, Some(state(&[("title", "A")])));
    }

    #[test]
    fn custom_equality_overrides_identity() {
        let comparators = ComparatorSet::new().with_field(
            "title",
            field("a").with_equality(|saved, current, _, _| {
                saved.is_some_and(|s| s.eq_ignore_ascii_case(current))
            }),
        );
        let saved = state(&[("title", "A")]);
        let current = state(&[("title", "a")]);
        assert_eq!(run_comparators(&comparators, Some(&saved), &current), None);
    }

    #[test]
    fn custom_equality_sees_full_states() {
        // Comparator that treats the field as equal whenever the two
        // full states have the same number of fields.
        let comparators = ComparatorSet::new().with_field(
            "title",
            field("B").with_equality(|_, _, full_saved, full_current| {
                full_saved.len() == full_current.len()
            }),
        );
        let saved = state(&[("title", "A")]);
        let current = state(&[("title", "B")]);
        assert_eq!(run_comparators(&comparators, Some(&saved), &current), None);
    }

    #[test]
    fn duplicate_insert_replaces() {
        let comparators = ComparatorSet::new()
            .with_field("title", field("old"))
            .with_field("title", field("new"));
        assert_eq!(comparators.len(), 1);
        assert_eq!(comparators.get("title").unwrap().value.get(), "new");
    }

    #[test]
    fn current_values_reads_every_field() {
        let comparators = ComparatorSet::new()
            .with_field("b", field("2"))
            .with_field("a", field("1"));
        assert_eq!(comparators.current_values(), state(&[("a", "1"), ("b", "2")]));
    }
}
