// Derived bucket indices and the incremental update algorithm

use std::hash::Hash;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::pin::{Pin, PinKind};

/// Insertion-ordered set of shared pins.
pub type PinSet = IndexSet<Arc<Pin>>;

/// The four derived structures the store serves reads from, plus the
/// pin set they were derived from.
#[derive(Debug, Clone, Default)]
pub(crate) struct Indices {
    pub pins: PinSet,
    /// Buckets keyed by concrete pin kind.
    pub by_kind: IndexMap<PinKind, PinSet>,
    /// Direct children keyed by the enclosing namespace's fully
    /// qualified name.
    pub by_namespace: IndexMap<String, PinSet>,
    /// Redefinition groups keyed by pin path.
    pub by_path: IndexMap<String, PinSet>,
    /// Coarse registry of every path observed among indexed pins.
    pub namespaces: IndexSet<String>,
}

/// Reuse heuristic: seed from the previous store only when the change
/// touches less than ~10% of the pin population. Results must be
/// identical either way; only performance differs.
pub(crate) fn reusable(new_len: usize, base_len: usize) -> bool {
    new_len.abs_diff(base_len) * 10 < new_len
}

impl Indices {
    /// Replace the indexed state with `new_pins`, updating the bucket
    /// structures in place. A seeded instance is diffed against its
    /// previous pin set; an empty one is built directly.
    pub(crate) fn apply(&mut self, new_pins: PinSet) {
        if self.pins.is_empty() {
            debug!(pins = new_pins.len(), "building indices from empty");
            for pin in &new_pins {
                self.add(pin);
            }
            self.pins = new_pins;
            return;
        }

        // Symmetric difference: pins present in exactly one of the two
        // sets. Unchanged pins are left untouched in their buckets.
        let added: Vec<Arc<Pin>> = new_pins
            .iter()
            .filter(|pin| !self.pins.contains(*pin))
            .cloned()
            .collect();
        let removed: Vec<Arc<Pin>> = self
            .pins
            .iter()
            .filter(|pin| !new_pins.contains(*pin))
            .cloned()
            .collect();
        debug!(added = added.len(), removed = removed.len(), "incremental reindex");

        for pin in &removed {
            remove_from(&mut self.by_kind, &pin.kind(), pin);
            remove_from(&mut self.by_namespace, &pin.namespace, pin);
            if let Some(path) = pin.path() {
                if remove_from(&mut self.by_path, &path, pin) {
                    self.namespaces.shift_remove(&path);
                }
            }
        }
        for pin in &added {
            self.add(pin);
        }
        self.pins = new_pins;
    }

    fn add(&mut self, pin: &Arc<Pin>) {
        insert_into(&mut self.by_kind, pin.kind(), pin);
        insert_into(&mut self.by_namespace, pin.namespace.clone(), pin);
        if let Some(path) = pin.path() {
            self.namespaces.insert(path.clone());
            insert_into(&mut self.by_path, path, pin);
        }
    }

    /// Pins in the concrete bucket for `kind`, in insertion order.
    pub(crate) fn kind_bucket(&self, kind: PinKind) -> impl Iterator<Item = &Arc<Pin>> {
        self.by_kind.get(&kind).into_iter().flatten()
    }
}

fn insert_into<K: Hash + Eq>(map: &mut IndexMap<K, PinSet>, key: K, pin: &Arc<Pin>) {
    map.entry(key).or_default().insert(Arc::clone(pin));
}

/// Remove the pin from its bucket, deleting the key when the bucket
/// empties. Returns true when the key was vacated.
fn remove_from<K: Hash + Eq>(map: &mut IndexMap<K, PinSet>, key: &K, pin: &Arc<Pin>) -> bool {
    let Some(bucket) = map.get_mut(key) else {
        return false;
    };
    bucket.shift_remove(pin);
    if bucket.is_empty() {
        map.shift_remove(key);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::Scope;

    fn pin_set(pins: Vec<Pin>) -> PinSet {
        pins.into_iter().map(Arc::new).collect()
    }

    #[test]
    fn test_reuse_heuristic_threshold() {
        // 5 changed out of 100 is a small diff; 20 is not.
        assert!(reusable(100, 95));
        assert!(!reusable(100, 80));
        assert!(!reusable(0, 10));
        assert!(reusable(1000, 1001));
    }

    #[test]
    fn test_full_build_groups_by_kind_namespace_and_path() {
        let mut indices = Indices::default();
        indices.apply(pin_set(vec![
            Pin::namespace("Foo", ""),
            Pin::method("bar", "Foo", Scope::Instance),
            Pin::method("bar", "Foo", Scope::Instance).with_visibility(crate::pin::Visibility::Private),
            Pin::include_ref("Comparable", "Foo"),
        ]));

        assert_eq!(indices.pins.len(), 4);
        assert_eq!(indices.kind_bucket(PinKind::Method).count(), 2);
        assert_eq!(indices.by_namespace.get("Foo").unwrap().len(), 3);
        assert_eq!(indices.by_path.get("Foo#bar").unwrap().len(), 2);
        // Reference pins have no path and never enter the registry.
        assert!(indices.namespaces.contains("Foo"));
        assert!(indices.namespaces.contains("Foo#bar"));
        assert_eq!(indices.namespaces.len(), 2);
    }

    #[test]
    fn test_duplicate_pins_collapse() {
        let mut indices = Indices::default();
        indices.apply(pin_set(vec![
            Pin::namespace("Foo", ""),
            Pin::namespace("Foo", ""),
        ]));
        assert_eq!(indices.pins.len(), 1);
        assert_eq!(indices.by_path.get("Foo").unwrap().len(), 1);
    }

    #[test]
    fn test_symmetric_difference_add_and_remove() {
        let mut indices = Indices::default();
        indices.apply(pin_set(vec![
            Pin::namespace("Foo", ""),
            Pin::namespace("Bar", ""),
            Pin::method("baz", "Foo", Scope::Instance),
        ]));

        // Drop Bar, add Qux; Foo and Foo#baz are untouched.
        indices.apply(pin_set(vec![
            Pin::namespace("Foo", ""),
            Pin::namespace("Qux", ""),
            Pin::method("baz", "Foo", Scope::Instance),
        ]));

        assert!(indices.by_path.contains_key("Qux"));
        assert!(!indices.by_path.contains_key("Bar"));
        assert!(indices.namespaces.contains("Qux"));
        assert!(!indices.namespaces.contains("Bar"));
        assert_eq!(indices.pins.len(), 3);
    }

    #[test]
    fn test_vacated_bucket_deletes_key() {
        let mut indices = Indices::default();
        indices.apply(pin_set(vec![
            Pin::namespace("Foo", ""),
            Pin::method("a", "Foo", Scope::Instance),
        ]));
        indices.apply(pin_set(vec![Pin::namespace("Foo", "")]));

        assert!(!indices.by_path.contains_key("Foo#a"));
        assert!(!indices.by_namespace.contains_key("Foo"));
        assert!(!indices.by_kind.contains_key(&PinKind::Method));
    }

    #[test]
    fn test_shared_bucket_survives_partial_removal() {
        let mut indices = Indices::default();
        indices.apply(pin_set(vec![
            Pin::method("a", "Foo", Scope::Instance),
            Pin::method("b", "Foo", Scope::Instance),
        ]));
        indices.apply(pin_set(vec![Pin::method("a", "Foo", Scope::Instance)]));

        assert_eq!(indices.by_namespace.get("Foo").unwrap().len(), 1);
        assert_eq!(indices.kind_bucket(PinKind::Method).count(), 1);
        assert!(indices.namespaces.contains("Foo#a"));
        assert!(!indices.namespaces.contains("Foo#b"));
    }
}
