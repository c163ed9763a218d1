// Read operations served from the published store

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexSet;

use crate::pin::{Pin, PinKind, Scope, Visibility, SEPARATOR};
use crate::store::Store;

impl Store {
    /// Constants and nested namespaces directly under `fqns`, filtered
    /// by visibility. Unnamed pins are excluded.
    pub fn get_constants(&self, fqns: &str, visibility: &[Visibility]) -> Vec<Arc<Pin>> {
        self.namespace_children(fqns)
            .filter(|pin| {
                !pin.name.is_empty()
                    && matches!(pin.kind(), PinKind::Namespace | PinKind::Constant)
                    && visibility.contains(&pin.visibility)
            })
            .cloned()
            .collect()
    }

    /// Methods directly under `fqns` matching scope and visibility.
    pub fn get_methods(&self, fqns: &str, scope: Scope, visibility: &[Visibility]) -> Vec<Arc<Pin>> {
        self.namespace_children(fqns)
            .filter(|pin| {
                pin.kind() == PinKind::Method
                    && pin.scope == scope
                    && visibility.contains(&pin.visibility)
            })
            .cloned()
            .collect()
    }

    /// The recorded superclass name for `fqns`, defaulting to `Object`
    /// for known namespaces other than `BasicObject`. `None` means the
    /// superclass is unknown, which is distinct from `Object`.
    pub fn get_superclass(&self, fqns: &str) -> Option<String> {
        if let Some(refs) = self.refs.superclasses.get(fqns) {
            return refs.first().cloned();
        }
        if fqns != "BasicObject" && self.namespace_exists(fqns) {
            return Some("Object".to_string());
        }
        if fqns == "Boolean" {
            return Some("Object".to_string());
        }
        None
    }

    /// Included module names recorded for `fqns`, in source order,
    /// duplicates preserved.
    pub fn get_includes(&self, fqns: &str) -> &[String] {
        self.refs.includes.get(fqns).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_prepends(&self, fqns: &str) -> &[String] {
        self.refs.prepends.get(fqns).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_extends(&self, fqns: &str) -> &[String] {
        self.refs.extends.get(fqns).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All pins sharing a path (redefinitions across files).
    pub fn get_path_pins(&self, path: &str) -> Vec<Arc<Pin>> {
        self.indices
            .by_path
            .get(path)
            .map(|bucket| bucket.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Instance variables owned by `fqns` in the given scope. Ownership
    /// follows the binder, not the lexical namespace: a variable pinned
    /// inside a block may be bound to an enclosing class.
    pub fn get_instance_variables(&self, fqns: &str, scope: Scope) -> Vec<Arc<Pin>> {
        self.pins_by_class(PinKind::InstanceVariable)
            .into_iter()
            .filter(|pin| {
                let binder = pin.effective_binder();
                binder.namespace == fqns && binder.scope == scope
            })
            .collect()
    }

    pub fn get_class_variables(&self, fqns: &str) -> Vec<Arc<Pin>> {
        self.namespace_children(fqns)
            .filter(|pin| pin.kind() == PinKind::ClassVariable)
            .cloned()
            .collect()
    }

    /// All symbol pins, deduplicated by name (first occurrence wins).
    pub fn get_symbols(&self) -> Vec<Arc<Pin>> {
        let mut seen: IndexSet<String> = IndexSet::new();
        self.pins_by_class(PinKind::Symbol)
            .into_iter()
            .filter(|pin| seen.insert(pin.name.clone()))
            .collect()
    }

    /// True iff at least one namespace pin resolves to `fqns`.
    pub fn namespace_exists(&self, fqns: &str) -> bool {
        !self.fqns_pins(fqns).is_empty()
    }

    /// Coarse registry of every path observed among indexed pins.
    pub fn namespaces(&self) -> &IndexSet<String> {
        &self.indices.namespaces
    }

    pub fn namespace_pins(&self) -> Vec<Arc<Pin>> {
        self.pins_by_class(PinKind::Namespace)
    }

    pub fn method_pins(&self) -> Vec<Arc<Pin>> {
        self.pins_by_class(PinKind::Method)
    }

    pub fn block_pins(&self) -> Vec<Arc<Pin>> {
        self.pins_by_class(PinKind::Block)
    }

    /// Concatenated `domains` of every namespace pin matching `fqns`.
    /// Opaque passthrough for downstream mixin resolution.
    pub fn domains(&self, fqns: &str) -> Vec<String> {
        let mut result = Vec::new();
        for pin in self.fqns_pins(fqns) {
            result.extend_from_slice(pin.domains());
        }
        result
    }

    /// Named macro directives across all pins, keyed by macro name,
    /// last write wins. Entries with a missing name or empty body are
    /// excluded. Computed once per store lifetime.
    pub fn named_macros(&self) -> &HashMap<String, String> {
        self.macro_cache.get_or_init(|| {
            let mut result = HashMap::new();
            for pin in &self.indices.pins {
                for directive in pin.macros() {
                    if directive.tag.tag_name != "macro" || directive.tag.text.is_empty() {
                        continue;
                    }
                    match &directive.tag.name {
                        Some(name) if !name.is_empty() => {
                            result.insert(name.clone(), directive.tag.text.clone());
                        }
                        _ => {}
                    }
                }
            }
            result
        })
    }

    /// All pins whose kind is `kind` or a sub-kind of it; querying
    /// `Reference` returns every reference sub-kind together. Memoized
    /// per exact kind argument.
    pub fn pins_by_class(&self, kind: PinKind) -> Vec<Arc<Pin>> {
        if let Some(hit) = self.kind_cache.get(&kind) {
            return hit.value().clone();
        }
        let mut result = Vec::new();
        for (key, bucket) in &self.indices.by_kind {
            if key.is_a(kind) {
                result.extend(bucket.iter().cloned());
            }
        }
        self.kind_cache.insert(kind, result.clone());
        result
    }

    /// Namespace pins resolving `fqns` against nested namespace
    /// scoping: `A::B::C` matches namespace pins named `C` directly
    /// under `A::B`. Memoized per `(base, name)` pair.
    fn fqns_pins(&self, fqns: &str) -> Vec<Arc<Pin>> {
        let (base, name) = match fqns.rfind(SEPARATOR) {
            Some(idx) => (&fqns[..idx], &fqns[idx + SEPARATOR.len()..]),
            None => ("", fqns),
        };
        let key = (base.to_string(), name.to_string());
        if let Some(hit) = self.fqns_cache.get(&key) {
            return hit.value().clone();
        }
        let value: Vec<Arc<Pin>> = self
            .namespace_children(base)
            .filter(|pin| pin.kind() == PinKind::Namespace && pin.name == name)
            .cloned()
            .collect();
        self.fqns_cache.insert(key, value.clone());
        value
    }

    /// Direct children of a namespace, or nothing for unknown names.
    fn namespace_children(&self, name: &str) -> impl Iterator<Item = &Arc<Pin>> {
        self.indices.by_namespace.get(name).into_iter().flatten()
    }
}
