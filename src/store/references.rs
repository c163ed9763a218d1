// Relationship maps derived from reference pins

use std::collections::HashMap;

use tracing::trace;

use crate::pin::PinKind;
use crate::store::index::Indices;

/// Name-keyed relationship maps. Values are ordered and preserve
/// duplicates: two reference pins naming the same module both count.
/// Referenced names stay string keys; they resolve to concrete pins
/// lazily at query time, since the target may live in a file that is
/// not indexed yet.
#[derive(Debug, Default)]
pub(crate) struct ReferenceMaps {
    pub includes: HashMap<String, Vec<String>>,
    pub prepends: HashMap<String, Vec<String>>,
    pub extends: HashMap<String, Vec<String>>,
    pub superclasses: HashMap<String, Vec<String>>,
}

/// Re-derive the relationship maps from the freshly rebuilt kind
/// buckets. Runs from scratch every pass; the buckets are the source
/// of truth and this scan is cheap relative to indexing.
pub(crate) fn resolve(indices: &Indices) -> ReferenceMaps {
    let mut maps = ReferenceMaps::default();
    collect(indices, PinKind::Include, &mut maps.includes);
    collect(indices, PinKind::Prepend, &mut maps.prepends);
    collect(indices, PinKind::Extend, &mut maps.extends);
    collect(indices, PinKind::Superclass, &mut maps.superclasses);
    maps
}

fn collect(indices: &Indices, kind: PinKind, out: &mut HashMap<String, Vec<String>>) {
    for pin in indices.kind_bucket(kind) {
        trace!(kind = kind.as_str(), namespace = %pin.namespace, name = %pin.name, "reference");
        out.entry(pin.namespace.clone()).or_default().push(pin.name.clone());
    }
}
