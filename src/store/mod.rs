// Indexed pin store: construction pipeline and published snapshot

mod index;
mod overrides;
mod query;
mod references;

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::pin::{Pin, PinKind};
use index::Indices;
use references::ReferenceMaps;

pub use index::PinSet;

/// Immutable snapshot of an indexed pin collection.
///
/// A store is built once per indexing pass from a complete pin
/// collection, optionally seeded from the previous store to diff
/// against. Once published it only serves reads; a changed pin
/// collection produces a new store.
///
/// Sharing discipline: the small-diff construction path aliases
/// unchanged buckets from the previous store, and the override merger
/// edits docstrings in place. An override applied while building a new
/// store can therefore retroactively alter what an older, still-live
/// store reports for the same pin. This trades strict snapshot
/// isolation for cheap incremental rebuilds.
pub struct Store {
    indices: Indices,
    refs: ReferenceMaps,
    // Fill-once memo caches, populated lazily after publication.
    // Recomputing on a racing miss is safe; the underlying data cannot
    // change post-publication.
    kind_cache: DashMap<PinKind, Vec<Arc<Pin>>>,
    fqns_cache: DashMap<(String, String), Vec<Arc<Pin>>>,
    macro_cache: OnceCell<HashMap<String, String>>,
}

impl Store {
    /// Build a store from a complete pin collection. Duplicate pins
    /// collapse under value equality. When `base` is given and the
    /// change is small, its bucket structures seed the build and only
    /// the symmetric difference is processed.
    pub fn new<I>(pins: I, base: Option<&Store>) -> Self
    where
        I: IntoIterator<Item = Arc<Pin>>,
    {
        let new_pins: PinSet = pins.into_iter().collect();
        let mut indices = match base {
            Some(base) if index::reusable(new_pins.len(), base.indices.pins.len()) => {
                debug!(
                    pins = new_pins.len(),
                    base = base.indices.pins.len(),
                    "seeding indices from previous store"
                );
                base.indices.clone()
            }
            _ => Indices::default(),
        };
        indices.apply(new_pins);

        let refs = references::resolve(&indices);
        overrides::apply(&indices);

        info!(
            pins = indices.pins.len(),
            paths = indices.by_path.len(),
            namespaces = indices.by_namespace.len(),
            "store built"
        );
        Self {
            indices,
            refs,
            kind_cache: DashMap::new(),
            fqns_cache: DashMap::new(),
            macro_cache: OnceCell::new(),
        }
    }

    /// The indexed pin set, in insertion order.
    pub fn pins(&self) -> impl Iterator<Item = &Arc<Pin>> {
        self.indices.pins.iter()
    }

    pub fn len(&self) -> usize {
        self.indices.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.pins.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_pins: self.indices.pins.len(),
            total_paths: self.indices.by_path.len(),
            total_namespaces: self.indices.by_namespace.len(),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new([], None)
    }
}

/// Index statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_pins: usize,
    pub total_paths: usize,
    pub total_namespaces: usize,
}
