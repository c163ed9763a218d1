//! In-memory semantic symbol index for code intelligence tools.
//!
//! The crate stores a flat collection of symbol-definition records
//! ("pins") extracted from a codebase and answers structural queries
//! over them: which namespaces exist, what methods and constants a
//! namespace exposes, what its superclass and mixins are, and which
//! variables are visible where.
//!
//! The central type is [`Store`], an immutable snapshot built from a
//! complete pin collection. Rebuilding after a small edit reuses the
//! previous store's bucket structures and processes only the symmetric
//! difference of the two pin sets.
//!
//! ```
//! use std::sync::Arc;
//! use pinmap::{Pin, Scope, Store, Visibility};
//!
//! let store = Store::new(
//!     [
//!         Pin::namespace("Foo", ""),
//!         Pin::method("bar", "Foo", Scope::Instance),
//!         Pin::include_ref("Comparable", "Foo"),
//!     ]
//!     .into_iter()
//!     .map(Arc::new),
//!     None,
//! );
//!
//! assert!(store.namespace_exists("Foo"));
//! assert_eq!(store.get_superclass("Foo").as_deref(), Some("Object"));
//! assert_eq!(store.get_includes("Foo"), ["Comparable"]);
//! assert_eq!(
//!     store.get_methods("Foo", Scope::Instance, &[Visibility::Public]).len(),
//!     1
//! );
//! ```

pub mod logging;
pub mod pin;
pub mod store;

pub use pin::{
    Binder, Directive, Docstring, Location, Pin, PinDetail, PinKind, Scope, Tag, Visibility,
};
pub use store::{Store, StoreStats};
