// Override merging: documentation-tag edits applied to target pins

use std::sync::Arc;

use indexmap::IndexSet;
use tracing::trace;

use crate::pin::{Pin, PinDetail, PinKind};
use crate::store::index::Indices;

const CONSTRUCTOR_MARKER: &str = "#initialize";
const CLASS_CONSTRUCTOR_MARKER: &str = ".new";

/// Apply every override pin's tag edits to its target pin, mirroring
/// edits on `#initialize` targets to the matching `.new` pin.
///
/// Runs exactly once per indexing pass, after the bucket indices are
/// final and before the store is published. Mutates docstrings of pins
/// that may be shared by reference with a previous store; see the
/// sharing discipline notes on [`crate::store::Store`].
pub(crate) fn apply(indices: &Indices) {
    for ovr in indices.kind_bucket(PinKind::Override) {
        let PinDetail::Override { tags, delete } = &ovr.detail else {
            continue;
        };
        let Some(target) = first_path_pin(indices, &ovr.name) else {
            trace!(target = %ovr.name, "override target not indexed, skipping");
            continue;
        };
        let mirror = target
            .path()
            .and_then(|path| {
                path.strip_suffix(CONSTRUCTOR_MARKER)
                    .map(|prefix| format!("{}{}", prefix, CLASS_CONSTRUCTOR_MARKER))
            })
            .and_then(|path| first_path_pin(indices, &path));

        let doomed: IndexSet<&str> = tags
            .iter()
            .map(|tag| tag.tag_name.as_str())
            .chain(delete.iter().map(String::as_str))
            .collect();
        for tag_name in &doomed {
            target.docstring.write().delete_tags(tag_name);
            if let Some(mirror) = mirror {
                mirror.docstring.write().delete_tags(tag_name);
            }
        }
        for tag in tags {
            target.docstring.write().add_tag(tag.clone());
            if let Some(mirror) = mirror {
                mirror.docstring.write().add_tag(tag.clone());
            }
        }
    }
}

/// First pin recorded for the path, if any.
fn first_path_pin<'a>(indices: &'a Indices, path: &str) -> Option<&'a Arc<Pin>> {
    indices.by_path.get(path).and_then(|bucket| bucket.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::{Docstring, Scope, Tag};
    use crate::store::index::PinSet;

    fn indices_for(pins: Vec<Pin>) -> Indices {
        let mut indices = Indices::default();
        indices.apply(pins.into_iter().map(Arc::new).collect::<PinSet>());
        indices
    }

    fn doc_with(tag_name: &str) -> Docstring {
        let mut doc = Docstring::default();
        doc.add_tag(Tag::new(tag_name, None::<String>, ""));
        doc
    }

    #[test]
    fn test_override_rewrites_target_docstring() {
        let indices = indices_for(vec![
            Pin::method("bar", "Foo", Scope::Instance).with_docstring(doc_with("param")),
            Pin::override_ref(
                "Foo#bar",
                vec![Tag::new("return", None::<String>, "Integer")],
                vec!["param".to_string()],
            ),
        ]);
        apply(&indices);

        let target = indices.by_path.get("Foo#bar").unwrap().first().unwrap();
        let doc = target.docstring.read();
        assert!(!doc.has_tag("param"));
        assert!(doc.has_tag("return"));
    }

    #[test]
    fn test_constructor_edits_mirror_to_new_pin() {
        let indices = indices_for(vec![
            Pin::method("initialize", "Foo", Scope::Instance).with_docstring(doc_with("param")),
            Pin::method("new", "Foo", Scope::Class).with_docstring(doc_with("param")),
            Pin::override_ref(
                "Foo#initialize",
                vec![Tag::new("return", None::<String>, "Foo")],
                vec!["param".to_string()],
            ),
        ]);
        apply(&indices);

        for path in ["Foo#initialize", "Foo.new"] {
            let pin = indices.by_path.get(path).unwrap().first().unwrap();
            let doc = pin.docstring.read();
            assert!(!doc.has_tag("param"), "{} kept param", path);
            assert!(doc.has_tag("return"), "{} missing return", path);
        }
    }

    #[test]
    fn test_unresolvable_target_is_skipped() {
        let indices = indices_for(vec![Pin::override_ref(
            "Ghost#method",
            vec![Tag::new("return", None::<String>, "nil")],
            vec![],
        )]);
        // Must not panic; nothing to edit.
        apply(&indices);
    }

    #[test]
    fn test_added_tag_names_also_deleted_before_adding() {
        // An override that adds a param tag replaces existing param tags
        // rather than stacking on top of them.
        let mut doc = Docstring::default();
        doc.add_tag(Tag::new("param", Some("old"), "String"));
        doc.add_tag(Tag::new("param", Some("older"), "String"));
        let indices = indices_for(vec![
            Pin::method("bar", "Foo", Scope::Instance).with_docstring(doc),
            Pin::override_ref(
                "Foo#bar",
                vec![Tag::new("param", Some("fresh"), "Integer")],
                vec![],
            ),
        ]);
        apply(&indices);

        let target = indices.by_path.get("Foo#bar").unwrap().first().unwrap();
        let doc = target.docstring.read();
        let params: Vec<_> = doc
            .tags()
            .iter()
            .filter(|tag| tag.tag_name == "param")
            .collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name.as_deref(), Some("fresh"));
    }
}
