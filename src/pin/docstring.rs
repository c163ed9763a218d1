// Tagged documentation metadata attached to pins

use serde::{Deserialize, Serialize};

/// A single tagged documentation entry (e.g. `@param`, `@return`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// The tag kind, e.g. `param` or `macro`.
    pub tag_name: String,
    /// Optional subject name (parameter name, macro name).
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form tag body.
    #[serde(default)]
    pub text: String,
}

impl Tag {
    pub fn new(
        tag_name: impl Into<String>,
        name: Option<impl Into<String>>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            tag_name: tag_name.into(),
            name: name.map(Into::into),
            text: text.into(),
        }
    }
}

/// A behavioral directive embedded in a docstring (`@!macro` and friends).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Directive {
    pub tag: Tag,
}

impl Directive {
    pub fn new(tag: Tag) -> Self {
        Self { tag }
    }
}

/// Ordered, mutable collection of tagged documentation metadata.
///
/// The docstring is the only mutable attribute of a pin; the override
/// merger edits it in place during store construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docstring {
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    directives: Vec<Directive>,
}

impl Docstring {
    pub fn new(tags: Vec<Tag>, directives: Vec<Directive>) -> Self {
        Self { tags, directives }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn has_tag(&self, tag_name: &str) -> bool {
        self.tags.iter().any(|tag| tag.tag_name == tag_name)
    }

    /// Append a tag, keeping insertion order.
    pub fn add_tag(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    pub fn add_directive(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    /// Remove every tag with the given tag name.
    pub fn delete_tags(&mut self, tag_name: &str) {
        self.tags.retain(|tag| tag.tag_name != tag_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_delete_tags() {
        let mut doc = Docstring::default();
        doc.add_tag(Tag::new("param", Some("a"), "Integer"));
        doc.add_tag(Tag::new("param", Some("b"), "String"));
        doc.add_tag(Tag::new("return", None::<String>, "Boolean"));

        assert!(doc.has_tag("param"));
        doc.delete_tags("param");
        assert!(!doc.has_tag("param"));
        assert!(doc.has_tag("return"));
        assert_eq!(doc.tags().len(), 1);
    }

    #[test]
    fn test_tags_keep_insertion_order() {
        let mut doc = Docstring::default();
        doc.add_tag(Tag::new("param", Some("a"), ""));
        doc.add_tag(Tag::new("return", None::<String>, ""));
        doc.add_tag(Tag::new("param", Some("b"), ""));

        let names: Vec<&str> = doc.tags().iter().map(|t| t.tag_name.as_str()).collect();
        assert_eq!(names, vec!["param", "return", "param"]);
    }

    #[test]
    fn test_delete_missing_tag_is_noop() {
        let mut doc = Docstring::default();
        doc.add_tag(Tag::new("return", None::<String>, "void"));
        doc.delete_tags("param");
        assert_eq!(doc.tags().len(), 1);
    }
}
