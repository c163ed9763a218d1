// Pin data model: immutable symbol-definition records

pub mod docstring;

use std::hash::{Hash, Hasher};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

pub use docstring::{Directive, Docstring, Tag};

/// Namespace nesting separator in fully qualified names.
pub const SEPARATOR: &str = "::";

/// Pin kinds, including the abstract `Reference` kind used only for
/// polymorphic queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    Namespace,
    Method,
    Constant,
    ClassVariable,
    InstanceVariable,
    LocalVariable,
    Block,
    Symbol,
    Reference,
    Include,
    Prepend,
    Extend,
    Superclass,
    Override,
}

impl PinKind {
    /// Kind-hierarchy table: `Reference` covers every reference sub-kind.
    pub fn is_a(self, ancestor: PinKind) -> bool {
        self == ancestor
            || (ancestor == PinKind::Reference
                && matches!(
                    self,
                    PinKind::Include
                        | PinKind::Prepend
                        | PinKind::Extend
                        | PinKind::Superclass
                        | PinKind::Override
                ))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PinKind::Namespace => "namespace",
            PinKind::Method => "method",
            PinKind::Constant => "constant",
            PinKind::ClassVariable => "class_variable",
            PinKind::InstanceVariable => "instance_variable",
            PinKind::LocalVariable => "local_variable",
            PinKind::Block => "block",
            PinKind::Symbol => "symbol",
            PinKind::Reference => "reference",
            PinKind::Include => "include",
            PinKind::Prepend => "prepend",
            PinKind::Extend => "extend",
            PinKind::Superclass => "superclass",
            PinKind::Override => "override",
        }
    }

    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "namespace" => Ok(PinKind::Namespace),
            "method" => Ok(PinKind::Method),
            "constant" => Ok(PinKind::Constant),
            "class_variable" => Ok(PinKind::ClassVariable),
            "instance_variable" => Ok(PinKind::InstanceVariable),
            "local_variable" => Ok(PinKind::LocalVariable),
            "block" => Ok(PinKind::Block),
            "symbol" => Ok(PinKind::Symbol),
            "reference" => Ok(PinKind::Reference),
            "include" => Ok(PinKind::Include),
            "prepend" => Ok(PinKind::Prepend),
            "extend" => Ok(PinKind::Extend),
            "superclass" => Ok(PinKind::Superclass),
            "override" => Ok(PinKind::Override),
            _ => anyhow::bail!("Unknown pin kind: {}", s),
        }
    }
}

/// Symbol visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Protected => "protected",
        }
    }

    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            "protected" => Ok(Visibility::Protected),
            _ => anyhow::bail!("Unknown visibility: {}", s),
        }
    }
}

/// Class-level vs instance-level scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Instance,
    Class,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Instance => "instance",
            Scope::Class => "class",
        }
    }

    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "instance" => Ok(Scope::Instance),
            "class" => Ok(Scope::Class),
            _ => anyhow::bail!("Unknown scope: {}", s),
        }
    }
}

/// Location in source code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// True if the position falls inside this range (inclusive).
    pub fn contains(&self, line: u32, column: u32) -> bool {
        if line < self.line || line > self.end_line {
            return false;
        }
        if line == self.line && column < self.column {
            return false;
        }
        if line == self.end_line && column > self.end_column {
            return false;
        }
        true
    }
}

/// The effective namespace+scope context a variable pin is evaluated
/// against, which may differ from its lexical enclosing namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binder {
    pub namespace: String,
    pub scope: Scope,
}

/// Kind tag plus kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PinDetail {
    Namespace {
        /// Opaque passthrough consumed by downstream type inference.
        #[serde(default)]
        domains: Vec<String>,
    },
    Method,
    Constant,
    ClassVariable,
    InstanceVariable,
    LocalVariable {
        /// Source range the variable is visible in.
        #[serde(default)]
        presence: Option<Location>,
    },
    Block,
    Symbol,
    Include,
    Prepend,
    Extend,
    Superclass,
    Override {
        /// Tags to add to the target pin's docstring.
        #[serde(default)]
        tags: Vec<Tag>,
        /// Tag names to delete from the target pin's docstring.
        #[serde(default)]
        delete: Vec<String>,
    },
}

impl PinDetail {
    pub fn kind(&self) -> PinKind {
        match self {
            PinDetail::Namespace { .. } => PinKind::Namespace,
            PinDetail::Method => PinKind::Method,
            PinDetail::Constant => PinKind::Constant,
            PinDetail::ClassVariable => PinKind::ClassVariable,
            PinDetail::InstanceVariable => PinKind::InstanceVariable,
            PinDetail::LocalVariable { .. } => PinKind::LocalVariable,
            PinDetail::Block => PinKind::Block,
            PinDetail::Symbol => PinKind::Symbol,
            PinDetail::Include => PinKind::Include,
            PinDetail::Prepend => PinKind::Prepend,
            PinDetail::Extend => PinKind::Extend,
            PinDetail::Superclass => PinKind::Superclass,
            PinDetail::Override { .. } => PinKind::Override,
        }
    }
}

/// A symbol-definition record extracted from source.
///
/// Pins are value objects: equality and hashing cover every attribute
/// except the docstring, which the override merger may mutate in place
/// after indexing.
///
/// For reference pins `name` holds the referenced name (the included
/// module, the superclass, the overridden path), not a declared symbol.
#[derive(Debug, Serialize, Deserialize)]
pub struct Pin {
    #[serde(flatten)]
    pub detail: PinDetail,
    pub name: String,
    /// Fully qualified name of the lexical enclosing namespace; empty
    /// string means top level.
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub binder: Option<Binder>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub docstring: RwLock<Docstring>,
}

impl Pin {
    fn base(detail: PinDetail, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            detail,
            name: name.into(),
            namespace: namespace.into(),
            visibility: Visibility::default(),
            scope: Scope::default(),
            binder: None,
            location: None,
            docstring: RwLock::default(),
        }
    }

    pub fn namespace(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::base(PinDetail::Namespace { domains: Vec::new() }, name, namespace)
    }

    pub fn method(name: impl Into<String>, namespace: impl Into<String>, scope: Scope) -> Self {
        let mut pin = Self::base(PinDetail::Method, name, namespace);
        pin.scope = scope;
        pin
    }

    pub fn constant(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::base(PinDetail::Constant, name, namespace)
    }

    pub fn class_variable(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::base(PinDetail::ClassVariable, name, namespace)
    }

    pub fn instance_variable(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::base(PinDetail::InstanceVariable, name, namespace)
    }

    pub fn local_variable(
        name: impl Into<String>,
        namespace: impl Into<String>,
        presence: Option<Location>,
    ) -> Self {
        Self::base(PinDetail::LocalVariable { presence }, name, namespace)
    }

    pub fn block(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::base(PinDetail::Block, name, namespace)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::base(PinDetail::Symbol, name, "")
    }

    pub fn include_ref(referenced: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::base(PinDetail::Include, referenced, namespace)
    }

    pub fn prepend_ref(referenced: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::base(PinDetail::Prepend, referenced, namespace)
    }

    pub fn extend_ref(referenced: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::base(PinDetail::Extend, referenced, namespace)
    }

    pub fn superclass_ref(referenced: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::base(PinDetail::Superclass, referenced, namespace)
    }

    pub fn override_ref(target_path: impl Into<String>, tags: Vec<Tag>, delete: Vec<String>) -> Self {
        Self::base(PinDetail::Override { tags, delete }, target_path, "")
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_binder(mut self, namespace: impl Into<String>, scope: Scope) -> Self {
        self.binder = Some(Binder {
            namespace: namespace.into(),
            scope,
        });
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_docstring(self, docstring: Docstring) -> Self {
        *self.docstring.write() = docstring;
        self
    }

    pub fn with_domains(mut self, domains: Vec<String>) -> Self {
        if let PinDetail::Namespace { domains: slot } = &mut self.detail {
            *slot = domains;
        }
        self
    }

    pub fn kind(&self) -> PinKind {
        self.detail.kind()
    }

    /// Conventional path form for this pin: `Ns::Name` for namespaces,
    /// constants and variables, `Ns#name` / `Ns.name` for instance and
    /// class methods. `None` for pins that cannot act as containers
    /// (blocks and reference pins). Paths are not unique; redefinitions
    /// across files produce multiple pins sharing a path.
    pub fn path(&self) -> Option<String> {
        match self.detail {
            PinDetail::Namespace { .. }
            | PinDetail::Constant
            | PinDetail::ClassVariable
            | PinDetail::InstanceVariable
            | PinDetail::LocalVariable { .. } => Some(join(&self.namespace, &self.name)),
            PinDetail::Method => {
                let joint = if self.scope == Scope::Instance { "#" } else { "." };
                Some(format!("{}{}{}", self.namespace, joint, self.name))
            }
            PinDetail::Symbol => Some(self.name.clone()),
            PinDetail::Block
            | PinDetail::Include
            | PinDetail::Prepend
            | PinDetail::Extend
            | PinDetail::Superclass
            | PinDetail::Override { .. } => None,
        }
    }

    /// The binder the pin is evaluated against, falling back to the
    /// lexical namespace and scope when no explicit binder was recorded.
    pub fn effective_binder(&self) -> Binder {
        self.binder.clone().unwrap_or(Binder {
            namespace: self.namespace.clone(),
            scope: self.scope,
        })
    }

    pub fn domains(&self) -> &[String] {
        match &self.detail {
            PinDetail::Namespace { domains } => domains,
            _ => &[],
        }
    }

    /// Docstring directives, cloned out of the docstring cell.
    pub fn macros(&self) -> Vec<Directive> {
        self.docstring.read().directives().to_vec()
    }

    /// True if a local variable pin is visible at the given source
    /// position. Always false for other kinds.
    pub fn visible_from(&self, file: &str, line: u32, column: u32) -> bool {
        match &self.detail {
            PinDetail::LocalVariable {
                presence: Some(presence),
            } => presence.file == file && presence.contains(line, column),
            _ => false,
        }
    }
}

/// Join an enclosing namespace and a local name with the separator.
pub fn join(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", namespace, SEPARATOR, name)
    }
}

impl Clone for Pin {
    fn clone(&self) -> Self {
        Self {
            detail: self.detail.clone(),
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            visibility: self.visibility,
            scope: self.scope,
            binder: self.binder.clone(),
            location: self.location.clone(),
            docstring: RwLock::new(self.docstring.read().clone()),
        }
    }
}

// Equality and hashing exclude the docstring: it is the one attribute
// the override merger mutates while pins sit inside hashed buckets.
impl PartialEq for Pin {
    fn eq(&self, other: &Self) -> bool {
        self.detail == other.detail
            && self.name == other.name
            && self.namespace == other.namespace
            && self.visibility == other.visibility
            && self.scope == other.scope
            && self.binder == other.binder
            && self.location == other.location
    }
}

impl Eq for Pin {}

impl Hash for Pin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.detail.hash(state);
        self.name.hash(state);
        self.namespace.hash(state);
        self.visibility.hash(state);
        self.scope.hash(state);
        self.binder.hash(state);
        self.location.hash(state);
    }
}
