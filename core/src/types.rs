//! Schema tree type definitions.
//!
//! This module defines the read-only view of a parsed schema that the pattern
//! checker walks: modules own entries, entries carry a declared type and an
//! ordered list of extension statements. The types are designed for
//! serialization with [`serde`] so a loaded tree can be dumped and reloaded.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a schema node.
///
/// Only [`EntryKind::Leaf`] entries are checked; the other kinds are walked
/// for their children.
///
/// # Examples
///
/// ```
/// use pattern_check_core::EntryKind;
///
/// assert_eq!(EntryKind::default(), EntryKind::Leaf);
/// assert!(EntryKind::Leaf.is_leaf());
/// assert!(!EntryKind::Container.is_leaf());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// A single typed value (the default).
    #[default]
    Leaf,
    /// A sequence of typed values.
    LeafList,
    /// A grouping node without a value of its own.
    Container,
    /// A keyed list of nested entries.
    List,
    /// A choice between alternative cases.
    Choice,
    /// One alternative of a choice.
    Case,
}

impl EntryKind {
    /// Returns `true` for [`EntryKind::Leaf`].
    pub fn is_leaf(self) -> bool {
        self == Self::Leaf
    }
}

/// Built-in type a declared type ultimately derives from.
///
/// Derived types keep the kind of their base, so a typedef over `string`
/// still reports [`TypeKind::String`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    Binary,
    Bits,
    Boolean,
    Decimal64,
    Empty,
    Enumeration,
    Identityref,
    InstanceIdentifier,
    Int8,
    Int16,
    Int32,
    Int64,
    Leafref,
    String,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Union,
}

impl TypeKind {
    const BUILTINS: &'static [(&'static str, TypeKind)] = &[
        ("binary", TypeKind::Binary),
        ("bits", TypeKind::Bits),
        ("boolean", TypeKind::Boolean),
        ("decimal64", TypeKind::Decimal64),
        ("empty", TypeKind::Empty),
        ("enumeration", TypeKind::Enumeration),
        ("identityref", TypeKind::Identityref),
        ("instance-identifier", TypeKind::InstanceIdentifier),
        ("int8", TypeKind::Int8),
        ("int16", TypeKind::Int16),
        ("int32", TypeKind::Int32),
        ("int64", TypeKind::Int64),
        ("leafref", TypeKind::Leafref),
        ("string", TypeKind::String),
        ("uint8", TypeKind::Uint8),
        ("uint16", TypeKind::Uint16),
        ("uint32", TypeKind::Uint32),
        ("uint64", TypeKind::Uint64),
        ("union", TypeKind::Union),
    ];

    /// Looks up a built-in type by its schema-language name.
    ///
    /// Returns `None` for anything else, which callers treat as a typedef
    /// reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use pattern_check_core::TypeKind;
    ///
    /// assert_eq!(TypeKind::from_builtin("string"), Some(TypeKind::String));
    /// assert_eq!(TypeKind::from_builtin("instance-identifier"), Some(TypeKind::InstanceIdentifier));
    /// assert_eq!(TypeKind::from_builtin("ipv4-address"), None);
    /// ```
    pub fn from_builtin(name: &str) -> Option<Self> {
        Self::BUILTINS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, kind)| *kind)
    }

    /// Returns the schema-language name of the built-in.
    pub fn as_str(self) -> &'static str {
        Self::BUILTINS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or("union", |(name, _)| *name)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a leaf.
///
/// A type is either a scalar carrying its own POSIX pattern list, or a union
/// of member types. Member types are themselves [`SchemaType`]s, so a member
/// may be another union; such members are not string-kinded and take no part
/// in pattern matching.
///
/// # Examples
///
/// ```
/// use pattern_check_core::{SchemaType, TypeKind};
///
/// let ip = SchemaType::union(
///     "ip-string-typedef",
///     vec![
///         SchemaType::string("string", ["^ipv4$"]),
///         SchemaType::scalar("int32", TypeKind::Int32),
///     ],
/// );
/// assert_eq!(ip.kind(), TypeKind::Union);
/// assert_eq!(ip.name(), "ip-string-typedef");
/// assert_eq!(ip.members().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SchemaType {
    /// A non-union type with zero or more patterns.
    Scalar {
        name: String,
        kind: TypeKind,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        patterns: Vec<String>,
    },
    /// A union of member types, in declaration order.
    Union {
        name: String,
        members: Vec<SchemaType>,
    },
}

impl SchemaType {
    /// Creates an unrestricted scalar type.
    pub fn scalar(name: impl Into<String>, kind: TypeKind) -> Self {
        Self::Scalar {
            name: name.into(),
            kind,
            patterns: Vec::new(),
        }
    }

    /// Creates a string type restricted by `patterns`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pattern_check_core::{SchemaType, TypeKind};
    ///
    /// let ty = SchemaType::string("string", ["^ipv4$"]);
    /// assert_eq!(ty.kind(), TypeKind::String);
    /// assert_eq!(ty.patterns(), ["^ipv4$"]);
    /// ```
    pub fn string<I, S>(name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Scalar {
            name: name.into(),
            kind: TypeKind::String,
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a union type.
    pub fn union(name: impl Into<String>, members: Vec<SchemaType>) -> Self {
        Self::Union {
            name: name.into(),
            members,
        }
    }

    /// Returns the declared type name (a built-in or typedef name).
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name, .. } | Self::Union { name, .. } => name,
        }
    }

    /// Returns the built-in kind, [`TypeKind::Union`] for unions.
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar { kind, .. } => *kind,
            Self::Union { .. } => TypeKind::Union,
        }
    }

    /// Returns the scalar pattern list; unions carry none of their own.
    pub fn patterns(&self) -> &[String] {
        match self {
            Self::Scalar { patterns, .. } => patterns,
            Self::Union { .. } => &[],
        }
    }

    /// Returns the union members; scalars have none.
    pub fn members(&self) -> &[SchemaType] {
        match self {
            Self::Scalar { .. } => &[],
            Self::Union { members, .. } => members,
        }
    }

    /// Returns `true` for a scalar of kind [`TypeKind::String`].
    pub fn is_string(&self) -> bool {
        self.kind() == TypeKind::String
    }
}

/// Extension statement attached to an entry.
///
/// The keyword is the prefixed extension name (e.g.
/// `pt:pattern-test-pass`) and the argument its literal string argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub keyword: String,
    #[serde(default)]
    pub argument: String,
}

impl Extension {
    /// Creates an extension statement.
    pub fn new(keyword: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            argument: argument.into(),
        }
    }
}

/// One node of a module's schema tree.
///
/// Use [`Entry::leaf`] to build a leaf, then chain
/// [`with_extension`](Entry::with_extension) to attach test annotations.
///
/// # Examples
///
/// ```
/// use pattern_check_core::{Entry, EntryKind, SchemaType};
///
/// let leaf = Entry::leaf("ipv-0", SchemaType::string("string", ["^ipv4$"]))
///     .with_extension("pt:pattern-test-pass", "ipv4")
///     .with_extension("pt:pattern-test-fail", "ipv6");
///
/// assert_eq!(leaf.kind, EntryKind::Leaf);
/// assert_eq!(leaf.extensions.len(), 2);
/// assert!(leaf.errors.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Node name, unique among its siblings.
    pub name: String,
    #[serde(default)]
    pub kind: EntryKind,
    /// Declared type; only meaningful for leaves.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<SchemaType>,
    /// Extension statements in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
    /// Structural errors recorded while the tree was built.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Nested entries in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Entry>,
}

impl Entry {
    /// Creates a leaf of the given type.
    pub fn leaf(name: impl Into<String>, ty: SchemaType) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Leaf,
            ty: Some(ty),
            extensions: Vec::new(),
            errors: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an untyped interior node such as a container or list.
    pub fn node(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ty: None,
            extensions: Vec::new(),
            errors: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Appends an extension statement.
    pub fn with_extension(mut self, keyword: &str, argument: &str) -> Self {
        self.extensions.push(Extension::new(keyword, argument));
        self
    }

    /// Appends a child entry.
    pub fn with_child(mut self, child: Entry) -> Self {
        self.children.push(child);
        self
    }

    /// Records a structural error.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }
}

/// Named collection of entries.
///
/// # Examples
///
/// ```
/// use pattern_check_core::{Entry, Module, SchemaType};
///
/// let module = Module::new("simple-leaf")
///     .with_entry(Entry::leaf("ipv-0", SchemaType::string("string", ["^ipv4$"])));
/// assert_eq!(module.entries.len(), 1);
/// assert!(module.find_entry("ipv-0").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    /// Top-level entries in declaration order.
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Module {
    /// Creates an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Appends a top-level entry.
    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Finds a top-level entry by name.
    pub fn find_entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_kind_names_round_trip() {
        for (name, kind) in TypeKind::BUILTINS {
            assert_eq!(TypeKind::from_builtin(name), Some(*kind));
            assert_eq!(kind.as_str(), *name);
        }
    }

    #[test]
    fn test_union_accessors() {
        let ty = SchemaType::union("u", vec![SchemaType::string("string", ["a"])]);
        assert!(ty.patterns().is_empty());
        assert!(!ty.is_string());
        assert_eq!(ty.members()[0].patterns(), ["a"]);
    }

    #[test]
    fn test_schema_type_serde_tagging() {
        let ty = SchemaType::union(
            "ip-string-typedef",
            vec![
                SchemaType::string("string", ["^ipv4$"]),
                SchemaType::scalar("int32", TypeKind::Int32),
            ],
        );
        let json = serde_json::to_value(&ty).unwrap();
        assert_eq!(json["shape"], "union");
        assert_eq!(json["members"][0]["shape"], "scalar");
        assert_eq!(json["members"][0]["kind"], "string");
        assert_eq!(json["members"][1]["kind"], "int32");

        let back: SchemaType = serde_json::from_value(json).unwrap();
        assert_eq!(back, ty);
    }

    #[test]
    fn test_entry_defaults_when_deserialized() {
        let entry: Entry = serde_json::from_str(r#"{"name": "c", "kind": "container"}"#).unwrap();
        assert_eq!(entry.kind, EntryKind::Container);
        assert!(entry.ty.is_none());
        assert!(entry.children.is_empty());
        assert!(entry.errors.is_empty());
    }
}
