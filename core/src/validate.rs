//! Structural validation of schema entries.
//!
//! Catches tree shapes the pattern checker cannot evaluate meaningfully
//! (untyped leaves, empty unions, duplicate siblings). Loaders record these
//! on the offending [`Entry`] via [`annotate_module`], so the checker reports
//! them as structural entry errors instead of guessing.
//!
//! # Examples
//!
//! ```
//! use pattern_check_core::*;
//!
//! let good = Entry::leaf("ipv-0", SchemaType::string("string", ["^ipv4$"]));
//! assert!(validate_entry(&good).is_empty());
//!
//! // Invalid: a union must declare at least one member type
//! let bad = Entry::leaf("ipv-1", SchemaType::union("empty-union", Vec::new()));
//! assert_eq!(
//!     validate_entry(&bad),
//!     vec![ValidationError::EmptyUnion("empty-union".to_string())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{Entry, Module, SchemaType};

/// Structural entry errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides the message recorded on the entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Module name is empty or whitespace-only.
    #[error("module name cannot be empty")]
    EmptyModuleName,
    /// Entry name is empty or whitespace-only.
    #[error("entry name cannot be empty")]
    EmptyEntryName,
    /// A leaf was declared without a type.
    #[error("leaf {0} has no type")]
    MissingLeafType(String),
    /// A union type declares no member types.
    #[error("union type {0} has no member types")]
    EmptyUnion(String),
    /// Two siblings share a name.
    #[error("duplicate entry in scope: {0}")]
    DuplicateEntry(String),
}

/// Validates a whole module.
///
/// Checks the module name, every entry at any depth, and sibling name
/// uniqueness. Errors are returned in tree order.
///
/// # Examples
///
/// ```
/// use pattern_check_core::*;
///
/// let module = Module::new("m")
///     .with_entry(Entry::leaf("a", SchemaType::string("string", ["x"])))
///     .with_entry(Entry::leaf("a", SchemaType::string("string", ["y"])));
/// let errors = validate_module(&module);
/// assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateEntry(_))));
/// ```
pub fn validate_module(module: &Module) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if module.name.trim().is_empty() {
        errors.push(ValidationError::EmptyModuleName);
    }

    validate_siblings(&module.entries, &mut errors);
    errors
}

/// Validates a single entry, ignoring its children.
pub fn validate_entry(entry: &Entry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if entry.name.trim().is_empty() {
        errors.push(ValidationError::EmptyEntryName);
    }

    match &entry.ty {
        Some(ty) => validate_type(ty, &mut errors),
        None if entry.kind.is_leaf() => {
            errors.push(ValidationError::MissingLeafType(entry.name.clone()));
        }
        None => {}
    }

    errors
}

/// Records validation errors on the entries they concern.
///
/// Entry-local problems land on the entry itself; a duplicate name lands on
/// the later sibling. Existing errors are kept.
pub fn annotate_module(module: &mut Module) {
    annotate_siblings(&mut module.entries);
}

fn validate_siblings(entries: &[Entry], errors: &mut Vec<ValidationError>) {
    let mut seen: HashSet<&str> = HashSet::new();

    for entry in entries {
        if !seen.insert(entry.name.as_str()) {
            errors.push(ValidationError::DuplicateEntry(entry.name.clone()));
        }
        errors.extend(validate_entry(entry));
        validate_siblings(&entry.children, errors);
    }
}

fn annotate_siblings(entries: &mut [Entry]) {
    let mut seen: HashSet<String> = HashSet::new();

    for entry in entries.iter_mut() {
        let mut found = validate_entry(entry);
        if !seen.insert(entry.name.clone()) {
            found.push(ValidationError::DuplicateEntry(entry.name.clone()));
        }
        entry.errors.extend(found.iter().map(ToString::to_string));
        annotate_siblings(&mut entry.children);
    }
}

fn validate_type(ty: &SchemaType, errors: &mut Vec<ValidationError>) {
    if let SchemaType::Union { name, members } = ty {
        if members.is_empty() {
            errors.push(ValidationError::EmptyUnion(name.clone()));
        }
        for member in members {
            validate_type(member, errors);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{EntryKind, TypeKind};

    use super::*;

    #[test]
    fn test_validate_entry_rejects_untyped_leaf() {
        let entry = Entry::node("ipv-0", EntryKind::Leaf);
        assert_eq!(
            validate_entry(&entry),
            vec![ValidationError::MissingLeafType("ipv-0".to_string())]
        );
    }

    #[test]
    fn test_validate_entry_accepts_untyped_container() {
        let entry = Entry::node("interfaces", EntryKind::Container);
        assert!(validate_entry(&entry).is_empty());
    }

    #[test]
    fn test_validate_entry_finds_nested_empty_union() {
        let ty = SchemaType::union(
            "outer",
            vec![
                SchemaType::scalar("int8", TypeKind::Int8),
                SchemaType::union("inner", Vec::new()),
            ],
        );
        let errors = validate_entry(&Entry::leaf("x", ty));
        assert_eq!(errors, vec![ValidationError::EmptyUnion("inner".to_string())]);
    }

    #[test]
    fn test_validate_module_rejects_empty_name() {
        let errors = validate_module(&Module::new("  "));
        assert_eq!(errors, vec![ValidationError::EmptyModuleName]);
    }

    #[test]
    fn test_annotate_module_marks_later_duplicate() {
        let mut module = Module::new("m").with_entry(
            Entry::node("c", EntryKind::Container)
                .with_child(Entry::leaf("a", SchemaType::string("string", ["x"])))
                .with_child(Entry::leaf("a", SchemaType::string("string", ["y"]))),
        );
        annotate_module(&mut module);

        let children = &module.entries[0].children;
        assert!(children[0].errors.is_empty());
        assert_eq!(children[1].errors, vec!["duplicate entry in scope: a".to_string()]);
    }

    #[test]
    fn test_annotate_module_keeps_existing_errors() {
        let mut module = Module::new("m")
            .with_entry(Entry::node("a", EntryKind::Leaf).with_error("unresolved type foo"));
        annotate_module(&mut module);

        assert_eq!(
            module.entries[0].errors,
            vec![
                "unresolved type foo".to_string(),
                "leaf a has no type".to_string()
            ]
        );
    }
}
