//! Core schema tree types shared by the pattern checker and its loaders.
//!
//! This crate defines the read-only model the checker consumes:
//!
//! - [`SchemaTree`] — parsed modules keyed by name, iterated in name order.
//! - [`Module`] — a named collection of [`Entry`] nodes.
//! - [`Entry`] — one schema node with its kind, declared [`SchemaType`],
//!   [`Extension`] statements, structural errors, and children.
//! - [`SchemaType`] — a scalar with its POSIX pattern list, or a union of
//!   member types.
//!
//! Validation ([`validate_module`], [`validate_entry`]) catches structural
//! errors such as untyped leaves and empty unions; [`annotate_module`]
//! records them on the offending entries.
//!
//! Loading is abstracted by the [`SchemaLoader`] trait.
//!
//! # Example
//!
//! ```
//! use pattern_check_core::*;
//!
//! let module = Module::new("simple-leaf").with_entry(
//!     Entry::leaf("ipv-0", SchemaType::string("string", ["^ipv4$"]))
//!         .with_extension("pt:pattern-test-pass", "ipv4")
//!         .with_extension("pt:pattern-test-fail", "ipv6"),
//! );
//!
//! let mut tree = SchemaTree::new();
//! tree.insert(module);
//! assert_eq!(tree.leaf_count(), 1);
//! assert!(validate_module(tree.get("simple-leaf").unwrap()).is_empty());
//! ```

mod tree;
mod types;
mod validate;

pub use tree::{SchemaLoader, SchemaTree};
pub use types::*;
pub use validate::{ValidationError, annotate_module, validate_entry, validate_module};
