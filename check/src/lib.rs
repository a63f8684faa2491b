//! Pattern test checking for schema string types.
//!
//! Schema authors annotate leaves with `<prefix>:pattern-test-pass` and
//! `<prefix>:pattern-test-fail` extensions carrying literal test strings.
//! This crate evaluates every such string against the leaf's effective
//! POSIX patterns and reports each case whose outcome disagrees with its
//! annotation.
//!
//! # Main entry points
//!
//! - [`check_tree`] — check an already loaded [`SchemaTree`].
//! - [`check_files`] — load files through a [`SchemaLoader`] first.
//!
//! # Matching rules
//!
//! - Patterns on one type are ANDed ([`combine::match_all`]).
//! - A union matches when any string member type matches
//!   ([`combine::match_any_group`]); non-string members are ignored.
//! - Every pattern is compiled even once the answer is known, so one run
//!   reports every broken pattern. Any broken pattern aborts the run with
//!   [`CheckError::Leaves`] and no failure rows.
//!
//! # Example
//!
//! ```
//! use pattern_check::{CheckOptions, check_tree};
//! use pattern_check_core::*;
//!
//! let leaf = Entry::leaf(
//!     "ipv-0",
//!     SchemaType::union(
//!         "ip-string-typedef",
//!         vec![
//!             SchemaType::string("string", ["^ipv4$"]),
//!             SchemaType::scalar("int32", TypeKind::Int32),
//!         ],
//!     ),
//! )
//! .with_extension("pt:pattern-test-pass", "ipv4")
//! .with_extension("pt:pattern-test-fail", "ipv5");
//!
//! let tree: SchemaTree = [Module::new("union-leaf").with_entry(leaf)].into_iter().collect();
//! let report = check_tree(&tree, CheckOptions::default()).unwrap();
//! assert!(report.is_empty());
//! ```
//!
//! [`SchemaTree`]: pattern_check_core::SchemaTree
//! [`SchemaLoader`]: pattern_check_core::SchemaLoader

pub mod check;
pub mod combine;
pub mod error;
pub mod posix;
pub mod report;
pub mod resolve;
pub mod testcase;
mod translate;

pub use check::{CheckOptions, check_files, check_tree};
pub use error::{CheckError, LeafError, LeafRef, PatternCompileError};
pub use report::{CheckSummary, FailureReport, FailureRow, Mismatch};
