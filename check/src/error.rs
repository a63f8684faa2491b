//! Error types for pattern checking.
//!
//! Pattern compile failures and structural entry errors are collected per
//! leaf into [`LeafError`]s and returned together as [`CheckError::Leaves`],
//! so a caller can enumerate every offending pattern after one run.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A declared pattern that is not a valid POSIX extended regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("pattern `{pattern}` is not a valid POSIX regular expression: {reason}")]
pub struct PatternCompileError {
    /// Pattern text as declared in the schema.
    pub pattern: String,
    /// Underlying syntax error.
    pub reason: String,
}

impl PatternCompileError {
    pub(crate) fn new(pattern: &str, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// Location of a checked leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LeafRef {
    /// Module the leaf belongs to.
    pub module: String,
    /// Slash-separated schema path, e.g. `/module/container/leaf`.
    pub path: String,
    /// Leaf name.
    pub name: String,
}

impl fmt::Display for LeafRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Hard error attributed to one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeafError {
    /// The leaf carried structural errors and was not checked.
    #[error("{leaf}: entry had associated errors: {}", .errors.join("; "))]
    Structural { leaf: LeafRef, errors: Vec<String> },
    /// One of the leaf's effective patterns failed to compile.
    #[error("{leaf}: {error}")]
    Pattern {
        leaf: LeafRef,
        error: PatternCompileError,
    },
}

impl LeafError {
    /// Returns the leaf the error is attributed to.
    pub fn leaf(&self) -> &LeafRef {
        match self {
            Self::Structural { leaf, .. } | Self::Pattern { leaf, .. } => leaf,
        }
    }
}

/// Boxed load failure from a [`SchemaLoader`](pattern_check_core::SchemaLoader).
pub type BoxedLoadError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort a check run.
///
/// Any of these means the run produced nothing usable; mismatching test
/// cases are never errors, they are rows of the
/// [`FailureReport`](crate::FailureReport).
#[derive(Debug, Error)]
pub enum CheckError {
    /// The schema loader reported one or more parse failures.
    #[error("could not parse modules: {}", join(.0))]
    Load(Vec<BoxedLoadError>),

    /// The loader returned an empty tree.
    #[error("did not parse any modules")]
    NoModules,

    /// The parsed modules contain no leaves.
    #[error("parsed modules contain no leaves to check")]
    NoLeaves,

    /// At least one leaf had a structural error or a non-compiling pattern.
    #[error("{} leaf error(s): {}", .0.len(), join(.0))]
    Leaves(Vec<LeafError>),
}

impl CheckError {
    /// Returns the per-leaf errors, empty for other variants.
    pub fn leaf_errors(&self) -> &[LeafError] {
        match self {
            Self::Leaves(errors) => errors,
            _ => &[],
        }
    }

    /// Returns the individual loader failures, empty for other variants.
    pub fn load_errors(&self) -> &[BoxedLoadError] {
        match self {
            Self::Load(errors) => errors,
            _ => &[],
        }
    }

    /// Iterates every pattern compile failure with the leaf it belongs to.
    pub fn pattern_errors(&self) -> impl Iterator<Item = (&LeafRef, &PatternCompileError)> {
        self.leaf_errors().iter().filter_map(|err| match err {
            LeafError::Pattern { leaf, error } => Some((leaf, error)),
            LeafError::Structural { .. } => None,
        })
    }
}

fn join<E: fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
