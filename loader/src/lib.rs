//! File-backed schema loading for the pattern checker.
//!
//! - [`FileLoader`] implements [`SchemaLoader`](pattern_check_core::SchemaLoader)
//!   over YAML and JSON module documents, following imports through the
//!   search roots and resolving typedef references.
//! - [`CheckConfig`] is the YAML run configuration.
//! - [`LoadError`] covers every failure; the loader returns all of them at
//!   once.

mod config;
mod document;
mod error;
mod loader;

pub use config::CheckConfig;
pub use error::{LoadError, Result};
pub use loader::FileLoader;
