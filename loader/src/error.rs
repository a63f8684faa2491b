//! Error types for schema loading.
//!
//! Every failure carries the path it concerns. The loader collects all of
//! them across a run instead of stopping at the first one.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading schema documents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON document could not be parsed.
    #[error("JSON error in '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// YAML document could not be parsed.
    #[error("YAML error in '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// File extension is neither YAML nor JSON.
    #[error("unsupported schema file format: '{}'", .0.display())]
    UnsupportedFormat(PathBuf),

    /// File does not exist as given nor under any search root.
    #[error("schema file not found: '{}'", .0.display())]
    NotFound(PathBuf),

    /// An imported module is not present under any search root.
    #[error("module {module} imports {import}, which was not found under any search root")]
    ImportNotFound { module: String, import: String },

    /// Two documents declare the same module name.
    #[error(
        "module {module} is defined in both '{}' and '{}'",
        .first.display(),
        .second.display()
    )]
    DuplicateModule {
        module: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
