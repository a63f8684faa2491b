//! Run configuration for the pattern checker.
//!
//! # Example YAML
//!
//! ```yaml
//! model_roots:
//!   - testdata
//!   - third_party/models
//! files:
//!   - simple-leaf.yaml
//!   - union-leaf.yaml
//! verbose: true
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, Result};

/// Which files to check and where to look for them.
///
/// Every field is optional in the YAML form. Command-line values extend or
/// override what the file provides.
///
/// # Examples
///
/// ```
/// use pattern_check_loader::CheckConfig;
///
/// let config: CheckConfig = serde_yaml::from_str("model_roots: [models]").unwrap();
/// assert_eq!(config.model_roots.len(), 1);
/// assert!(config.files.is_empty());
/// assert!(!config.verbose);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Directories searched for schema files and their imports.
    pub model_roots: Vec<PathBuf>,
    /// Schema files or directories to check.
    pub files: Vec<PathBuf>,
    /// Log every evaluated test case.
    pub verbose: bool,
}

impl CheckConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, or
    /// [`LoadError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Takes relative model roots relative to `base`, typically the
    /// directory holding the config file. Files stay as written since they
    /// are looked up under the roots.
    pub fn relative_to(mut self, base: &Path) -> Self {
        self.model_roots = self
            .model_roots
            .into_iter()
            .map(|root| if root.is_relative() { base.join(root) } else { root })
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pattern-check.yaml");
        std::fs::write(
            &path,
            "model_roots: [testdata]\nfiles: [simple-leaf.yaml, union-leaf.yaml]\nverbose: true\n",
        )
        .unwrap();

        let config = CheckConfig::load(&path).unwrap();
        assert_eq!(config.model_roots, [PathBuf::from("testdata")]);
        assert_eq!(config.files.len(), 2);
        assert!(config.verbose);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: CheckConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, CheckConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CheckConfig::load("/nonexistent/pattern-check.yaml").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "model_roots: {not: [a list").unwrap();
        assert!(matches!(
            CheckConfig::load(&path).unwrap_err(),
            LoadError::Yaml { .. }
        ));
    }

    #[test]
    fn test_relative_to_rebases_relative_roots() {
        let config = CheckConfig {
            model_roots: vec![PathBuf::from("models"), PathBuf::from("/abs")],
            files: vec![PathBuf::from("a.yaml")],
            verbose: false,
        }
        .relative_to(Path::new("/etc/check"));
        assert_eq!(
            config.model_roots,
            [PathBuf::from("/etc/check/models"), PathBuf::from("/abs")]
        );
        assert_eq!(config.files, [PathBuf::from("a.yaml")]);
    }
}
