use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Entry, Module};

/// Set of parsed modules handed to the checker.
///
/// Modules are keyed by name in a [`BTreeMap`], so iteration is always in
/// lexicographic module order regardless of the order files were loaded in.
///
/// # Examples
///
/// ```
/// use pattern_check_core::*;
///
/// let mut tree = SchemaTree::new();
/// tree.insert(Module::new("zeta"));
/// tree.insert(Module::new("alpha").with_entry(Entry::leaf(
///     "ipv-0",
///     SchemaType::string("string", ["^ipv4$"]),
/// )));
///
/// let names: Vec<&str> = tree.modules().map(|m| m.name.as_str()).collect();
/// assert_eq!(names, ["alpha", "zeta"]);
/// assert_eq!(tree.module_count(), 2);
/// assert_eq!(tree.leaf_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaTree {
    modules: BTreeMap<String, Module>,
}

impl SchemaTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a module, returning any module previously stored under the
    /// same name.
    pub fn insert(&mut self, module: Module) -> Option<Module> {
        self.modules.insert(module.name.clone(), module)
    }

    /// Looks up a module by name.
    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Iterates modules in name order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Returns the number of modules.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` when no module was loaded.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Counts leaf entries at any depth across all modules.
    pub fn leaf_count(&self) -> usize {
        fn count(entries: &[Entry]) -> usize {
            entries
                .iter()
                .map(|e| usize::from(e.kind.is_leaf()) + count(&e.children))
                .sum()
        }
        self.modules.values().map(|m| count(&m.entries)).sum()
    }
}

impl FromIterator<Module> for SchemaTree {
    fn from_iter<I: IntoIterator<Item = Module>>(iter: I) -> Self {
        let mut tree = Self::new();
        for module in iter {
            tree.insert(module);
        }
        tree
    }
}

/// Source of parsed schema trees.
///
/// Implementations turn a list of schema files plus a list of search roots
/// (used to locate imported modules) into a [`SchemaTree`]. Parse failures
/// are returned together rather than one at a time.
pub trait SchemaLoader {
    /// Individual load failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Loads `files`, resolving relative paths and imports against
    /// `search_roots`.
    fn load(
        &self,
        files: &[PathBuf],
        search_roots: &[PathBuf],
    ) -> Result<SchemaTree, Vec<Self::Error>>;
}
