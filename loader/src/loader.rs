//! File-backed schema loading.
//!
//! [`FileLoader`] reads the requested module documents, pulls in every module
//! they import from the search roots, resolves type references, and records
//! structural problems on the affected entries.
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use pattern_check_core::SchemaLoader;
//! use pattern_check_loader::FileLoader;
//!
//! let tree = FileLoader::new()
//!     .load(
//!         &[PathBuf::from("simple-leaf.yaml")],
//!         &[PathBuf::from("testdata")],
//!     )
//!     .unwrap();
//! println!("loaded {} modules", tree.module_count());
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use pattern_check_core::{SchemaLoader, SchemaTree, annotate_module};
use tracing::debug;
use walkdir::WalkDir;

use crate::document::{ModuleDoc, TypeResolver, is_document_path, parse_document};
use crate::error::LoadError;

/// File name suffixes tried, in order, when looking for an imported module.
const IMPORT_SUFFIXES: &[&str] = &[".yang.yaml", ".yaml", ".yml", ".json"];

/// Loads YAML or JSON module documents from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl FileLoader {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaLoader for FileLoader {
    type Error = LoadError;

    /// Loads `files` and their imports.
    ///
    /// A directory in `files` stands for every document directly inside it.
    ///
    /// # Errors
    ///
    /// Returns every [`LoadError`] encountered across all files; no tree is
    /// produced if any occurred.
    fn load(
        &self,
        files: &[PathBuf],
        search_roots: &[PathBuf],
    ) -> Result<SchemaTree, Vec<LoadError>> {
        let mut session = LoadSession::default();

        for file in files {
            match locate(file, search_roots) {
                Ok(path) if path.is_dir() => match list_documents(&path) {
                    Ok(paths) => paths.iter().for_each(|p| session.read(p)),
                    Err(err) => session.errors.push(err),
                },
                Ok(path) => session.read(&path),
                Err(err) => session.errors.push(err),
            }
        }
        session.read_imports(search_roots);

        if !session.errors.is_empty() {
            return Err(session.errors);
        }

        let docs: BTreeMap<String, ModuleDoc> = session
            .docs
            .into_iter()
            .map(|(name, (_, doc))| (name, doc))
            .collect();
        let resolver = TypeResolver::new(&docs);

        let mut tree = SchemaTree::new();
        for doc in docs.values() {
            let mut module = resolver.build_module(doc);
            annotate_module(&mut module);
            tree.insert(module);
        }
        debug!(modules = tree.module_count(), "schema tree loaded");
        Ok(tree)
    }
}

/// Accumulates parsed documents and errors for one [`FileLoader::load`] call.
#[derive(Default)]
struct LoadSession {
    docs: BTreeMap<String, (PathBuf, ModuleDoc)>,
    seen: HashSet<PathBuf>,
    errors: Vec<LoadError>,
}

impl LoadSession {
    fn read(&mut self, path: &Path) {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if !self.seen.insert(key) {
            return;
        }

        debug!(path = %path.display(), "reading module document");
        match parse_document(path) {
            Ok(doc) => self.insert(path, doc),
            Err(err) => self.errors.push(err),
        }
    }

    fn insert(&mut self, path: &Path, doc: ModuleDoc) {
        if let Some((first, _)) = self.docs.get(&doc.module) {
            self.errors.push(LoadError::DuplicateModule {
                module: doc.module.clone(),
                first: first.clone(),
                second: path.to_path_buf(),
            });
            return;
        }
        self.docs
            .insert(doc.module.clone(), (path.to_path_buf(), doc));
    }

    /// Follows imports until every imported module is loaded or reported.
    fn read_imports(&mut self, search_roots: &[PathBuf]) {
        let mut attempted = BTreeSet::new();
        let mut index: Option<Vec<Vec<PathBuf>>> = None;

        loop {
            let missing: Vec<(String, String)> = self
                .docs
                .values()
                .flat_map(|(_, doc)| {
                    doc.imports
                        .iter()
                        .map(|import| (doc.module.clone(), import.module.clone()))
                })
                .filter(|(_, import)| !self.docs.contains_key(import))
                .filter(|pair| !attempted.contains(pair))
                .collect();
            if missing.is_empty() {
                return;
            }

            let index = index.get_or_insert_with(|| index_roots(search_roots));
            for (module, import) in missing {
                attempted.insert((module.clone(), import.clone()));
                if self.docs.contains_key(&import) {
                    continue;
                }
                let before = self.errors.len();
                if let Some(path) = find_module(&import, index) {
                    self.read(&path);
                }
                // A found file that declares another module does not satisfy
                // the import.
                if !self.docs.contains_key(&import) && self.errors.len() == before {
                    self.errors.push(LoadError::ImportNotFound { module, import });
                }
            }
        }
    }
}

/// Resolves `file` as given, then relative to each search root in order.
fn locate(file: &Path, search_roots: &[PathBuf]) -> Result<PathBuf, LoadError> {
    if file.exists() {
        return Ok(file.to_path_buf());
    }
    if file.is_relative() {
        if let Some(found) = search_roots
            .iter()
            .map(|root| root.join(file))
            .find(|candidate| candidate.exists())
        {
            return Ok(found);
        }
    }
    Err(LoadError::NotFound(file.to_path_buf()))
}

/// Lists the files under each search root in walk order, one list per root.
///
/// Symlinked directories are not descended into; symlinks to files are kept.
fn index_roots(search_roots: &[PathBuf]) -> Vec<Vec<PathBuf>> {
    search_roots
        .iter()
        .map(|root| {
            WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    entry.file_type().is_file()
                        || (entry.path_is_symlink() && entry.path().is_file())
                })
                .map(|entry| entry.into_path())
                .collect()
        })
        .collect()
}

/// Finds the document for module `name` in the indexed search roots.
///
/// Roots are tried in order; within a root, file name suffixes are tried in
/// order and the first file in walk order with that name wins.
fn find_module(name: &str, index: &[Vec<PathBuf>]) -> Option<PathBuf> {
    let wanted: Vec<String> = IMPORT_SUFFIXES
        .iter()
        .map(|suffix| format!("{name}{suffix}"))
        .collect();

    index.iter().find_map(|files| {
        wanted.iter().find_map(|file_name| {
            files
                .iter()
                .find(|path| {
                    path.file_name().and_then(|n| n.to_str()) == Some(file_name.as_str())
                })
                .cloned()
        })
    })
}

/// Lists the documents directly inside `dir`, sorted by path.
fn list_documents(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_err = |source: std::io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_document_path(&path) {
            paths.insert(path);
        }
    }
    Ok(paths.into_iter().collect())
}
