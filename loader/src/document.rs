//! On-disk module documents and their resolution into the core model.
//!
//! A document is one module:
//!
//! ```yaml
//! module: derived-string
//! prefix: ds
//! imports:
//!   - module: pattern-test
//!     prefix: pt
//! typedefs:
//!   - name: ipv4-address-str
//!     type:
//!       name: string
//!       patterns: ['^ipv4']
//! entries:
//!   - name: ipv4-address
//!     type:
//!       name: ipv4-address-str
//!       patterns: ['address$']
//!     extensions:
//!       - { keyword: "pt:pattern-test-pass", argument: "ipv4-address" }
//! ```
//!
//! A `type` may also be written as a bare name (`type: string`).

use std::collections::BTreeMap;
use std::path::Path;

use pattern_check_core::{Entry, EntryKind, Extension, Module, SchemaType, TypeKind};
use serde::Deserialize;

use crate::error::{LoadError, Result};

/// One parsed module document.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ModuleDoc {
    pub module: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub imports: Vec<ImportDoc>,
    #[serde(default)]
    pub typedefs: Vec<TypedefDoc>,
    #[serde(default)]
    pub entries: Vec<EntryDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ImportDoc {
    pub module: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TypedefDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDoc,
}

/// A type statement: a built-in, `union`, or a typedef reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "TypeDocRepr")]
pub(crate) struct TypeDoc {
    pub name: String,
    pub patterns: Vec<String>,
    pub types: Vec<TypeDoc>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TypeDocRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        patterns: Vec<String>,
        #[serde(default)]
        types: Vec<TypeDoc>,
    },
}

impl From<TypeDocRepr> for TypeDoc {
    fn from(repr: TypeDocRepr) -> Self {
        match repr {
            TypeDocRepr::Name(name) => Self {
                name,
                patterns: Vec::new(),
                types: Vec::new(),
            },
            TypeDocRepr::Full {
                name,
                patterns,
                types,
            } => Self {
                name,
                patterns,
                types,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EntryDoc {
    pub name: String,
    #[serde(default)]
    pub kind: EntryKind,
    #[serde(rename = "type", default)]
    pub ty: Option<TypeDoc>,
    #[serde(default)]
    pub extensions: Vec<Extension>,
    #[serde(default)]
    pub children: Vec<EntryDoc>,
}

/// Reads and parses a module document, choosing the format by extension.
pub(crate) fn parse_document(path: &Path) -> Result<ModuleDoc> {
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match format.as_deref() {
        Some("yaml" | "yml") => {
            let content = read(path)?;
            serde_yaml::from_str(&content).map_err(|source| LoadError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        Some("json") => {
            let content = read(path)?;
            serde_json::from_str(&content).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Returns `true` if the path has an extension [`parse_document`] accepts.
pub(crate) fn is_document_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves type statements against the typedefs of every loaded document.
pub(crate) struct TypeResolver<'a> {
    modules: &'a BTreeMap<String, ModuleDoc>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(modules: &'a BTreeMap<String, ModuleDoc>) -> Self {
        Self { modules }
    }

    /// Builds the core module for `doc`.
    ///
    /// Type problems are recorded on the entry that declared the type rather
    /// than failing the load.
    pub fn build_module(&self, doc: &ModuleDoc) -> Module {
        Module {
            name: doc.module.clone(),
            entries: doc
                .entries
                .iter()
                .map(|entry| self.build_entry(doc, entry))
                .collect(),
        }
    }

    fn build_entry(&self, doc: &ModuleDoc, entry: &EntryDoc) -> Entry {
        let mut built = Entry::node(entry.name.clone(), entry.kind);
        built.extensions = entry.extensions.clone();

        if let Some(ty) = &entry.ty {
            match self.resolve(doc, ty, &mut Vec::new()) {
                Ok(resolved) => built.ty = Some(resolved),
                Err(err) => built.errors.push(err),
            }
        }

        built.children = entry
            .children
            .iter()
            .map(|child| self.build_entry(doc, child))
            .collect();
        built
    }

    /// `stack` holds the `(module, typedef)` pairs being expanded.
    fn resolve(
        &self,
        doc: &ModuleDoc,
        ty: &TypeDoc,
        stack: &mut Vec<(String, String)>,
    ) -> std::result::Result<SchemaType, String> {
        match TypeKind::from_builtin(&ty.name) {
            Some(TypeKind::Union) => {
                if !ty.patterns.is_empty() {
                    return Err("union type cannot carry patterns".to_string());
                }
                let members = ty
                    .types
                    .iter()
                    .map(|member| self.resolve(doc, member, stack))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(SchemaType::union(ty.name.clone(), members))
            }
            Some(kind) => {
                if !ty.types.is_empty() {
                    return Err(format!("type {} cannot declare member types", ty.name));
                }
                Ok(SchemaType::Scalar {
                    name: ty.name.clone(),
                    kind,
                    patterns: ty.patterns.clone(),
                })
            }
            None => self.resolve_typedef(doc, ty, stack),
        }
    }

    fn resolve_typedef(
        &self,
        doc: &ModuleDoc,
        ty: &TypeDoc,
        stack: &mut Vec<(String, String)>,
    ) -> std::result::Result<SchemaType, String> {
        if !ty.types.is_empty() {
            return Err(format!("type {} cannot declare member types", ty.name));
        }

        let (target, local) = self.typedef_scope(doc, &ty.name)?;
        let typedef = target
            .typedefs
            .iter()
            .find(|td| td.name == local)
            .ok_or_else(|| format!("unknown type {}", ty.name))?;

        let key = (target.module.clone(), local.to_string());
        if stack.contains(&key) {
            return Err(format!("typedef cycle through {}:{}", key.0, key.1));
        }
        stack.push(key);
        let base = self.resolve(target, &typedef.ty, stack);
        stack.pop();

        match base? {
            SchemaType::Scalar {
                kind, mut patterns, ..
            } => {
                patterns.extend(ty.patterns.iter().cloned());
                Ok(SchemaType::Scalar {
                    name: local.to_string(),
                    kind,
                    patterns,
                })
            }
            SchemaType::Union { members, .. } => {
                if !ty.patterns.is_empty() {
                    return Err(format!("union type {} cannot carry patterns", ty.name));
                }
                Ok(SchemaType::union(local, members))
            }
        }
    }

    /// Finds the document that owns `name` and the name local to it.
    fn typedef_scope<'d, 'n>(
        &'d self,
        doc: &'d ModuleDoc,
        name: &'n str,
    ) -> std::result::Result<(&'d ModuleDoc, &'n str), String> {
        let Some((prefix, local)) = name.split_once(':') else {
            return Ok((doc, name));
        };
        if doc.prefix.as_deref() == Some(prefix) {
            return Ok((doc, local));
        }

        let import = doc
            .imports
            .iter()
            .find(|import| import.prefix == prefix)
            .ok_or_else(|| format!("unknown prefix {prefix} in type {name}"))?;
        let target = self
            .modules
            .get(&import.module)
            .ok_or_else(|| format!("imported module {} is not loaded", import.module))?;
        Ok((target, local))
    }
}
