//! Loader integration tests over schema documents written to temp dirs.

use std::fs;
use std::path::{Path, PathBuf};

use pattern_check_core::{SchemaLoader, TypeKind};
use pattern_check_loader::{FileLoader, LoadError};
use tempfile::TempDir;

const PATTERN_TEST: &str = "\
module: pattern-test
prefix: pt
";

const DERIVED_STRING: &str = r#"
module: derived-string
prefix: ds
imports:
  - {module: pattern-test, prefix: pt}
typedefs:
  - name: ipv4-address-str
    type: {name: string, patterns: ['^ipv4']}
entries:
  - name: ipv4-address
    type: {name: ipv4-address-str, patterns: ['address$']}
    extensions:
      - {keyword: "pt:pattern-test-pass", argument: "ipv4-address"}
      - {keyword: "pt:pattern-test-fail", argument: "ipV4"}
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn roots(dir: &TempDir) -> Vec<PathBuf> {
    vec![dir.path().to_path_buf()]
}

#[test]
fn test_load_follows_imports_from_search_roots() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "ext/pattern-test.yang.yaml", PATTERN_TEST);
    write(dir.path(), "derived-string.yaml", DERIVED_STRING);

    let tree = FileLoader::new()
        .load(&[PathBuf::from("derived-string.yaml")], &roots(&dir))
        .unwrap();

    let names: Vec<&str> = tree.modules().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["derived-string", "pattern-test"]);

    let leaf = tree
        .get("derived-string")
        .unwrap()
        .find_entry("ipv4-address")
        .unwrap();
    let ty = leaf.ty.as_ref().unwrap();
    assert_eq!(ty.name(), "ipv4-address-str");
    assert_eq!(ty.kind(), TypeKind::String);
    assert_eq!(ty.patterns(), ["^ipv4", "address$"]);
    assert_eq!(leaf.extensions.len(), 2);
    assert!(leaf.errors.is_empty());
}

#[test]
fn test_json_documents_load() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "simple.json",
        r#"{
  "module": "simple",
  "entries": [
    {"name": "ipv-0", "type": {"name": "string", "patterns": ["^ipv4$"]}}
  ]
}"#,
    );

    let tree = FileLoader::new().load(&[path], &[]).unwrap();
    let leaf = tree.get("simple").unwrap().find_entry("ipv-0").unwrap();
    assert_eq!(leaf.ty.as_ref().unwrap().patterns(), ["^ipv4$"]);
}

#[test]
fn test_directory_argument_loads_every_document() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "models/a.yaml", "module: a\n");
    write(dir.path(), "models/b.json", r#"{"module": "b"}"#);
    write(dir.path(), "models/README.md", "# not a module");

    let tree = FileLoader::new()
        .load(&[dir.path().join("models")], &[])
        .unwrap();
    assert_eq!(tree.module_count(), 2);
}

#[test]
fn test_load_errors_are_aggregated() {
    let dir = TempDir::new().unwrap();
    let bad_yaml = write(dir.path(), "broken.yaml", "module: [unterminated\n");
    let bad_json = write(dir.path(), "broken.json", "{\"module\": ");
    let text = write(dir.path(), "notes.txt", "module: x\n");
    let importer = write(
        dir.path(),
        "importer.yaml",
        "module: importer\nimports:\n  - {module: nowhere, prefix: nw}\n",
    );

    let errors = FileLoader::new()
        .load(
            &[
                bad_yaml,
                PathBuf::from("missing.yaml"),
                bad_json,
                text,
                importer,
            ],
            &roots(&dir),
        )
        .unwrap_err();

    assert_eq!(errors.len(), 5, "{errors:?}");
    assert!(matches!(errors[0], LoadError::Yaml { .. }));
    assert!(matches!(errors[1], LoadError::NotFound(_)));
    assert!(matches!(errors[2], LoadError::Json { .. }));
    assert!(matches!(errors[3], LoadError::UnsupportedFormat(_)));
    match &errors[4] {
        LoadError::ImportNotFound { module, import } => {
            assert_eq!(module, "importer");
            assert_eq!(import, "nowhere");
        }
        other => panic!("expected ImportNotFound, got {other:?}"),
    }
    assert!(errors[4].to_string().contains("nowhere"));
}

#[test]
fn test_import_file_declaring_other_module_is_not_found() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "types.yaml", "module: something-else\n");
    let importer = write(
        dir.path(),
        "importer.yaml",
        "module: importer\nimports:\n  - {module: types, prefix: t}\n",
    );

    let errors = FileLoader::new()
        .load(&[importer], &roots(&dir))
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], LoadError::ImportNotFound { import, .. } if import == "types"));
}

#[test]
fn test_structural_errors_are_attached_to_entries() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "structural.yaml",
        r#"
module: structural
entries:
  - name: untyped
  - name: dangling
    type: no-such-typedef
  - name: empty-union
    type: {name: union}
  - name: twin
    type: string
  - name: twin
    type: string
"#,
    );

    let tree = FileLoader::new().load(&[path], &[]).unwrap();
    let module = tree.get("structural").unwrap();
    let errors: Vec<(&str, &Vec<String>)> = module
        .entries
        .iter()
        .map(|e| (e.name.as_str(), &e.errors))
        .collect();

    assert_eq!(errors[0].1, &["leaf untyped has no type"]);
    assert_eq!(errors[1].1[0], "unknown type no-such-typedef");
    assert_eq!(errors[2].1, &["union type union has no member types"]);
    assert!(errors[3].1.is_empty());
    assert_eq!(errors[4].1, &["duplicate entry in scope: twin"]);
}
