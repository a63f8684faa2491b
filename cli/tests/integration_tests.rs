use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn testdata() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../testdata")
}

fn pattern_check(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pattern-check"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run pattern-check")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_passing_schema_exits_zero() {
    let root = testdata();
    let output = pattern_check(&["--model-root", root.to_str().unwrap(), "passing.yaml"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_failures_print_markdown_table() {
    let root = testdata();
    let output = pattern_check(&[
        "--model-root",
        root.to_str().unwrap(),
        "simple-leaf-fail.yaml",
        "union-leaf-fail.yaml",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        [
            "| Leaf | Type | Failure |",
            "| ---- | ---- | ------- |",
            "| `ipv-0` | `string` | `ipv4` matched but shouldn't |",
            "| `ipv-0` | `string` | `ipv6` did not match |",
            "| `ipv-0` | `ip-string-typedef` | `ipv4` matched but shouldn't |",
            "| `ipv-0` | `ip-string-typedef` | `ipv5` did not match |",
        ]
    );
    assert!(stderr(&output).contains("4 pattern test case(s) failed"));
}

#[test]
fn test_json_format() {
    let root = testdata();
    let output = pattern_check(&[
        "--model-root",
        root.to_str().unwrap(),
        "--format",
        "json",
        "derived-string-fail.yaml",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let rows = value["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["type_name"], "ipv4-address-str");
    assert_eq!(rows[0]["input"], "ipV4");
    assert_eq!(rows[0]["mismatch"], "did_not_match");
    assert_eq!(value["summary"]["test_cases"], 4);
}

#[test]
fn test_missing_model_root_is_config_error() {
    let output = pattern_check(&["passing.yaml"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--model-root"));
}

#[test]
fn test_nonexistent_model_root_is_config_error() {
    let output = pattern_check(&["--model-root", "/nonexistent/models", "passing.yaml"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("/nonexistent/models"));
}

#[test]
fn test_broken_patterns_are_listed_one_per_line() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("broken.yaml"),
        r#"
module: broken
entries:
  - name: a
    type: {name: string, patterns: ['[']}
    extensions:
      - {keyword: "pt:pattern-test-pass", argument: "x"}
  - name: b
    type: {name: string, patterns: ['\d+']}
    extensions:
      - {keyword: "pt:pattern-test-fail", argument: "x"}
"#,
    )
    .unwrap();

    let output = pattern_check(&["--model-root", dir.path().to_str().unwrap(), "broken.yaml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());

    let err = stderr(&output);
    let lines: Vec<&str> = err.lines().collect();
    assert_eq!(lines[0], "error: 2 leaf error(s)");
    assert!(lines[1].contains("/broken/a") && lines[1].contains("pattern `[`"));
    assert!(lines[2].contains("/broken/b") && lines[2].contains(r"pattern `\d+`"));
}

#[test]
fn test_load_errors_are_listed_one_per_line() {
    let root = testdata();
    let output = pattern_check(&[
        "--model-root",
        root.to_str().unwrap(),
        "missing-one.yaml",
        "missing-two.yaml",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("could not parse modules (2)"));
    assert!(err.lines().any(|l| l.contains("missing-one.yaml")));
    assert!(err.lines().any(|l| l.contains("missing-two.yaml")));
}

#[test]
fn test_config_file_supplies_roots_and_files() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("pattern-check.yaml");
    fs::write(
        &config,
        format!(
            "model_roots:\n  - {}\nfiles:\n  - simple-leaf-fail.yaml\n",
            testdata().display()
        ),
    )
    .unwrap();

    let output = pattern_check(&["--config", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("`ipv6` did not match"));

    // Files on the command line replace the configured ones.
    let output = pattern_check(&["--config", config.to_str().unwrap(), "passing.yaml"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
}

#[test]
fn test_verbose_logs_each_case() {
    let root = testdata();
    let output = pattern_check(&["-v", "--model-root", root.to_str().unwrap(), "passing.yaml"]);

    assert_eq!(output.status.code(), Some(0));
    let err = stderr(&output);
    assert!(err.contains("ipv4-address"), "{err}");
    assert!(err.contains("pattern check finished"), "{err}");
}
