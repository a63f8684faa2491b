//! Check orchestration across all modules of a schema tree.
//!
//! Walks every module in name order and every entry depth-first in
//! declaration order, evaluates each leaf's pattern test cases, and either
//! returns the complete [`FailureReport`] or, when any leaf had a structural
//! error or a pattern that does not compile, a [`CheckError::Leaves`] with
//! every such problem. Rows gathered before a hard error are discarded.

use std::path::PathBuf;

use pattern_check_core::{Entry, Module, SchemaLoader, SchemaTree, SchemaType, validate_entry};
use tracing::{debug, info, warn};

use crate::combine::evaluate_set;
use crate::error::{CheckError, LeafError, LeafRef, PatternCompileError};
use crate::posix::PatternEvaluator;
use crate::report::{CheckSummary, FailureReport, FailureRow, Mismatch};
use crate::resolve::resolve_patterns;
use crate::testcase::extract_test_cases;

/// Options controlling a check run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Log every evaluated test case at `info` instead of `debug`.
    pub verbose: bool,
}

impl CheckOptions {
    /// Sets whether every evaluated test case is logged at `info`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Loads `files` through `loader` and checks the resulting tree.
///
/// # Errors
///
/// Returns [`CheckError::Load`] with every loader failure if loading fails,
/// otherwise whatever [`check_tree`] returns.
pub fn check_files<L: SchemaLoader>(
    loader: &L,
    files: &[PathBuf],
    search_roots: &[PathBuf],
    options: CheckOptions,
) -> Result<FailureReport, CheckError> {
    let tree = loader.load(files, search_roots).map_err(|errors| {
        CheckError::Load(errors.into_iter().map(Into::into).collect())
    })?;
    check_tree(&tree, options)
}

/// Checks every pattern test case declared in `tree`.
///
/// # Errors
///
/// - [`CheckError::NoModules`] / [`CheckError::NoLeaves`] when there is
///   nothing to check.
/// - [`CheckError::Leaves`] when any leaf has structural errors or a pattern
///   that does not compile. Failure rows are discarded in that case.
///
/// # Examples
///
/// ```
/// use pattern_check::{CheckOptions, check_tree};
/// use pattern_check_core::*;
///
/// let tree: SchemaTree = [Module::new("simple-leaf").with_entry(
///     Entry::leaf("ipv-0", SchemaType::string("string", ["^ipv4$"]))
///         .with_extension("pt:pattern-test-fail", "ipv4")
///         .with_extension("pt:pattern-test-pass", "ipv6"),
/// )]
/// .into_iter()
/// .collect();
///
/// let report = check_tree(&tree, CheckOptions::default()).unwrap();
/// assert_eq!(
///     report.messages(),
///     [
///         "| `ipv-0` | `string` | `ipv4` matched but shouldn't |",
///         "| `ipv-0` | `string` | `ipv6` did not match |",
///     ]
/// );
/// ```
pub fn check_tree(tree: &SchemaTree, options: CheckOptions) -> Result<FailureReport, CheckError> {
    if tree.is_empty() {
        return Err(CheckError::NoModules);
    }
    if tree.leaf_count() == 0 {
        return Err(CheckError::NoLeaves);
    }

    let mut run = CheckRun {
        options,
        evaluator: PatternEvaluator::new(),
        rows: Vec::new(),
        leaf_errors: Vec::new(),
        summary: CheckSummary::default(),
    };

    for module in tree.modules() {
        run.check_module(module);
    }

    let summary = run.summary;
    info!(
        modules = summary.modules,
        leaves = summary.leaves,
        tested_leaves = summary.tested_leaves,
        test_cases = summary.test_cases,
        failures = run.rows.len(),
        errors = run.leaf_errors.len(),
        "pattern check finished"
    );

    if !run.leaf_errors.is_empty() {
        return Err(CheckError::Leaves(run.leaf_errors));
    }

    Ok(FailureReport {
        rows: run.rows,
        summary,
    })
}

struct CheckRun {
    options: CheckOptions,
    evaluator: PatternEvaluator,
    rows: Vec<FailureRow>,
    leaf_errors: Vec<LeafError>,
    summary: CheckSummary,
}

impl CheckRun {
    fn check_module(&mut self, module: &Module) {
        debug!(module = %module.name, "checking module");
        self.summary.modules += 1;

        let mut path = format!("/{}", module.name);
        for entry in &module.entries {
            self.check_entry(&module.name, &mut path, entry);
        }
    }

    fn check_entry(&mut self, module: &str, path: &mut String, entry: &Entry) {
        let parent_len = path.len();
        path.push('/');
        path.push_str(&entry.name);

        if entry.kind.is_leaf() {
            let leaf = LeafRef {
                module: module.to_string(),
                path: path.clone(),
                name: entry.name.clone(),
            };
            self.check_leaf(leaf, entry);
        }

        for child in &entry.children {
            self.check_entry(module, path, child);
        }

        path.truncate(parent_len);
    }

    fn check_leaf(&mut self, leaf: LeafRef, entry: &Entry) {
        self.summary.leaves += 1;

        if !entry.errors.is_empty() {
            self.leaf_errors.push(LeafError::Structural {
                leaf,
                errors: entry.errors.clone(),
            });
            return;
        }

        let structural = validate_entry(entry);
        if !structural.is_empty() {
            self.leaf_errors.push(LeafError::Structural {
                leaf,
                errors: structural.iter().map(ToString::to_string).collect(),
            });
            return;
        }
        // Typed by construction once validation passed.
        let Some(ty) = &entry.ty else {
            return;
        };

        let cases = extract_test_cases(entry);
        if cases.is_empty() {
            debug!(leaf = %leaf, "no pattern test cases");
            return;
        }
        self.summary.tested_leaves += 1;

        let set = resolve_patterns(ty);
        if set.is_unrestricted() {
            warn!(
                leaf = %leaf,
                type_name = ty.name(),
                "leaf has pattern test cases but an unrestricted type"
            );
        }

        let mut compile_errors: Vec<PatternCompileError> = Vec::new();
        for case in &cases {
            self.summary.test_cases += 1;
            let outcome = evaluate_set(&mut self.evaluator, &set, case.input);

            if !outcome.compiled() {
                for err in outcome.compile_errors {
                    if !compile_errors.iter().any(|seen| seen.pattern == err.pattern) {
                        compile_errors.push(err);
                    }
                }
                continue;
            }

            let passed = outcome.matched == case.want_match;
            if self.options.verbose {
                info!(
                    leaf = %leaf,
                    type_name = ty.name(),
                    input = case.input,
                    want_match = case.want_match,
                    passed,
                    "pattern test case"
                );
            } else {
                debug!(
                    leaf = %leaf,
                    type_name = ty.name(),
                    input = case.input,
                    want_match = case.want_match,
                    passed,
                    "pattern test case"
                );
            }
            if !passed {
                self.rows
                    .push(failure_row(entry, ty, case.input, outcome.matched));
            }
        }

        self.leaf_errors
            .extend(compile_errors.into_iter().map(|error| LeafError::Pattern {
                leaf: leaf.clone(),
                error,
            }));
    }
}

fn failure_row(entry: &Entry, ty: &SchemaType, input: &str, got_match: bool) -> FailureRow {
    FailureRow {
        leaf: entry.name.clone(),
        type_name: ty.name().to_string(),
        input: input.to_string(),
        mismatch: Mismatch::from_observed(got_match),
    }
}
