//! Pattern test case extraction from extension statements.
//!
//! A leaf declares its test strings with two extensions from any module
//! prefix: `<prefix>:pattern-test-pass` (the argument must match the leaf's
//! type) and `<prefix>:pattern-test-fail` (it must not). Every other
//! extension is ignored.

use std::sync::LazyLock;

use pattern_check_core::Entry;
use regex::Regex;

static PASS_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+:pattern-test-pass").expect("static regex must compile"));
static FAIL_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+:pattern-test-fail").expect("static regex must compile"));

/// One annotated test string of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCase<'a> {
    /// The leaf the case is declared on.
    pub entry: &'a Entry,
    /// Literal input string.
    pub input: &'a str,
    /// `true` for pass cases, `false` for fail cases.
    pub want_match: bool,
}

/// Classifies an extension keyword.
///
/// Returns `Some(true)` for a pass case, `Some(false)` for a fail case and
/// `None` for unrelated extensions.
///
/// # Examples
///
/// ```
/// use pattern_check::testcase::classify_keyword;
///
/// assert_eq!(classify_keyword("oc-ext:pattern-test-pass"), Some(true));
/// assert_eq!(classify_keyword("pt:pattern-test-fail"), Some(false));
/// assert_eq!(classify_keyword("oc-ext:posix-pattern"), None);
/// assert_eq!(classify_keyword("pattern-test-pass"), None);
/// ```
pub fn classify_keyword(keyword: &str) -> Option<bool> {
    if PASS_CASE.is_match(keyword) {
        Some(true)
    } else if FAIL_CASE.is_match(keyword) {
        Some(false)
    } else {
        None
    }
}

/// Returns the entry's test cases in extension order.
///
/// # Examples
///
/// ```
/// use pattern_check::testcase::extract_test_cases;
/// use pattern_check_core::{Entry, SchemaType};
///
/// let leaf = Entry::leaf("ipv-0", SchemaType::string("string", ["^ipv4$"]))
///     .with_extension("pt:pattern-test-pass", "ipv4")
///     .with_extension("oc-ext:openconfig-version", "1.0.0")
///     .with_extension("pt:pattern-test-fail", "ipv6");
///
/// let cases = extract_test_cases(&leaf);
/// assert_eq!(cases.len(), 2);
/// assert_eq!((cases[0].input, cases[0].want_match), ("ipv4", true));
/// assert_eq!((cases[1].input, cases[1].want_match), ("ipv6", false));
/// ```
pub fn extract_test_cases(entry: &Entry) -> Vec<TestCase<'_>> {
    entry
        .extensions
        .iter()
        .filter_map(|ext| {
            classify_keyword(&ext.keyword).map(|want_match| TestCase {
                entry,
                input: ext.argument.as_str(),
                want_match,
            })
        })
        .collect()
}
