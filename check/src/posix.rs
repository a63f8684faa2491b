//! POSIX extended regular expression evaluation.
//!
//! Patterns are parsed with ERE rules and rewritten into [`regex`] crate
//! syntax before compilation, so constructs the two dialects read differently
//! keep their POSIX meaning: bracket members such as `&&` or `[` are literal,
//! `\<` is a plain `<`, a `{` without a valid bound is a literal, and `a*?` is
//! `(a*)?`. Perl escapes (`\d`, `\b`) and `(?` groups are syntax errors.
//!
//! Matching is unanchored: a pattern matches if it matches anywhere in the
//! input, so schema authors anchor with `^...$` themselves. `^` and `$` also
//! match at line boundaries, and neither `.` nor a negated bracket expression
//! matches a newline.
//!
//! # Examples
//!
//! ```
//! use pattern_check::posix::PosixPattern;
//!
//! let re = PosixPattern::compile("^ipv[46]$").unwrap();
//! assert!(re.is_match("ipv4"));
//! assert!(!re.is_match("ipv5"));
//!
//! // Unanchored patterns match substrings
//! assert!(PosixPattern::compile("v4").unwrap().is_match("ipv4"));
//!
//! // Perl classes are not POSIX
//! assert!(PosixPattern::compile(r"\d+").is_err());
//! ```

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::error::PatternCompileError;
use crate::translate::to_rust_syntax;

/// A compiled POSIX extended regular expression.
#[derive(Debug, Clone)]
pub struct PosixPattern {
    source: String,
    regex: Regex,
}

impl PosixPattern {
    /// Compiles `pattern` as a POSIX extended regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`PatternCompileError`] carrying the pattern text and the
    /// syntax problem when the pattern is malformed or uses non-POSIX syntax.
    pub fn compile(pattern: &str) -> Result<Self, PatternCompileError> {
        let translated =
            to_rust_syntax(pattern).map_err(|reason| PatternCompileError::new(pattern, reason))?;

        let regex = RegexBuilder::new(&translated)
            .multi_line(true)
            .build()
            .map_err(|err| PatternCompileError::new(pattern, syntax_reason(&err)))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Returns `true` if the pattern matches anywhere in `input`.
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Returns the POSIX pattern text as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Compiles and evaluates patterns, caching each compilation for the life
/// of the evaluator.
///
/// The cache also remembers compile failures, so a broken pattern shared by
/// several test cases is parsed once and reported identically each time.
#[derive(Debug, Default)]
pub struct PatternEvaluator {
    cache: HashMap<String, Result<PosixPattern, PatternCompileError>>,
}

impl PatternEvaluator {
    /// Creates an evaluator with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tests `input` against `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the compile failure instead of a match result when `pattern`
    /// does not compile; no matching is attempted in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use pattern_check::posix::PatternEvaluator;
    ///
    /// let mut evaluator = PatternEvaluator::new();
    /// assert_eq!(evaluator.evaluate("^ipv4$", "ipv4"), Ok(true));
    /// assert_eq!(evaluator.evaluate("^ipv4$", "ipv6"), Ok(false));
    ///
    /// let err = evaluator.evaluate("[", "ipv4").unwrap_err();
    /// assert_eq!(err.pattern, "[");
    /// ```
    pub fn evaluate(&mut self, pattern: &str, input: &str) -> Result<bool, PatternCompileError> {
        let compiled = self
            .cache
            .entry(pattern.to_string())
            .or_insert_with(|| PosixPattern::compile(pattern));

        match compiled {
            Ok(re) => Ok(re.is_match(input)),
            Err(err) => Err(err.clone()),
        }
    }

    /// Number of distinct patterns seen so far.
    pub fn compiled_count(&self) -> usize {
        self.cache.len()
    }
}

/// Extracts the one-line reason from a multi-line regex syntax error.
fn syntax_reason(err: &regex::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("error: "))
        .map_or_else(|| rendered.trim().to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_rejects_unclosed_class() {
        let err = PosixPattern::compile("[").unwrap_err();
        assert_eq!(err.pattern, "[");
        assert_eq!(err.reason, "missing closing ]");
    }

    #[test]
    fn test_compile_rejects_perl_syntax() {
        for pattern in [r"\d", r"[\w]+", r"\bfoo", r"\pL", "(?i)abc", "(?:ab)+"] {
            assert!(PosixPattern::compile(pattern).is_err(), "{pattern} should be rejected");
        }
    }

    #[test]
    fn test_compile_accepts_posix_constructs() {
        for pattern in [
            r"^(([0-9]|[1-9][0-9]|1[0-9][0-9]|2[0-4][0-9]|25[0-5])\.){3}([0-9]|[1-9][0-9]|1[0-9][0-9]|2[0-4][0-9]|25[0-5])$",
            "^[[:alpha:]][[:alnum:]_-]*$",
            "^[]a]+$",
            "^[^]a]+$",
            "^a{2,4}$",
            "x?",
            r"^\.\*$",
        ] {
            assert!(PosixPattern::compile(pattern).is_ok(), "{pattern} should compile");
        }
    }

    #[test]
    fn test_bracket_members_are_literal() {
        let nested = PosixPattern::compile("^[a[]+$").unwrap();
        assert!(nested.is_match("a[a"));

        let and = PosixPattern::compile("^[a&&b]$").unwrap();
        assert!(and.is_match("&"));
        assert!(and.is_match("b"));

        let range = PosixPattern::compile("^[+--]$").unwrap();
        assert!(range.is_match(","));
        assert!(!range.is_match("."));

        let tilde = PosixPattern::compile("^[a~~]$").unwrap();
        assert!(tilde.is_match("~"));
    }

    #[test]
    fn test_escaped_angle_brackets_are_literal() {
        let re = PosixPattern::compile(r"^\<a\>$").unwrap();
        assert!(re.is_match("<a>"));
        assert!(!re.is_match("a"));
    }

    #[test]
    fn test_brace_without_bound_is_literal() {
        let re = PosixPattern::compile("^x{$").unwrap();
        assert!(re.is_match("x{"));
        assert!(!re.is_match("x"));
    }

    #[test]
    fn test_stacked_repetition_is_greedy() {
        let re = PosixPattern::compile("^a*?$").unwrap();
        assert!(re.is_match(""));
        assert!(re.is_match("aaa"));
        assert!(!re.is_match("ab"));
        assert!(PosixPattern::compile("^a+*b{2}{2}$").unwrap().is_match("bbbb"));
    }

    #[test]
    fn test_negated_bracket_never_matches_newline() {
        let re = PosixPattern::compile("^[^a]$").unwrap();
        assert!(!re.is_match("\n"));
        assert!(re.is_match("b"));
        assert!(!PosixPattern::compile("x[^y]z").unwrap().is_match("x\nz"));
    }

    #[test]
    fn test_as_str_returns_posix_source() {
        assert_eq!(PosixPattern::compile("a*?").unwrap().as_str(), "a*?");
    }

    #[test]
    fn test_question_mark_inside_class_is_literal() {
        let re = PosixPattern::compile("^[*?]+$").unwrap();
        assert!(re.is_match("*?*"));
    }

    #[test]
    fn test_match_is_unanchored() {
        let re = PosixPattern::compile("ipv4").unwrap();
        assert!(re.is_match("my-ipv4-address"));
        assert!(!PosixPattern::compile("^ipv4$").unwrap().is_match("my-ipv4"));
    }

    #[test]
    fn test_anchors_match_line_boundaries() {
        let re = PosixPattern::compile("^ipv4$").unwrap();
        assert!(re.is_match("first\nipv4\nlast"));
    }

    #[test]
    fn test_evaluator_caches_failures() {
        let mut evaluator = PatternEvaluator::new();
        let first = evaluator.evaluate("(", "x").unwrap_err();
        let second = evaluator.evaluate("(", "y").unwrap_err();
        assert_eq!(first, second);
        assert_eq!(evaluator.compiled_count(), 1);
    }
}
