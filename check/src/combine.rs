//! Boolean combination of pattern results.
//!
//! Both folds visit every pattern even after the result is decided, so a
//! single run surfaces every pattern that fails to compile. A compile error
//! forces its group to "no match".

use crate::error::PatternCompileError;
use crate::posix::PatternEvaluator;
use crate::resolve::PatternSet;

/// Result of evaluating one input against a [`PatternSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub matched: bool,
    /// Compile failures in the order the patterns were visited.
    pub compile_errors: Vec<PatternCompileError>,
}

impl MatchOutcome {
    /// Returns `true` when every visited pattern compiled.
    pub fn compiled(&self) -> bool {
        self.compile_errors.is_empty()
    }
}

/// Evaluates `input` against a resolved pattern set.
///
/// # Examples
///
/// ```
/// use pattern_check::combine::evaluate_set;
/// use pattern_check::posix::PatternEvaluator;
/// use pattern_check::resolve::PatternSet;
///
/// let mut evaluator = PatternEvaluator::new();
/// let t1 = vec!["^a$".to_string()];
/// let t2 = vec!["(".to_string()];
///
/// // The first member already matches, the second is still compiled.
/// let set = PatternSet::Disjunction(vec![t1.as_slice(), t2.as_slice()]);
/// let outcome = evaluate_set(&mut evaluator, &set, "a");
/// assert!(outcome.matched);
/// assert_eq!(outcome.compile_errors.len(), 1);
/// assert_eq!(outcome.compile_errors[0].pattern, "(");
/// ```
pub fn evaluate_set(
    evaluator: &mut PatternEvaluator,
    set: &PatternSet<'_>,
    input: &str,
) -> MatchOutcome {
    match set {
        PatternSet::Conjunction(patterns) => match_all(evaluator, patterns, input),
        PatternSet::Disjunction(groups) => match_any_group(evaluator, groups, input),
    }
}

/// ANDs every pattern of one type. Zero patterns match.
pub fn match_all(
    evaluator: &mut PatternEvaluator,
    patterns: &[String],
    input: &str,
) -> MatchOutcome {
    patterns.iter().fold(
        MatchOutcome {
            matched: true,
            compile_errors: Vec::new(),
        },
        |mut outcome, pattern| {
            match evaluator.evaluate(pattern, input) {
                Ok(hit) => outcome.matched &= hit,
                Err(err) => {
                    outcome.matched = false;
                    outcome.compile_errors.push(err);
                }
            }
            outcome
        },
    )
}

/// ORs the conjunctive result of every group. Zero groups never match.
pub fn match_any_group(
    evaluator: &mut PatternEvaluator,
    groups: &[&[String]],
    input: &str,
) -> MatchOutcome {
    groups.iter().fold(
        MatchOutcome {
            matched: false,
            compile_errors: Vec::new(),
        },
        |mut outcome, group| {
            let member = match_all(evaluator, group, input);
            outcome.matched |= member.matched;
            outcome.compile_errors.extend(member.compile_errors);
            outcome
        },
    )
}
