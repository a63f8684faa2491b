//! Resolution of a leaf type into the pattern groups that decide a match.
//!
//! Patterns on one type are ANDed; a union matches when any of its string
//! member types matches. Non-string union members have no patterns to offer
//! and are left out entirely.

use pattern_check_core::SchemaType;

/// Pattern structure of a leaf type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSet<'a> {
    /// Every pattern must match. Zero patterns means no constraint.
    Conjunction(&'a [String]),
    /// At least one group must match in full. Zero groups never match.
    Disjunction(Vec<&'a [String]>),
}

impl PatternSet<'_> {
    /// Returns `true` when some path through the set imposes no pattern, so
    /// every input matches.
    pub fn is_unrestricted(&self) -> bool {
        match self {
            Self::Conjunction(patterns) => patterns.is_empty(),
            Self::Disjunction(groups) => groups.iter().any(|g| g.is_empty()),
        }
    }

    /// Total number of patterns across all groups.
    pub fn pattern_count(&self) -> usize {
        match self {
            Self::Conjunction(patterns) => patterns.len(),
            Self::Disjunction(groups) => groups.iter().map(|g| g.len()).sum(),
        }
    }
}

/// Resolves the pattern structure of `ty`.
///
/// # Examples
///
/// ```
/// use pattern_check::resolve::{PatternSet, resolve_patterns};
/// use pattern_check_core::{SchemaType, TypeKind};
///
/// let scalar = SchemaType::string("string", ["^a", "b$"]);
/// assert!(matches!(resolve_patterns(&scalar), PatternSet::Conjunction(p) if p.len() == 2));
///
/// let union = SchemaType::union(
///     "ip",
///     vec![
///         SchemaType::string("string", ["^ipv4$"]),
///         SchemaType::scalar("uint8", TypeKind::Uint8),
///     ],
/// );
/// match resolve_patterns(&union) {
///     PatternSet::Disjunction(groups) => assert_eq!(groups, [["^ipv4$"]]),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn resolve_patterns(ty: &SchemaType) -> PatternSet<'_> {
    match ty {
        SchemaType::Scalar { patterns, .. } => PatternSet::Conjunction(patterns),
        SchemaType::Union { members, .. } => PatternSet::Disjunction(
            members
                .iter()
                .filter(|member| member.is_string())
                .map(SchemaType::patterns)
                .collect(),
        ),
    }
}
