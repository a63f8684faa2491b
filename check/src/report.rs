//! Failure report rows and their rendering.

use std::fmt;

use serde::Serialize;

/// How a test case disagreed with its declared expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mismatch {
    /// A fail case matched the leaf's type.
    MatchedButShouldnt,
    /// A pass case did not match the leaf's type.
    DidNotMatch,
}

impl Mismatch {
    /// Describes an observed outcome, phrased for the row it would produce.
    pub fn from_observed(got_match: bool) -> Self {
        if got_match {
            Self::MatchedButShouldnt
        } else {
            Self::DidNotMatch
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchedButShouldnt => write!(f, "matched but shouldn't"),
            Self::DidNotMatch => write!(f, "did not match"),
        }
    }
}

/// One failing test case.
///
/// Renders as a three-column markdown row.
///
/// # Examples
///
/// ```
/// use pattern_check::report::{FailureRow, Mismatch};
///
/// let row = FailureRow {
///     leaf: "ipv-0".into(),
///     type_name: "string".into(),
///     input: "ipv4".into(),
///     mismatch: Mismatch::MatchedButShouldnt,
/// };
/// assert_eq!(row.to_string(), "| `ipv-0` | `string` | `ipv4` matched but shouldn't |");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRow {
    pub leaf: String,
    pub type_name: String,
    pub input: String,
    pub mismatch: Mismatch,
}

impl fmt::Display for FailureRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| `{}` | `{}` | `{}` {} |",
            self.leaf, self.type_name, self.input, self.mismatch
        )
    }
}

/// Counters for one check run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub modules: usize,
    pub leaves: usize,
    /// Leaves that declared at least one test case.
    pub tested_leaves: usize,
    pub test_cases: usize,
}

/// Ordered failure rows of a completed run.
///
/// An empty report means every test case behaved as declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub rows: Vec<FailureRow>,
    pub summary: CheckSummary,
}

/// Markdown table header preceding the rows.
pub const TABLE_HEADER: &str = "| Leaf | Type | Failure |\n| ---- | ---- | ------- |\n";

impl FailureReport {
    /// Returns `true` when no test case failed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of failing test cases.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns each row rendered as a markdown table row.
    pub fn messages(&self) -> Vec<String> {
        self.rows.iter().map(ToString::to_string).collect()
    }

    /// Renders the header and all rows as a markdown table.
    ///
    /// # Examples
    ///
    /// ```
    /// use pattern_check::report::{FailureReport, FailureRow, Mismatch};
    ///
    /// let mut report = FailureReport::default();
    /// report.rows.push(FailureRow {
    ///     leaf: "ipv-0".into(),
    ///     type_name: "string".into(),
    ///     input: "ipv6".into(),
    ///     mismatch: Mismatch::DidNotMatch,
    /// });
    /// assert_eq!(
    ///     report.to_markdown(),
    ///     "| Leaf | Type | Failure |\n| ---- | ---- | ------- |\n| `ipv-0` | `string` | `ipv6` did not match |\n"
    /// );
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = String::from(TABLE_HEADER);
        for row in &self.rows {
            out.push_str(&row.to_string());
            out.push('\n');
        }
        out
    }
}

/// Supported report output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
}

/// Formats a report in the requested output format.
pub fn format_report(report: &FailureReport, format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Markdown => Ok(report.to_markdown()),
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(input: &str, mismatch: Mismatch) -> FailureRow {
        FailureRow {
            leaf: "ipv-0".into(),
            type_name: "ip-string-typedef".into(),
            input: input.into(),
            mismatch,
        }
    }

    #[test]
    fn test_mismatch_from_observed() {
        assert_eq!(Mismatch::from_observed(true), Mismatch::MatchedButShouldnt);
        assert_eq!(Mismatch::from_observed(false), Mismatch::DidNotMatch);
    }

    #[test]
    fn test_messages_keep_row_order() {
        let report = FailureReport {
            rows: vec![
                row("ipv4", Mismatch::MatchedButShouldnt),
                row("ipv5", Mismatch::DidNotMatch),
            ],
            summary: CheckSummary::default(),
        };
        assert_eq!(
            report.messages(),
            vec![
                "| `ipv-0` | `ip-string-typedef` | `ipv4` matched but shouldn't |",
                "| `ipv-0` | `ip-string-typedef` | `ipv5` did not match |",
            ]
        );
    }

    #[test]
    fn test_empty_report_renders_header_only() {
        assert_eq!(FailureReport::default().to_markdown(), TABLE_HEADER);
    }

    #[test]
    fn test_json_format_uses_snake_case_mismatch() {
        let report = FailureReport {
            rows: vec![row("ipv4", Mismatch::MatchedButShouldnt)],
            summary: CheckSummary::default(),
        };
        let raw = format_report(&report, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["rows"][0]["mismatch"], "matched_but_shouldnt");
        assert_eq!(value["rows"][0]["type_name"], "ip-string-typedef");
    }
}
