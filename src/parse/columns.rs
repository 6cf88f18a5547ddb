//! Heuristic column resolution for mapping spreadsheets
//!
//! Real-world mapping sheets never agree on header names, so each target
//! column is found from a priority-ordered candidate list: one exact pass,
//! then one substring pass.

/// Candidate headers for the policy-name column, in priority order.
pub const POLICY_NAME_COLS: &[&str] = &[
    "policy name",
    "policy",
    "document name",
    "document",
    "policy_title",
    "policy_name",
];

/// Candidate headers for the policy-description column.
pub const POLICY_DESC_COLS: &[&str] = &[
    "policy description",
    "description",
    "doc description",
    "document description",
];

/// Candidate headers for the mapped-controls column.
pub const MAPPED_CONTROLS_COLS: &[&str] = &[
    "mapped controls",
    "controls",
    "mapped_control",
    "mapped_controls",
    "controls_mapped",
    "annex controls",
    "annex",
];

/// A header matched against one of the candidate lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    /// The header as it appears in the source, original casing kept.
    pub name: String,
}

/// Find the best-matching header for a candidate list.
///
/// First pass: exact match, scanning candidates in priority order; the first
/// candidate that exactly matches any header wins. Second pass: the first
/// header whose lowercase text contains the candidate as a substring.
/// Matching is case-insensitive against trimmed headers.
pub fn resolve_column(headers: &[String], candidates: &[&str]) -> Option<ResolvedColumn> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    for cand in candidates {
        if let Some(index) = lowered.iter().position(|h| h == cand) {
            return Some(ResolvedColumn {
                index,
                name: headers[index].clone(),
            });
        }
    }

    for cand in candidates {
        if let Some(index) = lowered.iter().position(|h| h.contains(cand)) {
            return Some(ResolvedColumn {
                index,
                name: headers[index].clone(),
            });
        }
    }

    None
}
