//! Splitting raw mapped-controls cells into canonical identifiers
//!
//! A single cell can hold comma/semicolon/slash/newline separated lists,
//! identifiers with trailing titles (`A.8.24 – Secure coding`), and ranges
//! (`A.6.1 - A.6.4`, expanded inclusively).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::ident::{expand_range, normalize_control_id};

/// A single control id such as `A.6.1` or `A.8.24`.
static SINGLE_CTRL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bA\.\d+(?:\.\d+)?\b").unwrap());

/// A range such as `A.6.1 - A.6.4` or `A.6.1–A.6.4` (hyphen, en- or em-dash).
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(A\.\d+(?:\.\d+)?)\s*[-–—]\s*(A\.\d+(?:\.\d+)?)\b").unwrap()
});

/// Range retry without word boundaries, for tokens where leading junk glues
/// onto the first identifier (`xA.6.1-A.6.4`).
static COMPACT_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(A\.\d+(?:\.\d+)?)[-–—](A\.\d+(?:\.\d+)?)").unwrap());

/// Last-resort salvage: an `A` with up to two loosely-attached digit groups,
/// e.g. `A6.1` or `A 6 1`. Unvalidated - this can fabricate identifiers from
/// unrelated numeric text (`Annex 12 rev 3` -> `A.12.3`).
static SALVAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)A[\s.]?(\d+)[\s.\-]?(\d+)?").unwrap());

/// Split a raw mapped-controls cell into a deduplicated list of canonical
/// control identifiers, insertion order preserved (first occurrence wins).
///
/// Per comma-separated token, in order: spaced-or-unspaced range expansion,
/// bare identifier scan (tolerates trailing titles), compact range retry,
/// lenient salvage. A token that matches nothing is dropped silently. An
/// absent or empty cell yields an empty list.
pub fn split_control_cell(cell: Option<&str>) -> Vec<String> {
    let Some(raw) = cell else {
        return Vec::new();
    };

    // Unify separators to comma; dashes stay put for range detection.
    let unified: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            ';' | '/' | '\n' | '\r' => ',',
            c => c,
        })
        .collect();

    let mut controls: Vec<String> = Vec::new();

    for part in unified.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(caps) = RANGE_RE.captures(part) {
            for ctrl in expand_range(&caps[1], &caps[2]) {
                controls.push(normalize_control_id(&ctrl));
            }
            continue;
        }

        let mut matched_single = false;
        for m in SINGLE_CTRL_RE.find_iter(part) {
            matched_single = true;
            controls.push(normalize_control_id(m.as_str()));
        }
        if matched_single {
            continue;
        }

        let mut matched_compact = false;
        for caps in COMPACT_RANGE_RE.captures_iter(part) {
            matched_compact = true;
            for ctrl in expand_range(&caps[1], &caps[2]) {
                controls.push(normalize_control_id(&ctrl));
            }
        }
        if matched_compact {
            continue;
        }

        for caps in SALVAGE_RE.captures_iter(part) {
            match caps.get(2) {
                Some(minor) => controls.push(format!("A.{}.{}", &caps[1], minor.as_str())),
                None => controls.push(format!("A.{}", &caps[1])),
            }
        }
        // nothing matched: token skipped entirely
    }

    let mut seen = HashSet::new();
    controls.retain(|c| seen.insert(c.clone()));
    controls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_absent_cells() {
        assert!(split_control_cell(None).is_empty());
        assert!(split_control_cell(Some("")).is_empty());
        assert!(split_control_cell(Some("   ")).is_empty());
    }

    #[test]
    fn test_mixed_separators_and_titles() {
        assert_eq!(
            split_control_cell(Some("A.8.24 – Secure coding, A.5.1; A.5.2")),
            vec!["A.8.24", "A.5.1", "A.5.2"]
        );
    }

    #[test]
    fn test_range_plus_duplicate_collapses_to_first_occurrence() {
        assert_eq!(
            split_control_cell(Some("A.6.1 - A.6.3, A.6.2")),
            vec!["A.6.1", "A.6.2", "A.6.3"]
        );
    }

    #[test]
    fn test_newline_and_slash_separators() {
        assert_eq!(
            split_control_cell(Some("A.5.1\nA.5.2/A.5.3")),
            vec!["A.5.1", "A.5.2", "A.5.3"]
        );
    }

    #[test]
    fn test_compact_range_without_spaces() {
        assert_eq!(
            split_control_cell(Some("A.6.1-A.6.3")),
            vec!["A.6.1", "A.6.2", "A.6.3"]
        );
    }

    #[test]
    fn test_en_dash_range() {
        assert_eq!(
            split_control_cell(Some("A.8.24–A.8.26")),
            vec!["A.8.24", "A.8.25", "A.8.26"]
        );
    }

    #[test]
    fn test_descending_range_keeps_both_endpoints() {
        assert_eq!(
            split_control_cell(Some("A.6.4 - A.6.1")),
            vec!["A.6.4", "A.6.1"]
        );
    }

    #[test]
    fn test_lowercase_ids_are_normalized() {
        assert_eq!(
            split_control_cell(Some("a.6.1, a.6.2")),
            vec!["A.6.1", "A.6.2"]
        );
    }

    #[test]
    fn test_salvage_reconstructs_loose_ids() {
        assert_eq!(split_control_cell(Some("A6.1")), vec!["A.6.1"]);
        assert_eq!(split_control_cell(Some("A 6")), vec!["A.6"]);
    }

    #[test]
    fn test_unparseable_token_is_dropped() {
        assert_eq!(
            split_control_cell(Some("see appendix, A.5.1")),
            vec!["A.5.1"]
        );
    }

    #[test]
    fn test_token_with_several_ids_keeps_all() {
        assert_eq!(
            split_control_cell(Some("A.5.1 and A.5.2 apply")),
            vec!["A.5.1", "A.5.2"]
        );
    }
}
