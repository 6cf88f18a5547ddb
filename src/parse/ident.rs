//! Control identifier normalization and range expansion
//!
//! Canonical form is a leading `A` followed by dot-separated integers, e.g.
//! `A.6.1`. Raw spreadsheet cells arrive with stray whitespace and lowercase
//! prefixes; everything that reaches the catalog goes through
//! `normalize_control_id` first.

/// Normalize control id formatting: strip all whitespace and unify the
/// leading letter, e.g. `" a.6.1 "` -> `"A.6.1"`.
///
/// Empty input comes back empty; callers treat that as "no identifier
/// produced", not an error. Idempotent: normalizing twice is a no-op.
pub fn normalize_control_id(raw: &str) -> String {
    let s: String = raw.split_whitespace().collect();
    if let Some(rest) = s.strip_prefix("a.") {
        return format!("A.{rest}");
    }
    s
}

/// The numeric path of an identifier: `A.6.1` -> `[6, 1]`.
///
/// `None` unless the string is a literal `A` followed by one or more
/// dot-separated non-negative integers.
fn numeric_path(ctrl: &str) -> Option<Vec<u32>> {
    let mut segments = ctrl.split('.');
    if !segments.next()?.eq_ignore_ascii_case("A") {
        return None;
    }

    let mut nums = Vec::new();
    for seg in segments {
        nums.push(seg.parse::<u32>().ok()?);
    }
    if nums.is_empty() {
        return None;
    }
    Some(nums)
}

/// Expand a textual range of two control identifiers into the inclusive
/// ascending sequence of siblings, e.g. `A.6.1`..`A.6.4` -> `A.6.1`,
/// `A.6.2`, `A.6.3`, `A.6.4`.
///
/// Whenever the shape is ambiguous the result degrades to exactly the two
/// normalized endpoints, unexpanded and in their given order: unparseable
/// endpoints, mismatched nesting depth (`A.6` vs `A.6.4`), differing prefix
/// segments, or a descending final segment. A descending range is never
/// silently reversed.
pub fn expand_range(start: &str, end: &str) -> Vec<String> {
    let s = normalize_control_id(start);
    let e = normalize_control_id(end);

    let (sp, ep) = match (numeric_path(&s), numeric_path(&e)) {
        (Some(sp), Some(ep)) => (sp, ep),
        _ => return vec![s, e],
    };

    // Only "same family, last segment varies" ranges expand. Comparing the
    // prefix slices also rejects mismatched depths.
    let (first, s_prefix) = match sp.split_last() {
        Some(x) => x,
        None => return vec![s, e],
    };
    let (last, e_prefix) = match ep.split_last() {
        Some(x) => x,
        None => return vec![s, e],
    };
    if s_prefix != e_prefix || last < first {
        return vec![s, e];
    }

    let prefix = s_prefix
        .iter()
        .fold(String::from("A"), |mut p, n| {
            p.push('.');
            p.push_str(&n.to_string());
            p
        });

    (*first..=*last).map(|i| format!("{prefix}.{i}")).collect()
}
