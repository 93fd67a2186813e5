//! Internal helpers shared by row merging and aggregation.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

/// Label used for entries saved without a title.
pub(crate) const UNTITLED: &str = "(untitled)";

/// Grouping key for a title: NFC-normalized, trimmed and lowercased, so
/// "Hyra", " hyra " and a decomposed "Hyra" land on the same row.
pub(crate) fn normalize_title(title: &str) -> String {
    title.trim().nfc().collect::<String>().to_lowercase()
}

/// Display label for a title, substituting a placeholder for blank ones.
pub(crate) fn display_title(title: &str) -> &str {
    let trimmed = title.trim();
    if trimmed.is_empty() { UNTITLED } else { trimmed }
}

/// Case-insensitive title ordering used as the final tie-break.
pub(crate) fn compare_titles(left: &str, right: &str) -> Ordering {
    normalize_title(left)
        .cmp(&normalize_title(right))
        .then_with(|| left.cmp(right))
}

/// Orders optional sort hints with missing values last.
pub(crate) fn compare_sort(left: Option<i64>, right: Option<i64>) -> Ordering {
    left.unwrap_or(i64::MAX).cmp(&right.unwrap_or(i64::MAX))
}
