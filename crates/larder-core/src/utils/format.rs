use std::cmp::Ordering;

/// Compare two strings ignoring ASCII and Unicode case.
/// Ties fall back to a case-sensitive compare so the order is total.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Case-insensitive substring test, used for catalog search
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
