//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Case-insensitive substring test. `needle` is expected to be lowercase.
pub fn contains_keyword(haystack_lower: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack_lower.contains(needle)
}

/// Case-insensitive phrase test on word boundaries.
///
/// `"format"` matches `"format the disk"` but not `"information"`.
/// Both arguments are expected to be lowercase.
pub fn contains_phrase(haystack_lower: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    haystack_lower.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before_ok = haystack_lower[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word(c));
        let after_ok = haystack_lower[end..]
            .chars()
            .next()
            .is_none_or(|c| !is_word(c));
        before_ok && after_ok
    })
}

/// Case-insensitive phrase test anchored at a word start.
///
/// Inflected forms match (`"contract"` hits `"contracts"`), but a phrase
/// inside a longer word does not (`"format"` misses `"information"`).
/// Both arguments are expected to be lowercase.
pub fn contains_word_prefix(haystack_lower: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    haystack_lower.match_indices(phrase).any(|(start, _)| {
        haystack_lower[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word(c))
    })
}

/// Count whitespace-separated words.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}
