//! Search helpers for catalog text

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Lowercase and strip accents so "Cúbicos" and "cubicos" compare equal
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Case and accent insensitive substring test
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}
