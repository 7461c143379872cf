use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold text for accent and case insensitive search.
///
/// Decomposes to NFD, drops combining marks, lowercases and trims, so
/// "  Échéance " and "echeance" compare equal.
pub fn normalize_search_text(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}
