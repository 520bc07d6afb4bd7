use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Remove diacritics from a string
///
/// Decomposes the input (NFD), drops every combining mark, and recomposes
/// (NFC). The weather provider expects ASCII-ish query strings, so resolved
/// city names like "São Paulo" must become "Sao Paulo" before they are
/// embedded in a URL.
///
/// Pure and total: Unicode decomposition cannot fail on valid `&str` input,
/// and the function is idempotent.
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}
