//! Column-name normalization for cross-source matching
//!
//! Column names arrive from two places that rarely agree on formatting: the
//! database schema itself and operator-written CSV description files. Both
//! sides are reduced to the same comparison key before lookup.

use unicode_normalization::UnicodeNormalization;

/// Reduce a free-form column name to its canonical comparison key.
///
/// Accented characters are decomposed and stripped to their base Latin
/// letters, the result is lowercased, and runs of whitespace, hyphens and
/// underscores collapse into single spaces. Empty input yields the empty
/// string.
pub fn normalize(text: &str) -> String {
    // NFKD decomposition splits accented characters into base letter plus
    // combining marks; keeping only ASCII drops the marks.
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    let lower = ascii.to_lowercase();

    let mut key = String::with_capacity(lower.len());
    let mut pending_separator = false;
    for ch in lower.chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_separator = true;
        } else {
            if pending_separator && !key.is_empty() {
                key.push(' ');
            }
            pending_separator = false;
            key.push(ch);
        }
    }
    key
}
