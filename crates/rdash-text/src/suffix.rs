//! Malay suffix stripping.

/// Checked in order; the first applicable suffix wins.
pub const MALAY_SUFFIXES: &[&str] = &["nya", "lah", "pun", "ku", "mu", "kah", "tah", "kan", "an"];

/// Strip at most one Malay suffix from `word`.
///
/// A suffix applies only when the word is longer than the suffix plus two
/// characters. Words without an applicable suffix are returned unchanged.
#[must_use]
pub fn strip_suffix(word: &str) -> &str {
    for suffix in MALAY_SUFFIXES {
        if word.ends_with(suffix) && word.len() > suffix.len() + 2 {
            return &word[..word.len() - suffix.len()];
        }
    }
    word
}
