//! Post text normalization for topic modeling and lexicon scoring.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::contractions::expand_contractions;
use crate::lemma::{lemmatize, pos_tag, WordClass};
use crate::stopwords::StopwordSet;
use crate::suffix::strip_suffix;

static EMOJI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\p{Extended_Pictographic}\p{Emoji_Modifier}\p{Regional_Indicator}\x{200D}\x{FE0F}\x{20E3}]",
    )
    .expect("EMOJI_REGEX: invalid pattern")
});

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?:\S+|www\.\S+").expect("URL_REGEX: invalid pattern"));

static NON_ALPHA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("NON_ALPHA_REGEX: invalid pattern"));

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_REGEX: invalid pattern"));

/// Remove emoji glyphs and their joiners/modifiers.
#[must_use]
pub fn remove_emoji(text: &str) -> String {
    EMOJI_REGEX.replace_all(text, "").into_owned()
}

/// Remove `http(s):` and `www.` links.
#[must_use]
pub fn remove_urls(text: &str) -> String {
    URL_REGEX.replace_all(text, "").into_owned()
}

/// Collapse any run of three or more identical characters to two.
#[must_use]
pub fn collapse_elongation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut run = 0usize;
    for c in text.chars() {
        if prev == Some(c) {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run <= 2 {
            out.push(c);
        }
    }
    out
}

/// Split cleaned text into tokens.
#[must_use]
pub fn tokens(cleaned: &str) -> Vec<String> {
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Deterministic text cleaner: contractions, emoji, URLs, elongation,
/// punctuation, stopwords, Malay suffixes, then lemmatization.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    stopwords: StopwordSet,
}

impl Normalizer {
    #[must_use]
    pub fn new(stopwords: StopwordSet) -> Self {
        Self { stopwords }
    }

    /// Normalize one raw post. Empty output is valid.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        let text = expand_contractions(raw);
        let text = remove_emoji(&text);
        let text = remove_urls(&text);
        let text = collapse_elongation(&text);
        let text = NON_ALPHA_REGEX.replace_all(&text, "");
        let text = WHITESPACE_REGEX.replace_all(&text, " ");
        let lowered = text.trim().to_lowercase();

        let kept: Vec<String> = lowered
            .unicode_words()
            .filter(|w| w.chars().all(|c| c.is_ascii_alphabetic()))
            .filter(|w| !self.stopwords.contains(w))
            .map(|w| strip_suffix(w).to_string())
            .collect();

        let tags = pos_tag(&kept);
        let lemmas: Vec<String> = kept
            .iter()
            .zip(tags)
            .map(|(word, tag)| lemmatize(word, WordClass::from_tag(tag)))
            .filter(|lemma| !lemma.is_empty())
            .collect();

        tracing::trace!(
            input_chars = raw.chars().count(),
            tokens = lemmas.len(),
            "normalized post text"
        );
        lemmas.join(" ")
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
