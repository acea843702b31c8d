use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// Common Malay function words and chat shorthand.
const MALAY_STOPWORDS: &[&str] = &[
    "ada", "adalah", "akan", "aku", "anda", "antara", "apa", "atau", "bagi", "bahawa", "banyak",
    "belum", "bila", "boleh", "bukan", "dah", "dalam", "dan", "dari", "daripada", "dengan", "dgn",
    "dia", "hanya", "harus", "hingga", "ia", "ini", "itu", "jadi", "je", "juga", "kami", "kamu",
    "kan", "kau", "ke", "kepada", "kerana", "kita", "lagi", "lah", "macam", "mana", "masih",
    "mereka", "mungkin", "nak", "ni", "nya", "oleh", "pada", "para", "perlu", "pun", "sahaja",
    "saja", "saya", "sebab", "sebagai", "sebelum", "secara", "sedang", "sejak", "selepas",
    "semua", "seperti", "setiap", "sini", "situ", "sudah", "supaya", "tak", "tapi", "telah",
    "tersebut", "tetapi", "tiada", "tidak", "tu", "untuk", "utk", "yang", "yg",
];

/// Combined English and Malay stopword vocabulary, lowercase.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// NLTK English list from the `stop-words` crate plus the embedded Malay
    /// list. The NLTK list leaves sentiment-bearing words in place.
    #[must_use]
    pub fn english_and_malay() -> Self {
        let mut words: HashSet<String> = get(LANGUAGE::English)
            .iter()
            .map(|w| w.to_lowercase())
            .collect();
        words.extend(MALAY_STOPWORDS.iter().map(ToString::to_string));
        Self { words }
    }

    /// Build a set from an explicit word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::english_and_malay()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_both_languages() {
        let set = StopwordSet::english_and_malay();
        assert!(set.contains("the"));
        assert!(set.contains("and"));
        assert!(set.contains("yang"));
        assert!(set.contains("tidak"));
        assert!(!set.contains("coach"));
        assert!(!set.contains("wanita"));
    }

    #[test]
    fn keeps_sentiment_and_content_words() {
        let set = StopwordSet::english_and_malay();
        for word in ["good", "bad", "great", "best", "problem", "need", "help", "tell", "go"] {
            assert!(!set.contains(word), "{word} should not be a stopword");
        }
    }

    #[test]
    fn from_words_lowercases() {
        let set = StopwordSet::from_words(["The", "DAN"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("the"));
        assert!(set.contains("dan"));
    }
}
