//! English contraction expansion.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static CONTRACTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]+)['’](t|re|ll|ve|m|d|s|all)\b")
        .expect("CONTRACTION_REGEX: invalid pattern")
});

/// Whole-word forms whose expansion is not derivable from the suffix alone.
const IRREGULAR: &[(&str, &str)] = &[
    ("won't", "will not"),
    ("can't", "cannot"),
    ("shan't", "shall not"),
    ("ain't", "are not"),
    ("let's", "let us"),
    ("y'all", "you all"),
    ("it's", "it is"),
    ("he's", "he is"),
    ("she's", "she is"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("here's", "here is"),
    ("what's", "what is"),
    ("where's", "where is"),
    ("who's", "who is"),
    ("how's", "how is"),
];

/// Expand English contractions (`don't` → `do not`).
///
/// Both straight and curly apostrophes are recognised. A leading capital on
/// the contraction carries over to the expansion. Possessive `'s` on words
/// without a known expansion is left untouched.
#[must_use]
pub fn expand_contractions(text: &str) -> String {
    CONTRACTION_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            let original = &caps[0];
            match expand_one(&caps[1], &caps[2]) {
                Some(expanded) => match_case(original, &expanded),
                None => original.to_string(),
            }
        })
        .into_owned()
}

fn expand_one(stem: &str, suffix: &str) -> Option<String> {
    let stem = stem.to_lowercase();
    let suffix = suffix.to_lowercase();
    let key = format!("{stem}'{suffix}");
    if let Some((_, expansion)) = IRREGULAR.iter().find(|(k, _)| *k == key) {
        return Some((*expansion).to_string());
    }

    match suffix.as_str() {
        "t" => stem
            .strip_suffix('n')
            .filter(|base| !base.is_empty())
            .map(|base| format!("{base} not")),
        "re" => Some(format!("{stem} are")),
        "ll" => Some(format!("{stem} will")),
        "ve" => Some(format!("{stem} have")),
        "m" => Some(format!("{stem} am")),
        "d" => Some(format!("{stem} would")),
        _ => None,
    }
}

fn match_case(original: &str, expanded: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return expanded.to_uppercase();
    }
    let starts_upper = original.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return expanded.to_string();
    }
    let mut chars = expanded.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
