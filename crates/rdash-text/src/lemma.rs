//! Rule-based part-of-speech tagging and lemmatization for English tokens.

/// Coarse word class used to pick a lemmatization rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl WordClass {
    /// Map a Penn Treebank tag to a word class by its first letter.
    /// Unknown tags are treated as nouns.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.chars().next() {
            Some('J') => Self::Adjective,
            Some('V') => Self::Verb,
            Some('R') => Self::Adverb,
            _ => Self::Noun,
        }
    }
}

const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("women", "woman"),
    ("men", "man"),
    ("children", "child"),
    ("people", "person"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("wives", "wife"),
    ("lives", "life"),
    ("knives", "knife"),
    ("buses", "bus"),
];

const VERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("went", "go"),
    ("gone", "go"),
    ("did", "do"),
    ("done", "do"),
    ("does", "do"),
    ("had", "have"),
    ("has", "have"),
    ("made", "make"),
    ("said", "say"),
    ("took", "take"),
    ("taken", "take"),
    ("came", "come"),
    ("saw", "see"),
    ("seen", "see"),
    ("got", "get"),
    ("gotten", "get"),
    ("gave", "give"),
    ("given", "give"),
    ("ran", "run"),
    ("began", "begin"),
    ("begun", "begin"),
    ("thought", "think"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("felt", "feel"),
    ("kept", "keep"),
    ("told", "tell"),
    ("found", "find"),
    ("rode", "ride"),
    ("ridden", "ride"),
    ("stood", "stand"),
    ("sat", "sit"),
    ("paid", "pay"),
    ("met", "meet"),
    ("used", "use"),
];

const ADJECTIVE_EXCEPTIONS: &[(&str, &str)] = &[
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "less", "ish", "ical", "ic", "al",
];

fn lookup(table: &[(&str, &'static str)], word: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == word).map(|(_, v)| *v)
}

/// Assign a Penn-style tag to each token using suffix heuristics.
#[must_use]
pub fn pos_tag(tokens: &[String]) -> Vec<&'static str> {
    tokens.iter().map(|t| tag_one(t)).collect()
}

fn tag_one(word: &str) -> &'static str {
    let len = word.len();
    if lookup(VERB_EXCEPTIONS, word).is_some() {
        return "VBD";
    }
    if lookup(ADJECTIVE_EXCEPTIONS, word).is_some() {
        return "JJ";
    }
    if word.ends_with("ly") && len > 4 {
        return "RB";
    }
    if word.ends_with("ing") && len > 5 {
        return "VBG";
    }
    if word.ends_with("ed") && !word.ends_with("eed") && len > 4 {
        return "VBD";
    }
    if ADJECTIVE_SUFFIXES.iter().any(|s| word.ends_with(s)) && len > 4 {
        return "JJ";
    }
    if word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
        && len > 3
    {
        return "NNS";
    }
    "NN"
}

/// Reduce `word` to its dictionary form for the given class.
#[must_use]
pub fn lemmatize(word: &str, class: WordClass) -> String {
    match class {
        WordClass::Noun => lemmatize_noun(word),
        WordClass::Verb => lemmatize_verb(word),
        WordClass::Adjective => lemmatize_adjective(word),
        WordClass::Adverb => word.to_string(),
    }
}

fn lemmatize_noun(word: &str) -> String {
    if let Some(lemma) = lookup(NOUN_EXCEPTIONS, word) {
        return lemma.to_string();
    }
    let len = word.len();
    if let Some(stem) = word.strip_suffix("ies").filter(|_| len > 4) {
        return format!("{stem}y");
    }
    if ["ches", "shes", "sses", "xes", "zes"]
        .iter()
        .any(|s| word.ends_with(s))
    {
        return word[..len - 2].to_string();
    }
    if let Some(stem) = word.strip_suffix("men").filter(|_| len > 4) {
        return format!("{stem}man");
    }
    if word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
        && len > 3
    {
        return word[..len - 1].to_string();
    }
    word.to_string()
}

fn lemmatize_verb(word: &str) -> String {
    if let Some(lemma) = lookup(VERB_EXCEPTIONS, word) {
        return lemma.to_string();
    }
    let len = word.len();
    if let Some(stem) = word.strip_suffix("ied").filter(|_| len > 4) {
        return format!("{stem}y");
    }
    if word.ends_with("eed") {
        return word[..len - 1].to_string();
    }
    let stem = if word.ends_with("ing") && len > 5 {
        &word[..len - 3]
    } else if word.ends_with("ed") && len > 4 {
        &word[..len - 2]
    } else if let Some(stem) = word.strip_suffix("ies").filter(|_| len > 4) {
        return format!("{stem}y");
    } else if ["ches", "shes", "sses", "xes"]
        .iter()
        .any(|s| word.ends_with(s))
    {
        return word[..len - 2].to_string();
    } else if word.ends_with('s') && !word.ends_with("ss") && len > 3 {
        return word[..len - 1].to_string();
    } else {
        return word.to_string();
    };
    restore_stem(stem)
}

/// Repair a stem left after stripping `-ing`/`-ed`: undouble a final
/// consonant, or restore a silent `e`.
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n >= 3 {
        let (a, b) = (chars[n - 2], chars[n - 1]);
        if a == b && !is_vowel(b) && !matches!(b, 'l' | 's' | 'z' | 'f') {
            return chars[..n - 1].iter().collect();
        }
    }
    if matches!(chars.last(), Some('v' | 'u' | 'c' | 'z')) {
        return format!("{stem}e");
    }
    if n == 3
        && !is_vowel(chars[0])
        && is_vowel(chars[1])
        && !is_vowel(chars[2])
        && !matches!(chars[2], 'w' | 'x' | 'y')
    {
        return format!("{stem}e");
    }
    stem.to_string()
}

fn lemmatize_adjective(word: &str) -> String {
    if let Some(lemma) = lookup(ADJECTIVE_EXCEPTIONS, word) {
        return lemma.to_string();
    }
    let len = word.len();
    if let Some(stem) = word.strip_suffix("iest").filter(|_| len > 5) {
        return format!("{stem}y");
    }
    if let Some(stem) = word.strip_suffix("ier").filter(|_| len > 4) {
        return format!("{stem}y");
    }
    word.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
