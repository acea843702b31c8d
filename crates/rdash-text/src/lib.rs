//! Text normalization for Reddit posts.
//!
//! Turns raw title+body text into lowercase, stopword-free, suffix-stripped,
//! lemmatized tokens joined by single spaces. Everything here is pure and
//! deterministic; the only state is the fixed stopword vocabulary.

pub mod contractions;
pub mod lemma;
pub mod normalize;
pub mod stopwords;
pub mod suffix;

pub use contractions::expand_contractions;
pub use lemma::{lemmatize, pos_tag, WordClass};
pub use normalize::{collapse_elongation, remove_emoji, remove_urls, tokens, Normalizer};
pub use stopwords::StopwordSet;
pub use suffix::strip_suffix;
