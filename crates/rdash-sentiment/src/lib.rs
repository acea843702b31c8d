//! Sentiment scoring for analysed posts.
//!
//! Two independent scorers: a static word-polarity lexicon summed over
//! tokens, and a TF-IDF + linear classifier pipeline loaded from JSON
//! artifacts.

pub mod classifier;
pub mod error;
pub mod lexicon;

pub use classifier::{
    Classifier, ClassifierPipeline, LabelDecoder, LabelEncoder, LinearClassifier, SparseVector,
    TfidfVectorizer, Vectorizer, CLASSIFIER_FILE, LABEL_ENCODER_FILE, VECTORIZER_FILE,
};
pub use error::SentimentError;
pub use lexicon::Lexicon;
