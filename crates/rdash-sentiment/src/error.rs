use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("asset missing at {path}: {source}")]
    MissingAsset {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid artifact {path}: {reason}")]
    InvalidArtifact { path: String, reason: String },

    #[error("artifact shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("class index {0} is not known to the label encoder")]
    UnknownClass(usize),
}
