use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopicError {
    #[error("topic modeling needs at least {required} documents, got {found}")]
    InsufficientDocuments { found: usize, required: usize },

    #[error("topic model failed: {0}")]
    Model(String),
}
