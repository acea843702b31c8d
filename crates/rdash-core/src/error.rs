use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read queries file {path}: {source}")]
    QueriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse queries file: {0}")]
    QueriesFileParse(#[from] serde_yaml::Error),

    #[error("invalid query configuration: {0}")]
    Validation(String),
}
