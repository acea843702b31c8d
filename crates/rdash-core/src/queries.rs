use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DEFAULT_SOURCES: &[&str] = &["malaysia", "Bolehland"];
const DEFAULT_QUERIES: &[&str] = &[
    "MRT women coach",
    "KTM women coach",
    "LRT women coach",
    "MRT koc wanita",
    "KTM koc wanita",
    "LRT koc wanita",
];

/// The fixed set of subreddits and search strings a collection run covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    pub sources: Vec<String>,
    pub queries: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(ToString::to_string).collect(),
            queries: DEFAULT_QUERIES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl QueryConfig {
    /// Every `(source, query)` pair, sources in the outer loop.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources.iter().flat_map(move |source| {
            self.queries
                .iter()
                .map(move |query| (source.as_str(), query.as_str()))
        })
    }
}

/// Load the query configuration.
///
/// `None` yields the built-in default list.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_queries(path: Option<&Path>) -> Result<QueryConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(QueryConfig::default());
    };

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::QueriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let config: QueryConfig = serde_yaml::from_str(&content)?;
    validate_queries(&config)?;
    Ok(config)
}

fn validate_queries(config: &QueryConfig) -> Result<(), ConfigError> {
    if config.sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one source is required".to_string(),
        ));
    }
    if config.queries.is_empty() {
        return Err(ConfigError::Validation(
            "at least one query is required".to_string(),
        ));
    }

    let mut seen_sources = HashSet::new();
    for source in &config.sources {
        let trimmed = source.trim();
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "invalid source name: '{source}'"
            )));
        }
        if !seen_sources.insert(trimmed.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source: '{source}'"
            )));
        }
    }

    let mut seen_queries = HashSet::new();
    for query in &config.queries {
        if query.trim().is_empty() {
            return Err(ConfigError::Validation(
                "query strings must be non-empty".to_string(),
            ));
        }
        if !seen_queries.insert(query.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate query: '{query}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_covers_both_subreddits_and_six_queries() {
        let config = QueryConfig::default();
        assert_eq!(config.sources, vec!["malaysia", "Bolehland"]);
        assert_eq!(config.queries.len(), 6);
        assert_eq!(config.pairs().count(), 12);
    }

    #[test]
    fn pairs_iterate_sources_outermost() {
        let config = QueryConfig {
            sources: vec!["a".to_string(), "b".to_string()],
            queries: vec!["x".to_string(), "y".to_string()],
        };
        let pairs: Vec<_> = config.pairs().collect();
        assert_eq!(pairs, vec![("a", "x"), ("a", "y"), ("b", "x"), ("b", "y")]);
    }

    #[test]
    fn none_path_returns_default() {
        assert_eq!(load_queries(None).unwrap(), QueryConfig::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_queries(Some(Path::new("/nonexistent/queries.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::QueriesFileIo { .. }));
    }

    #[test]
    fn yaml_parses() {
        let yaml = "sources: [malaysia]\nqueries: [\"MRT women coach\"]\n";
        let config: QueryConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(validate_queries(&config).is_ok());
        assert_eq!(config.sources, vec!["malaysia"]);
    }

    #[test]
    fn duplicate_query_is_rejected() {
        let config = QueryConfig {
            sources: vec!["malaysia".to_string()],
            queries: vec!["MRT women coach".to_string(), "mrt women coach".to_string()],
        };
        assert!(matches!(
            validate_queries(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn source_with_space_is_rejected() {
        let config = QueryConfig {
            sources: vec!["r malaysia".to_string()],
            queries: vec!["q".to_string()],
        };
        assert!(validate_queries(&config).is_err());
    }

    #[test]
    fn empty_queries_are_rejected() {
        let config = QueryConfig {
            sources: vec!["malaysia".to_string()],
            queries: vec![],
        };
        assert!(validate_queries(&config).is_err());
    }
}
