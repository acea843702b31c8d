use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("REDDIT_CLIENT_ID", "client-id");
    m.insert("REDDIT_CLIENT_SECRET", "client-secret");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "RDASH_ENV"));
}

#[test]
fn build_app_config_fails_without_reddit_client_id() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "REDDIT_CLIENT_ID"),
        "expected MissingEnvVar(REDDIT_CLIENT_ID), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_secret_as_missing() {
    let mut map = full_env();
    map.insert("REDDIT_CLIENT_SECRET", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "REDDIT_CLIENT_SECRET"),
        "expected MissingEnvVar(REDDIT_CLIENT_SECRET), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("RDASH_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RDASH_BIND_ADDR"),
        "expected InvalidEnvVar(RDASH_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.lexicon_path.to_str(), Some("./SentiLexM.txt"));
    assert_eq!(cfg.model_dir.to_str(), Some("./models"));
    assert!(cfg.queries_path.is_none());
    assert_eq!(cfg.reddit_user_agent, "research/1.0");
    assert_eq!(cfg.search_limit, 20);
    assert_eq!(cfg.collection_cache_ttl_secs, 3600);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.default_classifier_label, "neutral");
    assert!((cfg.topic_similarity_threshold - 0.3).abs() < f32::EPSILON);
    assert_eq!(cfg.min_topic_size, 2);
}

#[test]
fn search_limit_override() {
    let mut map = full_env();
    map.insert("RDASH_SEARCH_LIMIT", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_limit, 50);
}

#[test]
fn search_limit_zero_is_rejected() {
    let mut map = full_env();
    map.insert("RDASH_SEARCH_LIMIT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RDASH_SEARCH_LIMIT"),
        "expected InvalidEnvVar(RDASH_SEARCH_LIMIT), got: {result:?}"
    );
}

#[test]
fn cache_ttl_invalid() {
    let mut map = full_env();
    map.insert("RDASH_COLLECTION_CACHE_TTL_SECS", "an hour");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RDASH_COLLECTION_CACHE_TTL_SECS"),
        "expected InvalidEnvVar(RDASH_COLLECTION_CACHE_TTL_SECS), got: {result:?}"
    );
}

#[test]
fn similarity_threshold_out_of_range_is_rejected() {
    let mut map = full_env();
    map.insert("RDASH_TOPIC_SIMILARITY_THRESHOLD", "1.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RDASH_TOPIC_SIMILARITY_THRESHOLD"),
        "expected InvalidEnvVar(RDASH_TOPIC_SIMILARITY_THRESHOLD), got: {result:?}"
    );
}

#[test]
fn queries_path_is_optional() {
    let mut map = full_env();
    map.insert("RDASH_QUERIES_PATH", "./config/queries.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.queries_path.as_deref().and_then(|p| p.to_str()),
        Some("./config/queries.yaml")
    );
}

#[test]
fn debug_output_redacts_secret() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("client-secret"));
    assert!(rendered.contains("[redacted]"));
}
