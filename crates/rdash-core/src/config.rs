use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let reddit_client_id = require("REDDIT_CLIENT_ID")?;
    let reddit_client_secret = require("REDDIT_CLIENT_SECRET")?;

    let env = parse_environment(&or_default("RDASH_ENV", "development"))?;

    let bind_addr = parse_addr("RDASH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("RDASH_LOG_LEVEL", "info");
    let lexicon_path = PathBuf::from(or_default("RDASH_LEXICON_PATH", "./SentiLexM.txt"));
    let model_dir = PathBuf::from(or_default("RDASH_MODEL_DIR", "./models"));
    let queries_path = lookup("RDASH_QUERIES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let reddit_user_agent = or_default("REDDIT_USER_AGENT", "research/1.0");

    let search_limit = parse_usize("RDASH_SEARCH_LIMIT", "20")?;
    if search_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RDASH_SEARCH_LIMIT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let collection_cache_ttl_secs = parse_u64("RDASH_COLLECTION_CACHE_TTL_SECS", "3600")?;
    let request_timeout_secs = parse_u64("RDASH_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("RDASH_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("RDASH_RETRY_BACKOFF_BASE_MS", "500")?;
    let default_classifier_label = or_default("RDASH_DEFAULT_CLASSIFIER_LABEL", "neutral");

    let topic_similarity_threshold = parse_threshold(&or_default(
        "RDASH_TOPIC_SIMILARITY_THRESHOLD",
        "0.3",
    ))?;
    let min_topic_size = parse_usize("RDASH_MIN_TOPIC_SIZE", "2")?.max(1);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        lexicon_path,
        model_dir,
        queries_path,
        reddit_client_id,
        reddit_client_secret,
        reddit_user_agent,
        search_limit,
        collection_cache_ttl_secs,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        default_classifier_label,
        topic_similarity_threshold,
        min_topic_size,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RDASH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Cosine similarity threshold in `(0.0, 1.0]`.
fn parse_threshold(raw: &str) -> Result<f32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "RDASH_TOPIC_SIMILARITY_THRESHOLD".to_string(),
        reason,
    };
    let value = raw.parse::<f32>().map_err(|e| invalid(e.to_string()))?;
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(invalid(format!("{value} is outside (0.0, 1.0]")))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
