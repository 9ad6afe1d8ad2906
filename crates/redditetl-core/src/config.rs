use crate::app_config::{AppConfig, Environment, RedditCredentials};
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
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let parse_flag = |var: &str| -> Result<bool, ConfigError> {
        parse_bool(var, &or_default(var, "false"))
    };

    // Credentials are checked before anything else so a misconfigured
    // deployment fails before the first stage runs.
    let reddit = RedditCredentials {
        client_id: require("REDDIT_CLIENT_ID")?,
        client_secret: require("REDDIT_CLIENT_SECRET")?,
        user_agent: require("REDDIT_USER_AGENT")?,
    };
    let storage_url = require("REDDIT_ETL_STORAGE_URL")?;

    let env = parse_environment(&or_default("REDDIT_ETL_ENV", "development"))?;
    let log_level = or_default("REDDIT_ETL_LOG_LEVEL", "info");
    let default_subreddit = lookup("REDDIT_ETL_SUBREDDIT")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let post_limit = parse_u32("REDDIT_ETL_POST_LIMIT", "100")?;
    if post_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "REDDIT_ETL_POST_LIMIT".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let key_prefix = normalize_key_prefix(&or_default("REDDIT_ETL_KEY_PREFIX", ""));
    let persist_local_copy = parse_flag("REDDIT_ETL_PERSIST_LOCAL_COPY")?;
    let local_copy_dir = PathBuf::from(or_default("REDDIT_ETL_LOCAL_COPY_DIR", "."));
    let request_timeout_secs = parse_u64("REDDIT_ETL_REQUEST_TIMEOUT_SECS", "30")?;
    let unique_batch_ids = parse_flag("REDDIT_ETL_UNIQUE_BATCH_IDS")?;
    let run_max_retries = parse_u32("REDDIT_ETL_RUN_MAX_RETRIES", "2")?;
    let run_retry_delay_secs = parse_u64("REDDIT_ETL_RUN_RETRY_DELAY_SECS", "300")?;
    let schedule = or_default("REDDIT_ETL_SCHEDULE", "0 0 0 * * SUN");

    Ok(AppConfig {
        env,
        log_level,
        reddit,
        storage_url,
        default_subreddit,
        post_limit,
        key_prefix,
        persist_local_copy,
        local_copy_dir,
        request_timeout_secs,
        unique_batch_ids,
        run_max_retries,
        run_retry_delay_secs,
        schedule,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REDDIT_ETL_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// A non-empty prefix always names a folder, so it ends with exactly one `/`.
fn normalize_key_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
