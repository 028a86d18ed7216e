use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
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
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; absent ones fall back to [`AppConfig::defaults`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::defaults();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        let raw = or_default(var, &default.to_string());
        raw.trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        let raw = or_default(var, &default.to_string());
        raw.trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        let raw = or_default(var, &default.to_string());
        raw.trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let api_base_url = parse_base_url(&or_default("FIELDROUTE_API_URL", &defaults.api_base_url))?;
    let env = parse_environment(&or_default("FIELDROUTE_ENV", "development"))?;
    let log_level = or_default("FIELDROUTE_LOG_LEVEL", &defaults.log_level);

    let request_timeout_secs =
        parse_u64("FIELDROUTE_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "FIELDROUTE_REQUEST_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }

    let max_attempts = parse_u32("FIELDROUTE_MAX_ATTEMPTS", defaults.max_attempts)?;
    if max_attempts == 0 {
        return Err(invalid(
            "FIELDROUTE_MAX_ATTEMPTS",
            "at least one attempt is required".to_string(),
        ));
    }

    let retry_delay_ms = parse_u64("FIELDROUTE_RETRY_DELAY_MS", defaults.retry_delay_ms)?;
    let max_upload_bytes = parse_u64("FIELDROUTE_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;
    let preview_rows = parse_usize("FIELDROUTE_PREVIEW_ROWS", defaults.preview_rows)?;

    Ok(AppConfig {
        api_base_url,
        env,
        log_level,
        request_timeout_secs,
        max_attempts,
        retry_delay_ms,
        max_upload_bytes,
        preview_rows,
    })
}

/// Accepts absolute `http`/`https` URLs; trailing slashes are dropped.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());

    if has_scheme && has_host {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: "FIELDROUTE_API_URL".to_string(),
            reason: format!("expected an absolute http(s) URL, got \"{raw}\""),
        })
    }
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
            var: "FIELDROUTE_ENV".to_string(),
            reason: format!(
                "unrecognized value \"{other}\"; expected development, test, or production"
            ),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
