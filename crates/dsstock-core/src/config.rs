use crate::app_config::{AppConfig, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
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
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let sites_path = PathBuf::from(or_default("DSSTOCK_SITES_PATH", "./config/sites.yaml"));
    let log_level = or_default("DSSTOCK_LOG_LEVEL", "info");
    let user_agent = or_default("DSSTOCK_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = parse_u64("DSSTOCK_REQUEST_TIMEOUT_SECS", "15")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "DSSTOCK_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }

    let cache_ttl_secs = parse_u64("DSSTOCK_CACHE_TTL_SECS", "600")?;

    let proximity_window = parse_usize("DSSTOCK_PROXIMITY_WINDOW", "50")?;
    if proximity_window == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "DSSTOCK_PROXIMITY_WINDOW".to_string(),
            reason: "window must be positive".to_string(),
        });
    }

    Ok(AppConfig {
        sites_path,
        log_level,
        request_timeout_secs,
        user_agent,
        cache_ttl_secs,
        proximity_window,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
