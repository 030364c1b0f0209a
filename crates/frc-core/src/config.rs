use crate::app_config::{AppConfig, Environment, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from the variables already in the process,
/// without reading `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Every variable has a default, so an empty environment yields a usable config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("FRC_ENV", "development"))?;

    let bind_addr = or_default("FRC_BIND_ADDR", "0.0.0.0:5001")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("FRC_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("FRC_LOG_LEVEL", "info");
    let catalog_path = lookup("FRC_CATALOG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let cache_dir = PathBuf::from(or_default("FRC_CACHE_DIR", "./cache"));

    let cache_default_ttl_secs = parse_u64("FRC_CACHE_DEFAULT_TTL_SECS", "86400")?;
    let cache_max_entries = parse_usize("FRC_CACHE_MAX_ENTRIES", "5000")?;
    if cache_max_entries == 0 {
        return Err(invalid(
            "FRC_CACHE_MAX_ENTRIES",
            "must be at least 1".to_string(),
        ));
    }

    let fetch_timeout_secs = parse_u64("FRC_FETCH_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("FRC_USER_AGENT", DEFAULT_USER_AGENT);
    let rate_limit_delay_ms = parse_u64("FRC_RATE_LIMIT_DELAY_MS", "500")?;
    let search_deadline_secs = parse_u64("FRC_SEARCH_DEADLINE_SECS", "30")?;

    let validation_concurrency = parse_usize("FRC_VALIDATION_CONCURRENCY", "4")?;
    if validation_concurrency == 0 {
        return Err(invalid(
            "FRC_VALIDATION_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }

    let cache_cleanup_cron = or_default("FRC_CACHE_CLEANUP_CRON", "0 0 * * * *");
    let api_rate_limit_per_min = parse_u32("FRC_API_RATE_LIMIT_PER_MIN", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_path,
        cache_dir,
        cache_default_ttl_secs,
        cache_max_entries,
        fetch_timeout_secs,
        user_agent,
        rate_limit_delay_ms,
        search_deadline_secs,
        validation_concurrency,
        cache_cleanup_cron,
        api_rate_limit_per_min,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FRC_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
