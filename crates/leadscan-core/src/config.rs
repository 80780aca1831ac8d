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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;
    let rapidapi_key = require("RAPIDAPI_KEY")?;
    let gemini_api_key = require("GEMINI_API_KEY")?;

    let env = parse_environment(&or_default("LEADSCAN_ENV", "development"))?;
    let log_level = or_default("LEADSCAN_LOG_LEVEL", "info");
    let user_agent = or_default("LEADSCAN_USER_AGENT", "leadscan/0.1 (lead-discovery)");

    let rapidapi_host = or_default("RAPIDAPI_HOST", "local-business-data.p.rapidapi.com");
    let listing_base_url = or_default(
        "LEADSCAN_LISTING_BASE_URL",
        "https://local-business-data.p.rapidapi.com",
    );
    let listing_timeout_secs = parse_u64("RAPIDAPI_TIMEOUT", "30")?;
    let listing_page_size = parse_u32("LEADSCAN_LISTING_PAGE_SIZE", "20")?;
    let listing_language = or_default("LEADSCAN_LISTING_LANGUAGE", "de");
    let listing_region = or_default("LEADSCAN_LISTING_REGION", "ch");

    let gemini_model = or_default("GEMINI_MODEL", "gemini-1.5-flash");
    let gemini_base_url = or_default(
        "LEADSCAN_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let gemini_timeout_secs = parse_u64("LEADSCAN_GEMINI_TIMEOUT_SECS", "60")?;
    let gemini_max_retries = parse_u32("LEADSCAN_GEMINI_MAX_RETRIES", "2")?;

    let pagespeed_api_key = lookup("GOOGLE_PAGESPEED_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let pagespeed_endpoint = or_default(
        "GOOGLE_PAGESPEED_ENDPOINT",
        "https://www.googleapis.com/pagespeedonline/v5/runPagespeed",
    );
    let pagespeed_timeout_secs = parse_u64("LEADSCAN_PAGESPEED_TIMEOUT_SECS", "60")?;

    let security_timeout_secs = parse_u64("LEADSCAN_SECURITY_TIMEOUT_SECS", "10")?;

    let max_scan_limit = parse_usize("MAX_SCAN_LIMIT", "1000")?;
    if max_scan_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "MAX_SCAN_LIMIT".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let keepalive_secs = parse_u64("LEADSCAN_KEEPALIVE_SECS", "15")?;

    let db_max_connections = parse_u32("LEADSCAN_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("LEADSCAN_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("LEADSCAN_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        user_agent,
        rapidapi_key,
        rapidapi_host,
        listing_base_url,
        listing_timeout_secs,
        listing_page_size,
        listing_language,
        listing_region,
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        gemini_timeout_secs,
        gemini_max_retries,
        pagespeed_api_key,
        pagespeed_endpoint,
        pagespeed_timeout_secs,
        security_timeout_secs,
        max_scan_limit,
        keepalive_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LEADSCAN_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
