use std::path::PathBuf;
use std::time::Duration;

use crate::app_config::{AppConfig, BrowserSettings, Credentials, Timings};
use crate::ConfigError;

pub(crate) const DEFAULT_LOGIN_URL: &str =
    "https://accounts.moneycontrol.com/mclogin/?v=2&d=2&redirect=home";
pub(crate) const DEFAULT_SEARCH_URL: &str = "https://duckduckgo.com/";
pub(crate) const DEFAULT_SITE_DOMAIN: &str = "moneycontrol.com";
pub(crate) const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or only half of the credential
/// pair is set.
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
/// Returns `ConfigError` if a value is invalid or only half of the credential
/// pair is set.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
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

    let log_level = or_default("MCSCRAPE_LOG_LEVEL", "info");
    let symbols_path = PathBuf::from(or_default("MCSCRAPE_SYMBOLS_PATH", "symbols.csv"));
    let output_path = PathBuf::from(or_default("MCSCRAPE_OUTPUT_PATH", "moneycontrol_data.txt"));
    let screenshot_dir = PathBuf::from(or_default("MCSCRAPE_SCREENSHOT_DIR", "screenshots"));

    let credentials = match (
        optional("MCSCRAPE_LOGIN_EMAIL"),
        optional("MCSCRAPE_LOGIN_PASSWORD"),
    ) {
        (Some(email), Some(password)) => Some(Credentials { email, password }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(ConfigError::MissingEnvVar(
                "MCSCRAPE_LOGIN_PASSWORD".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(ConfigError::MissingEnvVar("MCSCRAPE_LOGIN_EMAIL".to_string()))
        }
    };

    let login_url = or_default("MCSCRAPE_LOGIN_URL", DEFAULT_LOGIN_URL);
    let search_url = or_default("MCSCRAPE_SEARCH_URL", DEFAULT_SEARCH_URL);
    let site_domain = or_default("MCSCRAPE_SITE_DOMAIN", DEFAULT_SITE_DOMAIN);
    let api_url = optional("MCSCRAPE_API_URL");

    let headless = parse_bool("MCSCRAPE_HEADLESS", &or_default("MCSCRAPE_HEADLESS", "true"))?;
    let browser = BrowserSettings {
        headless,
        chrome_path: optional("MCSCRAPE_CHROME_PATH").map(PathBuf::from),
        user_agent: or_default("MCSCRAPE_USER_AGENT", DEFAULT_USER_AGENT),
        viewport_width: parse_u32("MCSCRAPE_VIEWPORT_WIDTH", "1440")?,
        viewport_height: parse_u32("MCSCRAPE_VIEWPORT_HEIGHT", "900")?,
    };

    let search_max_attempts = parse_u32("MCSCRAPE_SEARCH_MAX_ATTEMPTS", "3")?;
    if search_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "MCSCRAPE_SEARCH_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let search_retry_delay_ms = parse_u64("MCSCRAPE_SEARCH_RETRY_DELAY_MS", "2000")?;
    let navigation_timeout_secs = parse_u64("MCSCRAPE_NAVIGATION_TIMEOUT_SECS", "60")?;

    let pacing_delay_ms = match optional("MCSCRAPE_PACING_DELAY_MS") {
        Some(raw) => Some(raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "MCSCRAPE_PACING_DELAY_MS".to_string(),
            reason: e.to_string(),
        })?),
        None => None,
    };
    let request_timeout_secs = parse_u64("MCSCRAPE_REQUEST_TIMEOUT_SECS", "30")?;

    let timings = Timings {
        navigation: Duration::from_secs(navigation_timeout_secs),
        search_retry_delay: Duration::from_millis(search_retry_delay_ms),
        ..Timings::default()
    };

    Ok(AppConfig {
        log_level,
        symbols_path,
        output_path,
        screenshot_dir,
        credentials,
        login_url,
        search_url,
        site_domain,
        api_url,
        browser,
        search_max_attempts,
        pacing_delay_ms,
        request_timeout_secs,
        timings,
    })
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no` (case-insensitive).
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
