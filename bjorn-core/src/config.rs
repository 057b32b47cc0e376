//! Process configuration read from the environment.

use std::{env, time::Duration};

/// Default FTCScout REST endpoint.
pub const DEFAULT_FTC_API_BASE_URL: &str = "https://api.ftcscout.org/rest/v1";
/// Default upstream request timeout.
pub const DEFAULT_FTC_HTTP_TIMEOUT_SECS: u64 = 10;
/// Default number of keys each data cache holds.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;
/// Default lifetime of a cached collection (5 hours).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60 * 60;

/// Invalid or missing configuration detected at start-up.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable `{0}`")]
    Missing(&'static str),
    #[error("environment variable `{name}` has invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings for the bot process.
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub ftc_api_base_url: String,
    pub ftc_http_timeout: Duration,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
}

impl Config {
    /// Read configuration from process environment variables.
    ///
    /// Only `DISCORD_TOKEN` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let ftc_api_base_url = lookup("FTC_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| DEFAULT_FTC_API_BASE_URL.to_owned());

        let timeout_secs = parse_or(
            &lookup,
            "FTC_HTTP_TIMEOUT_SECS",
            DEFAULT_FTC_HTTP_TIMEOUT_SECS,
        )?;
        let cache_capacity = parse_or(&lookup, "CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?;
        let cache_ttl_secs = parse_or(&lookup, "CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;

        Ok(Self {
            discord_token,
            ftc_api_base_url,
            ftc_http_timeout: Duration::from_secs(timeout_secs),
            cache_capacity,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };

    raw.trim()
        .parse::<T>()
        .ok()
        .filter(|value| *value > T::default())
        .ok_or(ConfigError::Invalid { name, value: raw })
}
