use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org";
const DEFAULT_APP_URL: &str = "http://localhost";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REFRESH_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub account_id: Option<String>,
    /// Origin without the API version segment.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            account_id: None,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .context("TMDB_API_KEY not set")?;
        let base_url = env::var("TMDB_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut cfg = Self::new(api_key, base_url);
        cfg.account_id = env::var("TMDB_ACCOUNT_ID").ok().filter(|s| !s.is_empty());
        cfg.connect_timeout = env_secs("TMDB_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        cfg.timeout = env_secs("TMDB_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb: TmdbConfig,
    /// Public origin used for the image placeholder asset.
    pub app_url: String,
    pub refresh_interval: Duration,
    pub default_timezone: Tz,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let tmdb = TmdbConfig::from_env()?;
        let app_url = env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string());
        let refresh_interval = env_secs("REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_SECS)?;
        let tz_name = env::var("DEFAULT_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let default_timezone = tz_name
            .parse::<Tz>()
            .map_err(|e| anyhow!("DEFAULT_TIMEZONE '{}' is not a valid timezone: {}", tz_name, e))?;
        Ok(Self {
            tmdb,
            app_url,
            refresh_interval,
            default_timezone,
        })
    }
}

fn env_secs(key: &str, default: u64) -> Result<Duration> {
    match env::var(key) {
        Ok(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", key))?;
            if secs == 0 {
                anyhow::bail!("{} must be greater than zero", key);
            }
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(Duration::from_secs(default)),
    }
}
