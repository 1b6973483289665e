// src/config.rs
use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_BACKEND_URL: &str = "https://ai-shopping-concierge.onrender.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number of milliseconds, got {value:?}")]
    InvalidMillis { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub bind_addr: String,
    pub health_timeout: Duration,
    /// Unset means sends and clears wait for the remote indefinitely.
    pub request_timeout: Option<Duration>,
    pub user_id_file: Option<PathBuf>,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            request_timeout: None,
            user_id_file: None,
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Config {
    /// Config pointing at `backend_url`, everything else default.
    pub fn with_backend(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            ..Default::default()
        }
    }

    // Read CONCIERGE_* variables. Call dotenvy first if a .env file should apply.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend_url = non_empty_var("CONCIERGE_BACKEND_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.backend_url);
        let bind_addr = non_empty_var("CONCIERGE_BIND_ADDR").unwrap_or(defaults.bind_addr);
        let health_timeout = millis_var("CONCIERGE_HEALTH_TIMEOUT_MS")?
            .unwrap_or(defaults.health_timeout);
        let request_timeout = millis_var("CONCIERGE_REQUEST_TIMEOUT_MS")?;
        let user_id_file = non_empty_var("CONCIERGE_USER_ID_FILE").map(PathBuf::from);
        let static_dir = non_empty_var("CONCIERGE_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        Ok(Self {
            backend_url,
            bind_addr,
            health_timeout,
            request_timeout,
            user_id_file,
            static_dir,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn millis_var(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    match non_empty_var(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| ConfigError::InvalidMillis { name, value }),
    }
}
