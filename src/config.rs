//! Editor configuration parsed from environment variables.

use std::time::Duration;

use crate::consts::DEFAULT_DEBOUNCE_MS;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was present but its value is not acceptable.
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Base URL of the presentation service, without a trailing slash.
    pub api_url: String,
    /// Bearer credential, if one was configured.
    pub token: Option<String>,
    /// Quiet period before deferred element edits are written.
    pub debounce: Duration,
    pub timeouts: Timeouts,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token: None,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

impl EditorConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `SLIDEDECK_API_URL`: default `http://127.0.0.1:5000/api`
    /// - `SLIDEDECK_TOKEN`: bearer credential
    /// - `SLIDEDECK_DEBOUNCE_MS`: default 500, must be non-zero
    /// - `SLIDEDECK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SLIDEDECK_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero debounce window.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EditorConfig::from_env`] with an explicit variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero debounce window.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("SLIDEDECK_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let token = lookup("SLIDEDECK_TOKEN").filter(|t| !t.is_empty());

        let debounce_ms = parse_or(lookup("SLIDEDECK_DEBOUNCE_MS"), DEFAULT_DEBOUNCE_MS);
        if debounce_ms == 0 {
            return Err(ConfigError::InvalidValue {
                var: "SLIDEDECK_DEBOUNCE_MS",
                reason: "debounce window must be greater than zero".into(),
            });
        }

        let timeouts = Timeouts {
            request_secs: parse_or(lookup("SLIDEDECK_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(lookup("SLIDEDECK_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_url, token, debounce: Duration::from_millis(debounce_ms), timeouts })
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse::<T>().unwrap_or(default),
        None => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
