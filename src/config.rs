//! Process configuration, read once from the environment at startup.
//!
//! | Variable                          | Default |
//! |-----------------------------------|---------|
//! | `BACKOFFICE_CHANNEL_BUFFER`       | 32      |
//! | `BACKOFFICE_PREVIEW_LIMIT`        | 10      |
//! | `BACKOFFICE_LOW_STOCK_THRESHOLD`  | 5       |
//! | `BACKOFFICE_LOG`                  | info    |
//!
//! A `.env` file in the working directory is loaded first when present.
//! `RUST_LOG` still wins over `BACKOFFICE_LOG` for the tracing filter.

use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("Settings could not be parsed: {0}")]
    InvalidSettings(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackOfficeConfig {
    /// Capacity of every actor mailbox.
    pub channel_buffer: usize,
    pub preview_limit: usize,
    pub low_stock_threshold: u32,
    pub log_filter: String,
}

impl Default for BackOfficeConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            preview_limit: 10,
            low_stock_threshold: 5,
            log_filter: "info".to_string(),
        }
    }
}

impl BackOfficeConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset keys keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            channel_buffer: parse_positive(&lookup, "BACKOFFICE_CHANNEL_BUFFER", defaults.channel_buffer)?,
            preview_limit: parse_positive(&lookup, "BACKOFFICE_PREVIEW_LIMIT", defaults.preview_limit)?,
            low_stock_threshold: parse_positive(
                &lookup,
                "BACKOFFICE_LOW_STOCK_THRESHOLD",
                defaults.low_stock_threshold,
            )?,
            log_filter: lookup("BACKOFFICE_LOG")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.log_filter),
        })
    }
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) if value > T::default() => Ok(value),
            _ => Err(ConfigError::InvalidNumber { key, value: raw }),
        },
    }
}
