//! # Configuration
//!
//! Read from environment variables (a `.env` file is loaded first by `main`):
//!
//! ```env
//! # Server
//! BIND_ADDRESS=0.0.0.0:8080
//! STATIC_DIR=./static
//!
//! # Reservation backend
//! BACKEND_URL=http://localhost:5000/api
//! BACKEND_TIMEOUT_SECS=30
//!
//! # "Today" for date validation (Washington, DC)
//! RESTAURANT_UTC_OFFSET=-05:00
//!
//! # Logging
//! RUST_LOG=debug,actix_web=info
//! ```

use chrono::FixedOffset;
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for {key}: '{value}' ({expected})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_address: String,
    pub static_dir: String,
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub utc_offset: FixedOffset,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the settings from any key/value source; missing keys take defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let timeout_raw = or_default("BACKEND_TIMEOUT_SECS", "30");
        let backend_timeout = timeout_raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or(ConfigError {
                key: "BACKEND_TIMEOUT_SECS",
                value: timeout_raw.clone(),
                expected: "a positive number of seconds",
            })?;

        let offset_raw = or_default("RESTAURANT_UTC_OFFSET", "-05:00");
        let utc_offset = offset_raw.trim().parse::<FixedOffset>().map_err(|_| ConfigError {
            key: "RESTAURANT_UTC_OFFSET",
            value: offset_raw.clone(),
            expected: "an offset like -05:00",
        })?;

        Ok(Self {
            bind_address: or_default("BIND_ADDRESS", "0.0.0.0:8080"),
            static_dir: or_default("STATIC_DIR", "./static"),
            backend_url: or_default("BACKEND_URL", "http://localhost:5000/api"),
            backend_timeout,
            utc_offset,
        })
    }
}
