//! # Configuration
//!
//! Settings read from the environment (and `.env` via `dotenvy` in the binary).
//! Unset keys fall back to the `DEFAULT_*` constants; malformed or zero values are errors.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_LOCATION_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RECORD_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RECORD_RETRY_BACKOFF_MS: u64 = 250;
pub const DEFAULT_ACTOR_BUFFER_SIZE: usize = 32;
pub const DEFAULT_SESSION_DIR: &str = ".session";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub poll_interval: Duration,
    pub location_timeout: Duration,
    pub record_retry_attempts: u32,
    pub record_retry_backoff: Duration,
    pub actor_buffer_size: usize,
    pub session_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            location_timeout: Duration::from_secs(DEFAULT_LOCATION_TIMEOUT_SECS),
            record_retry_attempts: DEFAULT_RECORD_RETRY_ATTEMPTS,
            record_retry_backoff: Duration::from_millis(DEFAULT_RECORD_RETRY_BACKOFF_MS),
            actor_buffer_size: DEFAULT_ACTOR_BUFFER_SIZE,
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let poll_interval_secs: u64 = parse_or(
            &lookup,
            "TRACKING_POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
        )?;
        if poll_interval_secs == 0 {
            bail!("TRACKING_POLL_INTERVAL_SECS must be greater than zero");
        }
        let location_timeout_secs: u64 = parse_or(
            &lookup,
            "LOCATION_TIMEOUT_SECS",
            DEFAULT_LOCATION_TIMEOUT_SECS,
        )?;
        let record_retry_attempts: u32 = parse_or(
            &lookup,
            "RECORD_RETRY_ATTEMPTS",
            DEFAULT_RECORD_RETRY_ATTEMPTS,
        )?;
        if record_retry_attempts == 0 {
            bail!("RECORD_RETRY_ATTEMPTS must be at least 1");
        }
        let record_retry_backoff_ms: u64 = parse_or(
            &lookup,
            "RECORD_RETRY_BACKOFF_MS",
            DEFAULT_RECORD_RETRY_BACKOFF_MS,
        )?;
        let actor_buffer_size: usize =
            parse_or(&lookup, "ACTOR_BUFFER_SIZE", DEFAULT_ACTOR_BUFFER_SIZE)?;
        if actor_buffer_size == 0 {
            bail!("ACTOR_BUFFER_SIZE must be greater than zero");
        }
        let session_dir = lookup("SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR));

        Ok(Self {
            poll_interval: Duration::from_secs(poll_interval_secs),
            location_timeout: Duration::from_secs(location_timeout_secs),
            record_retry_attempts,
            record_retry_backoff: Duration::from_millis(record_retry_backoff_ms),
            actor_buffer_size,
            session_dir,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}")),
    }
}
