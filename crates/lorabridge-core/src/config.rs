//! Configuration defaults and loading.
//!
//! Every tunable has a constant default in [`defaults`] and an environment
//! variable override listed in [`env_vars`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable names
pub mod env_vars {
    pub const DECODER_TIMEOUT_MS: &str = "LORABRIDGE_DECODER_TIMEOUT_MS";
    pub const DECODER_KEEP_ALIVE_SECS: &str = "LORABRIDGE_DECODER_KEEP_ALIVE_SECS";
    pub const DECODER_POOL_MAX_IDLE: &str = "LORABRIDGE_DECODER_POOL_MAX_IDLE";
    pub const LOG_JSON: &str = "LORABRIDGE_LOG_JSON";
    pub const LOG_FILTER: &str = "RUST_LOG";
}

/// Default values
pub mod defaults {
    /// Upper bound for a single remote decoder call.
    pub const DECODER_TIMEOUT_MS: u64 = 30_000;
    /// Decoder services run next to the network server, so connections
    /// are kept open for a full day.
    pub const DECODER_KEEP_ALIVE_SECS: u64 = 86_400;
    pub const DECODER_POOL_MAX_IDLE: usize = 16;
    pub const LOG_FILTER: &str = "lorabridge=info";
}

/// Remote decoder client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Keep-alive duration for pooled connections in seconds
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
    /// Maximum idle connections kept per decoder host
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,
}

fn default_timeout_ms() -> u64 {
    defaults::DECODER_TIMEOUT_MS
}

fn default_keep_alive_secs() -> u64 {
    defaults::DECODER_KEEP_ALIVE_SECS
}

fn default_pool_max_idle() -> usize {
    defaults::DECODER_POOL_MAX_IDLE
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_timeout_ms(),
            keep_alive_secs: default_keep_alive_secs(),
            pool_max_idle_per_host: default_pool_max_idle(),
        }
    }
}

impl DecoderConfig {
    /// Load from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, env_vars::DECODER_TIMEOUT_MS)? {
            config.request_timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, env_vars::DECODER_KEEP_ALIVE_SECS)? {
            config.keep_alive_secs = v;
        }
        if let Some(v) = parse_var(&lookup, env_vars::DECODER_POOL_MAX_IDLE)? {
            config.pool_max_idle_per_host = v;
        }
        Ok(config)
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
    /// Filter directives, `RUST_LOG` syntax
    pub filter: Option<String>,
}

impl LogConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            json: parse_var(&lookup, env_vars::LOG_JSON)?.unwrap_or(false),
            filter: lookup(env_vars::LOG_FILTER).filter(|f| !f.trim().is_empty()),
        })
    }

    /// Filter directives in effect.
    pub fn filter_directives(&self) -> &str {
        self.filter.as_deref().unwrap_or(defaults::LOG_FILTER)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::invalid_configuration(name, raw.clone(), e.to_string())),
    }
}
