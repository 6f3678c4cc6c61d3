use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::logging::LoggingConfig;

/// Service configuration, loadable from a TOML file. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
    /// Symbols the watchlist starts with.
    pub watchlist: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            batch: BatchConfig::default(),
            logging: LoggingConfig::default(),
            watchlist: ["ABB", "RELIANCE", "TCS", "INFY", "HDFCBANK", "SBIN", "LT", "ITC", "ONGC"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    /// Load from `path` if given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

// ── Sections ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

/// Where the option-chain data comes from and how to ask for it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Root page, also hit by the session bootstrap.
    pub base_url: String,
    /// Chain endpoint path, joined onto `base_url`.
    pub chain_path: String,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub bootstrap_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_attempts: u32,
    /// Linear backoff unit: the wait after failed attempt `n` is `n * backoff_step_ms`.
    pub backoff_step_ms: u64,
}

impl UpstreamConfig {
    pub fn chain_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.chain_path
        )
    }

    pub fn bootstrap_timeout(&self) -> Duration {
        Duration::from_millis(self.bootstrap_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn backoff_step(&self) -> Duration {
        Duration::from_millis(self.backoff_step_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nseindia.com".into(),
            chain_path: "/api/option-chain-equities".into(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".into(),
            accept: "application/json, text/javascript, */*; q=0.01".into(),
            accept_language: "en-US,en;q=0.9".into(),
            bootstrap_timeout_ms: 10_000,
            request_timeout_ms: 15_000,
            max_attempts: 3,
            backoff_step_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: f64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs_f64(self.ttl_secs.max(0.0))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 60.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub default_concurrency: usize,
    pub max_symbols: usize,
    /// Pause each batch worker takes before giving up its admission slot.
    pub throttle_ms: u64,
}

impl BatchConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            default_concurrency: 6,
            max_symbols: 60,
            throttle_ms: 100,
        }
    }
}
