//! Configuration management
//!
//! Loads from optional config files + environment variables via .env

mod types;

pub use types::*;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub market: MarketConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (HEATMAP_*)
            .add_source(Environment::with_prefix("HEATMAP").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Built-in defaults only, no files or environment
    pub fn defaults() -> Result<Self> {
        Self::builder()?
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    fn builder() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>> {
        let builder = Config::builder()
            // Feed defaults
            .set_default(
                "feed.url",
                "https://www.quandl.com/api/v3/datasets/BCHAIN/MKPRU.json",
            )?
            .set_default("feed.timeout_secs", 30)?
            // Market defaults
            .set_default("market.url", "https://api.coingecko.com/api/v3/coins/markets")?
            .set_default("market.vs_currency", "usd")?
            .set_default("market.top_n", 10)?
            .set_default("market.timeout_secs", 10)?
            // Retry defaults
            .set_default("retry.max_retries", 2)?
            .set_default("retry.backoff_ms", 500)?
            // Logging defaults
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?;

        Ok(builder)
    }

    /// Generate a digest of the config (without secrets) for logging
    pub fn digest(&self) -> String {
        format!(
            "feed={} api_key={} market={} vs={} top_n={} retries={}",
            self.feed.url,
            if self.feed.api_key.is_some() { "set" } else { "unset" },
            self.market.url,
            self.market.vs_currency,
            self.market.top_n,
            self.retry.max_retries,
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}
