//! Configuration sections

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Daily price dataset endpoint
    pub url: String,
    /// API key appended as `api_key` query parameter
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Market listing endpoint (ranked by market cap)
    pub url: String,
    /// Quote currency
    pub vs_currency: String,
    /// Ticker rows to keep
    pub top_n: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Extra attempts after the first failure
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each attempt
    pub backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is not set
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}
