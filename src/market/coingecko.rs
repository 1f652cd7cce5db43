//! CoinGecko `/coins/markets` client

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::config::MarketConfig;
use crate::error::PipelineError;
use crate::market::MarketListing;

const SOURCE_NAME: &str = "CoinGecko";

/// Page size the listing endpoint uses when none is given
const DEFAULT_PAGE_SIZE: usize = 100;

/// One asset from the listing; only the fields the ticker needs
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMarket {
    #[serde(default)]
    pub id: String,
    pub symbol: String,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    url: String,
    vs_currency: String,
}

impl CoinGeckoClient {
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            url: config.url.clone(),
            vs_currency: config.vs_currency.clone(),
        }
    }

    /// Query for the first page, large enough to hold `limit` rows
    fn query_params(&self, limit: usize) -> [(&'static str, String); 4] {
        [
            ("vs_currency", self.vs_currency.clone()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", limit.max(DEFAULT_PAGE_SIZE).to_string()),
            ("page", "1".to_string()),
        ]
    }
}

#[async_trait]
impl MarketListing for CoinGeckoClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch_markets(&self, limit: usize) -> Result<Vec<CoinMarket>, PipelineError> {
        info!(source = %SOURCE_NAME, vs = %self.vs_currency, limit, "Fetching market listing...");

        let params = self.query_params(limit);

        let response = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .await
            .map_err(|e| PipelineError::unavailable(SOURCE_NAME, e))?;

        if !response.status().is_success() {
            return Err(PipelineError::unavailable(
                SOURCE_NAME,
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .json::<Vec<CoinMarket>>()
            .await
            .map_err(|e| PipelineError::unavailable(SOURCE_NAME, format!("unexpected payload: {e}")))
    }
}
