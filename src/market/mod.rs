//! Market module - Top-N ticker snapshot
//!
//! Independent of the historical pipeline: pulls the market-cap ranked
//! listing once and projects the first N rows for the price ticker.

mod coingecko;

pub use coingecko::{CoinGeckoClient, CoinMarket};

use async_trait::async_trait;
use tracing::info;

use crate::error::PipelineError;
use crate::types::{MarketRow, MarketSnapshot};

/// Ranked market listing provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketListing: Send + Sync {
    /// Get the source name
    fn name(&self) -> &'static str;

    /// At least the first `limit` assets in the provider's market-cap order,
    /// fewer only when the provider lists fewer
    async fn fetch_markets(&self, limit: usize) -> Result<Vec<CoinMarket>, PipelineError>;
}

/// Builds a [`MarketSnapshot`] from a [`MarketListing`]
pub struct MarketSnapshotFetcher<L> {
    listing: L,
}

impl<L: MarketListing> MarketSnapshotFetcher<L> {
    pub fn new(listing: L) -> Self {
        Self { listing }
    }

    /// First `n` rows in provider order, all-or-nothing
    pub async fn fetch_top_n(&self, n: usize) -> Result<MarketSnapshot, PipelineError> {
        let markets = self.listing.fetch_markets(n).await?;
        let snapshot = project_top_n(self.listing.name(), markets, n)?;

        info!(
            source = %self.listing.name(),
            rows = snapshot.len(),
            "Fetched market snapshot"
        );
        Ok(snapshot)
    }
}

/// Keep the first `n` assets, upper-case the symbols. A row with a
/// missing field fails the whole snapshot.
pub fn project_top_n(
    source: &str,
    markets: Vec<CoinMarket>,
    n: usize,
) -> Result<MarketSnapshot, PipelineError> {
    let rows = markets
        .into_iter()
        .take(n)
        .map(|m| -> Result<MarketRow, PipelineError> {
            let missing = |field: &str| {
                PipelineError::unavailable(source, format!("{} missing {}", m.symbol, field))
            };
            Ok(MarketRow {
                symbol: m.symbol.to_uppercase(),
                current_price: m.current_price.ok_or_else(|| missing("current_price"))?,
                change_pct_24h: m
                    .price_change_percentage_24h
                    .ok_or_else(|| missing("price_change_percentage_24h"))?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MarketSnapshot::new(rows))
}
