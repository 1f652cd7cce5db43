//! Feed module - Daily BTC price history
//!
//! Fetches the long-term daily price dataset (Quandl BCHAIN/MKPRU) and
//! normalises it into an ascending [`RawSeries`].

mod quandl;

pub use quandl::{parse_dataset, QuandlClient};

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::types::RawSeries;

/// Source of the raw daily price series
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RawSeriesSource: Send + Sync {
    /// Get the source name
    fn name(&self) -> &'static str;

    /// One outbound request, no retries
    async fn fetch(&self) -> Result<RawSeries, PipelineError>;
}
