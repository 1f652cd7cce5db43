//! Pipeline module - One-shot construction of every chart series
//!
//! Fetch -> rolling means -> trim -> {heat map samples, multiplier lines}.
//! Everything is computed once and handed out as an immutable [`ChartData`].

mod retry;

pub use retry::{fetch_with_retry, RetryPolicy};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::params::GOLDEN_RATIO_MULTIPLIERS;
use crate::analysis::{
    expand, filter_positive, longest_priced_run, rolling_mean, sample_and_pct_change,
    trim_leading_undefined, AnalysisParams,
};
use crate::error::PipelineError;
use crate::feed::RawSeriesSource;
use crate::market::{MarketListing, MarketSnapshotFetcher};
use crate::types::{DerivedSeries, HeatMapSample, MarketSnapshot, MultiplierSet, RawSeries};

const HEAT_MAP_SERIES: &str = "200WMA heat map";
const GOLDEN_RATIO_SERIES: &str = "350DMA golden ratio";

/// 200-week moving-average heat map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatMapChart {
    /// Daily rows from the first full long window on (date, price, 200WMA)
    pub daily: DerivedSeries,
    /// Every `period_days`-th daily row with its percent change
    pub samples: Vec<HeatMapSample>,
}

/// Golden-ratio multiplier chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldenRatioChart {
    /// Positive-price rows from the first full short window on (date, price, 350DMA)
    pub baseline: DerivedSeries,
    pub multipliers: MultiplierSet,
}

/// Historical series derived from one [`RawSeries`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSet {
    pub long_window: usize,
    pub short_window: usize,
    pub raw_len: usize,
    /// Longest run of consecutive priced rows in the long-window input
    pub long_input_run: usize,
    pub short_input_len: usize,
    pub heat_map: HeatMapChart,
    pub golden_ratio: GoldenRatioChart,
}

/// Pure derivation of both charts from the raw series
pub fn derive_series(raw: &RawSeries, params: &AnalysisParams) -> SeriesSet {
    // Long window runs on the unfiltered series, zero quotes included
    let long = rolling_mean(raw, params.long_window);
    let daily = trim_leading_undefined(&long, params.long_window);
    let samples = sample_and_pct_change(&daily, params.period_days);

    let filtered = filter_positive(raw);
    for rejected in &filtered.rejected {
        debug!(error = %rejected, "Excluded from short-window input");
    }
    let short = rolling_mean(&filtered.kept, params.short_window);
    let baseline = trim_leading_undefined(&short, params.short_window);
    let multipliers = expand(&baseline, &GOLDEN_RATIO_MULTIPLIERS);

    SeriesSet {
        long_window: params.long_window,
        short_window: params.short_window,
        raw_len: raw.len(),
        long_input_run: longest_priced_run(raw),
        short_input_len: filtered.kept.len(),
        heat_map: HeatMapChart { daily, samples },
        golden_ratio: GoldenRatioChart {
            baseline,
            multipliers,
        },
    }
}

impl SeriesSet {
    fn heat_map_history(&self) -> Result<(), PipelineError> {
        if self.heat_map.daily.is_fully_undefined() {
            return Err(PipelineError::InsufficientHistory {
                series: HEAT_MAP_SERIES.to_string(),
                required: self.long_window,
                available: self.long_input_run,
            });
        }
        Ok(())
    }

    fn golden_ratio_history(&self) -> Result<(), PipelineError> {
        if self.golden_ratio.baseline.is_fully_undefined() {
            return Err(PipelineError::InsufficientHistory {
                series: GOLDEN_RATIO_SERIES.to_string(),
                required: self.short_window,
                available: self.short_input_len,
            });
        }
        Ok(())
    }
}

/// Read-only handle over everything the charts consume
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    series: SeriesSet,
    market: MarketSnapshot,
}

impl ChartData {
    pub fn new(series: SeriesSet, market: MarketSnapshot) -> Self {
        Self { series, market }
    }

    /// Heat map series, or `InsufficientHistory` when no row is defined
    pub fn heat_map(&self) -> Result<&HeatMapChart, PipelineError> {
        self.series.heat_map_history()?;
        Ok(&self.series.heat_map)
    }

    /// Golden-ratio series, or `InsufficientHistory` when no row is defined
    pub fn golden_ratio(&self) -> Result<&GoldenRatioChart, PipelineError> {
        self.series.golden_ratio_history()?;
        Ok(&self.series.golden_ratio)
    }

    pub fn market(&self) -> &MarketSnapshot {
        &self.market
    }

    /// Raw access, without the history check
    pub fn series(&self) -> &SeriesSet {
        &self.series
    }
}

/// Runs both fetches and the derivation once
pub struct Pipeline<F, L> {
    feed: F,
    market: MarketSnapshotFetcher<L>,
    params: AnalysisParams,
    top_n: usize,
    retry: RetryPolicy,
}

impl<F: RawSeriesSource, L: MarketListing> Pipeline<F, L> {
    pub fn new(feed: F, listing: L) -> Self {
        Self {
            feed,
            market: MarketSnapshotFetcher::new(listing),
            params: AnalysisParams::default(),
            top_n: MarketSnapshot::CAPACITY,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_params(mut self, params: AnalysisParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn run(&self) -> Result<ChartData, PipelineError> {
        let raw = fetch_with_retry(&self.retry, self.feed.name(), || self.feed.fetch()).await?;

        if raw.len() < self.params.required_history() {
            warn!(
                points = raw.len(),
                required = self.params.required_history(),
                "Price history shorter than the largest window"
            );
        }

        let series = derive_series(&raw, &self.params);
        info!(
            heat_map_rows = series.heat_map.daily.len(),
            heat_map_samples = series.heat_map.samples.len(),
            golden_ratio_rows = series.golden_ratio.baseline.len(),
            "Derived chart series"
        );

        let market = fetch_with_retry(&self.retry, "market snapshot", || {
            self.market.fetch_top_n(self.top_n)
        })
        .await?;

        Ok(ChartData::new(series, market))
    }
}
