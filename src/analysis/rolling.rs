//! Rolling mean and the positive-price filter

use tracing::debug;

use crate::error::PipelineError;
use crate::types::{DerivedPoint, DerivedSeries, PricePoint, RawSeries};

/// Result of [`filter_positive`]
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub kept: RawSeries,
    /// One `InvalidSample` per dropped row
    pub rejected: Vec<PipelineError>,
}

/// Simple moving average over `window` trailing rows.
///
/// Row `i` gets a value only when `i >= window - 1` and every price in
/// `series[i + 1 - window ..= i]` is present and finite. Partial windows
/// never produce a value. A zero window yields an all-undefined series.
pub fn rolling_mean(series: &RawSeries, window: usize) -> DerivedSeries {
    let rows = series.points();

    let points = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let value = if window == 0 || i + 1 < window {
                None
            } else {
                window_mean(&rows[i + 1 - window..=i])
            };
            DerivedPoint {
                date: row.date,
                price: row.price,
                value,
            }
        })
        .collect();

    DerivedSeries::from_points(window, points)
}

fn window_mean(slice: &[PricePoint]) -> Option<f64> {
    let mut sum = 0.0;
    for row in slice {
        match row.price {
            Some(p) if p.is_finite() => sum += p,
            _ => return None,
        }
    }
    Some(sum / slice.len() as f64)
}

/// Longest stretch of consecutive rows carrying a finite price, i.e. the
/// largest window that can produce a value
pub fn longest_priced_run(series: &RawSeries) -> usize {
    series
        .points()
        .iter()
        .fold((0, 0), |(best, run), p| match p.price {
            Some(v) if v.is_finite() => (best.max(run + 1), run + 1),
            _ => (best, 0),
        })
        .0
}

/// Drop rows whose price is missing, non-finite or `<= 0`.
///
/// Zero quotes are provider artifacts from the early history.
pub fn filter_positive(series: &RawSeries) -> FilterOutcome {
    let (kept, dropped): (Vec<PricePoint>, Vec<PricePoint>) = series
        .points()
        .iter()
        .copied()
        .partition(|p| p.is_valid_price());

    let rejected: Vec<PipelineError> = dropped
        .into_iter()
        .map(|p| PipelineError::InvalidSample {
            date: p.date,
            price: p.price,
        })
        .collect();

    if !rejected.is_empty() {
        debug!(
            rejected = rejected.len(),
            kept = kept.len(),
            "Filtered non-positive prices"
        );
    }

    FilterOutcome {
        // A subsequence of an ascending series is still ascending
        kept: RawSeries::new(kept).unwrap_or_default(),
        rejected,
    }
}
