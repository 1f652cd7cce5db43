//! Trimming derived series to their defined suffix

use crate::types::DerivedSeries;

/// Drop the first `window - 1` rows of a rolling series.
///
/// The first remaining row carries the first full-window value. Output
/// length is `len - (window - 1)`, floored at zero; dates stay a
/// contiguous suffix of the input dates. `window <= 1` is a no-op.
pub fn trim_leading_undefined(series: &DerivedSeries, window: usize) -> DerivedSeries {
    let skip = window.saturating_sub(1).min(series.len());
    DerivedSeries::from_points(series.window(), series.points()[skip..].to_vec())
}
