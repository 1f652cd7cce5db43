//! Golden-ratio multiplier lines

use crate::types::{DerivedSeries, MultiplierLine, MultiplierSet};

/// Scale the baseline by each factor, keeping row alignment.
/// Undefined baseline rows stay undefined.
pub fn expand(baseline: &DerivedSeries, factors: &[f64]) -> MultiplierSet {
    let lines = factors
        .iter()
        .map(|&factor| MultiplierLine {
            factor,
            points: baseline
                .points()
                .iter()
                .map(|p| (p.date, p.value.map(|v| v * factor)))
                .collect(),
        })
        .collect();

    MultiplierSet::new(lines)
}
