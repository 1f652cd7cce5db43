//! Heat map sampling and the percent-change colour driver

use serde::Serialize;

use crate::analysis::params::{COLOR_SCALE_MAX, COLOR_SCALE_MIN};
use crate::types::{DerivedSeries, HeatMapSample};

/// Take every `period_days`-th row starting at index 0 and attach the
/// percent change of the rolling value vs. the previous sample.
///
/// The first sample, and any sample next to an undefined or zero value,
/// has no percent change. A zero period is treated as 1.
pub fn sample_and_pct_change(series: &DerivedSeries, period_days: usize) -> Vec<HeatMapSample> {
    let mut samples: Vec<HeatMapSample> = Vec::new();
    let mut previous: Option<Option<f64>> = None;

    for point in series.points().iter().step_by(period_days.max(1)) {
        let pct_change = match previous {
            Some(Some(prev)) if prev != 0.0 => point.value.map(|v| (v - prev) / prev * 100.0),
            _ => None,
        };
        samples.push(HeatMapSample {
            date: point.date,
            price: point.price,
            long_window_value: point.value,
            pct_change,
        });
        previous = Some(point.value);
    }

    samples
}

/// Bounded colour scale for the heat map markers.
///
/// Out-of-range percent changes are clipped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self {
            min: COLOR_SCALE_MIN,
            max: COLOR_SCALE_MAX,
        }
    }
}

impl ColorScale {
    pub fn clamp(&self, pct_change: f64) -> f64 {
        pct_change.max(self.min).min(self.max)
    }

    /// Position on the scale in `[0, 1]`
    pub fn normalize(&self, pct_change: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        (self.clamp(pct_change) - self.min) / span
    }
}

impl HeatMapSample {
    /// Normalised colour position, `None` when there is no percent change
    pub fn color_level(&self, scale: &ColorScale) -> Option<f64> {
        self.pct_change
            .filter(|p| p.is_finite())
            .map(|p| scale.normalize(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DerivedPoint;
    use chrono::NaiveDate;

    fn derived(values: &[Option<f64>]) -> DerivedSeries {
        let start = NaiveDate::from_ymd_opt(2018, 6, 1).unwrap();
        DerivedSeries::from_points(
            1,
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| DerivedPoint {
                    date: start + chrono::Duration::days(i as i64),
                    price: v,
                    value: v,
                })
                .collect(),
        )
    }

    #[test]
    fn test_pct_change_every_point() {
        let series = derived(&[Some(100.0), Some(110.0), Some(121.0)]);
        let samples = sample_and_pct_change(&series, 1);

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].pct_change, None);
        assert!((samples[1].pct_change.unwrap() - 10.0).abs() < 1e-9);
        assert!((samples[2].pct_change.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_stride_starts_at_zero() {
        let values: Vec<Option<f64>> = (0..10).map(|i| Some(100.0 + i as f64)).collect();
        let series = derived(&values);
        let samples = sample_and_pct_change(&series, 4);

        // indices 0, 4, 8
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].long_window_value, Some(104.0));
        assert_eq!(samples[2].date, series.points()[8].date);
        assert!((samples[2].pct_change.unwrap() - 4.0 / 104.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_undefined_propagates() {
        let series = derived(&[Some(100.0), None, Some(120.0)]);
        let samples = sample_and_pct_change(&series, 1);
        assert_eq!(samples[1].pct_change, None);
        assert_eq!(samples[2].pct_change, None);
    }

    #[test]
    fn test_empty_series() {
        assert!(sample_and_pct_change(&DerivedSeries::default(), 28).is_empty());
    }

    #[test]
    fn test_color_scale_clips() {
        let scale = ColorScale::default();
        assert_eq!(scale.clamp(-3.0), 0.0);
        assert_eq!(scale.clamp(35.0), 20.0);
        assert_eq!(scale.normalize(10.0), 0.5);
        assert_eq!(scale.normalize(50.0), 1.0);
    }

    #[test]
    fn test_color_level() {
        let sample = HeatMapSample {
            date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            price: Some(30_000.0),
            long_window_value: Some(8_000.0),
            pct_change: Some(5.0),
        };
        assert_eq!(sample.color_level(&ColorScale::default()), Some(0.25));

        let first = HeatMapSample {
            pct_change: None,
            ..sample
        };
        assert_eq!(first.color_level(&ColorScale::default()), None);
    }
}
