//! Fixed analysis constants

/// 200 weeks expressed in daily rows
pub const LONG_WINDOW_DAYS: usize = 1400;

/// Golden-ratio multiplier baseline (350-day moving average)
pub const SHORT_WINDOW_DAYS: usize = 350;

/// Heat map sampling stride (4 weeks)
pub const HEAT_MAP_PERIOD_DAYS: usize = 28;

/// Golden-ratio multiplier factors, in legend order
pub const GOLDEN_RATIO_MULTIPLIERS: [f64; 7] = [1.6, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0];

/// Lower bound of the heat map colour scale (percent change)
pub const COLOR_SCALE_MIN: f64 = 0.0;

/// Upper bound of the heat map colour scale (percent change)
pub const COLOR_SCALE_MAX: f64 = 20.0;

/// Window lengths and stride used by the pipeline.
///
/// The multiplier factors are not part of this: they are always
/// [`GOLDEN_RATIO_MULTIPLIERS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisParams {
    pub long_window: usize,
    pub short_window: usize,
    pub period_days: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            long_window: LONG_WINDOW_DAYS,
            short_window: SHORT_WINDOW_DAYS,
            period_days: HEAT_MAP_PERIOD_DAYS,
        }
    }
}

impl AnalysisParams {
    /// Largest window, i.e. the minimum history for both charts
    pub fn required_history(&self) -> usize {
        self.long_window.max(self.short_window)
    }
}
