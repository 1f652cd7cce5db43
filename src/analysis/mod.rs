//! Analysis module - Rolling aggregates over the daily price series
//!
//! Computes the 1400-day (200-week) and 350-day moving averages, trims
//! them to their defined suffix, samples the long average every 28 days
//! for the heat map and expands the short average into golden-ratio lines.

mod align;
mod distance;
mod multiplier;
pub mod params;
mod rolling;

pub use align::trim_leading_undefined;
pub use distance::{sample_and_pct_change, ColorScale};
pub use multiplier::expand;
pub use params::AnalysisParams;
pub use rolling::{filter_positive, longest_priced_run, rolling_mean, FilterOutcome};
