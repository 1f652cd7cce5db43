//! BTC Heat Map Library
//!
//! Derives the 200-week moving-average heat map and golden-ratio
//! multiplier series from the daily BTC price history.

pub mod analysis;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod market;
pub mod pipeline;
pub mod types;

pub use error::PipelineError;
pub use pipeline::{ChartData, Pipeline};
