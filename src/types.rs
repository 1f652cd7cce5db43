//! Core types used throughout the heat map pipeline
//!
//! Defines the raw price series, the derived (rolling) series and the
//! records handed to the presentation layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PipelineError;

/// One daily quote from the price feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    /// `None` when the provider sent null or a non-numeric value
    pub price: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price: Some(price),
        }
    }

    pub fn missing(date: NaiveDate) -> Self {
        Self { date, price: None }
    }

    /// Strictly positive, finite price
    pub fn is_valid_price(&self) -> bool {
        matches!(self.price, Some(p) if p.is_finite() && p > 0.0)
    }
}

/// Daily price series, strictly ascending by date
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawSeries {
    points: Vec<PricePoint>,
}

impl RawSeries {
    /// Build a series, rejecting duplicate or out-of-order dates
    pub fn new(points: Vec<PricePoint>) -> Result<Self, PipelineError> {
        if let Some(pair) = points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(PipelineError::DataUnavailable {
                provider: "raw series".to_string(),
                reason: format!(
                    "dates not strictly ascending: {} followed by {}",
                    pair[0].date, pair[1].date
                ),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// A derived value aligned to its parent row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedPoint {
    pub date: NaiveDate,
    /// Parent price on the same row
    pub price: Option<f64>,
    /// Rolling value, `None` while the window is not yet full
    pub value: Option<f64>,
}

/// Series derived from a [`RawSeries`] by a rolling computation.
///
/// Always position-aligned to a contiguous suffix of its parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedSeries {
    window: usize,
    points: Vec<DerivedPoint>,
}

impl DerivedSeries {
    pub(crate) fn from_points(window: usize, points: Vec<DerivedPoint>) -> Self {
        Self { window, points }
    }

    /// Window length the values were computed with
    pub fn window(&self) -> usize {
        self.window
    }

    pub fn points(&self) -> &[DerivedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn defined_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }

    /// True when no row carries a value (empty series included)
    pub fn is_fully_undefined(&self) -> bool {
        self.defined_count() == 0
    }

    pub fn first_value(&self) -> Option<f64> {
        self.points.first().and_then(|p| p.value)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().and_then(|p| p.value)
    }
}

/// Strided sample of the long-window series driving the heat map colours
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatMapSample {
    pub date: NaiveDate,
    pub price: Option<f64>,
    pub long_window_value: Option<f64>,
    /// Percent change vs. the previous sample, `None` for the first one
    pub pct_change: Option<f64>,
}

/// One golden-ratio multiplier line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiplierLine {
    pub factor: f64,
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

impl MultiplierLine {
    /// Legend label, e.g. `1.6 GRM`
    pub fn label(&self) -> String {
        format!("{} GRM", self.factor)
    }
}

/// Multiplier lines in factor order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MultiplierSet {
    lines: Vec<MultiplierLine>,
}

impl MultiplierSet {
    pub(crate) fn new(lines: Vec<MultiplierLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[MultiplierLine] {
        &self.lines
    }

    pub fn get(&self, factor: f64) -> Option<&MultiplierLine> {
        self.lines.iter().find(|l| l.factor == factor)
    }

    pub fn factors(&self) -> Vec<f64> {
        self.lines.iter().map(|l| l.factor).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// 24h price direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

/// One row of the top-N market ticker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketRow {
    /// Uppercase ticker
    pub symbol: String,
    pub current_price: f64,
    pub change_pct_24h: f64,
}

impl MarketRow {
    pub fn direction(&self) -> Direction {
        if self.change_pct_24h < 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

/// Top-N snapshot in provider (market-cap) order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketSnapshot {
    rows: Vec<MarketRow>,
}

impl MarketSnapshot {
    /// Default ticker capacity
    pub const CAPACITY: usize = 10;

    pub(crate) fn new(rows: Vec<MarketRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[MarketRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&MarketRow> {
        self.rows
            .iter()
            .find(|r| r.symbol.eq_ignore_ascii_case(symbol))
    }
}
