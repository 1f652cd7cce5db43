//! Pipeline error kinds

use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by the fetchers and the derived-series accessors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Network/provider failure or a payload that does not match the expected shape
    #[error("Data unavailable from {provider}: {reason}")]
    DataUnavailable { provider: String, reason: String },

    /// No run of consecutive priced rows is as long as the window
    #[error("Insufficient history for {series}: need {required} consecutive priced points, longest run is {available}")]
    InsufficientHistory {
        series: String,
        required: usize,
        available: usize,
    },

    /// Row rejected by the positive-price filter
    #[error("Invalid sample on {date}: price {price:?}")]
    InvalidSample { date: NaiveDate, price: Option<f64> },
}

impl PipelineError {
    pub fn unavailable(provider: impl Into<String>, reason: impl ToString) -> Self {
        PipelineError::DataUnavailable {
            provider: provider.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether a retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::DataUnavailable { .. })
    }
}
