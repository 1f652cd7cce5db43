//! Quandl dataset client
//!
//! The payload nests the rows under `dataset.data` as
//! `[["2021-08-06", 42816.5], ...]`, newest first.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::FeedConfig;
use crate::error::PipelineError;
use crate::feed::RawSeriesSource;
use crate::types::{PricePoint, RawSeries};

const SOURCE_NAME: &str = "Quandl";

#[derive(Debug, Deserialize)]
struct DatasetResponse {
    dataset: Dataset,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(default)]
    dataset_code: Option<String>,
    data: Vec<(String, Value)>,
}

/// Client for the Quandl time-series API
pub struct QuandlClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl QuandlClient {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            url: config.url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        }
    }

    async fn fetch_body(&self) -> Result<Value, PipelineError> {
        let mut request = self.client.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::unavailable(SOURCE_NAME, e))?;

        if !response.status().is_success() {
            return Err(PipelineError::unavailable(
                SOURCE_NAME,
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| PipelineError::unavailable(SOURCE_NAME, e))
    }
}

#[async_trait]
impl RawSeriesSource for QuandlClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self) -> Result<RawSeries, PipelineError> {
        info!(source = %SOURCE_NAME, url = %self.url, "Fetching daily price history...");

        let body = self.fetch_body().await?;
        let series = parse_dataset(&body)?;

        info!(
            source = %SOURCE_NAME,
            points = series.len(),
            first = ?series.first_date(),
            last = ?series.last_date(),
            "Fetched daily price history"
        );
        Ok(series)
    }
}

/// Normalise a dataset payload into an ascending series
pub fn parse_dataset(body: &Value) -> Result<RawSeries, PipelineError> {
    let response: DatasetResponse = serde_json::from_value(body.clone())
        .map_err(|e| PipelineError::unavailable(SOURCE_NAME, format!("unexpected payload: {e}")))?;

    debug!(
        dataset = response.dataset.dataset_code.as_deref().unwrap_or("?"),
        rows = response.dataset.data.len(),
        "Parsing dataset"
    );

    let mut points = response
        .dataset
        .data
        .iter()
        .map(|(date, price)| -> Result<PricePoint, PipelineError> {
            let date = parse_date(date).ok_or_else(|| {
                PipelineError::unavailable(SOURCE_NAME, format!("invalid date {date:?}"))
            })?;
            Ok(PricePoint {
                date,
                price: coerce_price(price),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if first.date > last.date {
            points.reverse();
        }
    }

    RawSeries::new(points).map_err(|e| match e {
        PipelineError::DataUnavailable { reason, .. } => {
            PipelineError::unavailable(SOURCE_NAME, reason)
        }
        other => other,
    })
}

/// `YYYY-MM-DD`, optionally followed by a time part
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

fn coerce_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|p| p.is_finite())
}
