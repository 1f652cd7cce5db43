//! Host process: build every chart series once and report what was produced.

use anyhow::{Context, Result};
use tracing::{error, info};

use btc_heatmap::analysis::ColorScale;
use btc_heatmap::config::AppConfig;
use btc_heatmap::feed::QuandlClient;
use btc_heatmap::market::CoinGeckoClient;
use btc_heatmap::pipeline::{ChartData, Pipeline, RetryPolicy};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    btc_heatmap::logging::init(&config.logging)?;

    info!(config = %config, "Starting btc-heatmap v{}", env!("CARGO_PKG_VERSION"));

    let pipeline = Pipeline::new(
        QuandlClient::new(&config.feed),
        CoinGeckoClient::new(&config.market),
    )
    .with_top_n(config.market.top_n)
    .with_retry(RetryPolicy::from(&config.retry));

    let data = match pipeline.run().await {
        Ok(data) => data,
        Err(e) => {
            error!(error = %e, "Chart data unavailable");
            return Err(e).context("Pipeline failed");
        }
    };

    report(&data);
    Ok(())
}

fn report(data: &ChartData) {
    let scale = ColorScale::default();

    match data.heat_map() {
        Ok(chart) => {
            let latest = chart.samples.last();
            info!(
                rows = chart.daily.len(),
                samples = chart.samples.len(),
                latest_date = ?latest.map(|s| s.date),
                latest_pct_change = ?latest.and_then(|s| s.pct_change),
                latest_color = ?latest.and_then(|s| s.color_level(&scale)),
                "200WMA heat map ready"
            );
        }
        Err(e) => error!(error = %e, "200WMA heat map cannot be rendered"),
    }

    match data.golden_ratio() {
        Ok(chart) => info!(
            rows = chart.baseline.len(),
            lines = chart.multipliers.len(),
            latest_350dma = ?chart.baseline.last_value(),
            "Golden ratio multiplier ready"
        ),
        Err(e) => error!(error = %e, "Golden ratio multiplier cannot be rendered"),
    }

    for row in data.market().rows() {
        info!(
            symbol = %row.symbol,
            price = row.current_price,
            change_24h = row.change_pct_24h,
            direction = %row.direction(),
            "Ticker"
        );
    }
}
