//! End-to-end tests for the chart pipeline

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use btc_heatmap::analysis::params::{
        GOLDEN_RATIO_MULTIPLIERS, HEAT_MAP_PERIOD_DAYS, LONG_WINDOW_DAYS, SHORT_WINDOW_DAYS,
    };
    use btc_heatmap::analysis::{
        filter_positive, rolling_mean, sample_and_pct_change, trim_leading_undefined,
        AnalysisParams,
    };
    use btc_heatmap::feed::{parse_dataset, RawSeriesSource};
    use btc_heatmap::market::{CoinMarket, MarketListing, MarketSnapshotFetcher};
    use btc_heatmap::pipeline::{derive_series, Pipeline};
    use btc_heatmap::types::{PricePoint, RawSeries};
    use btc_heatmap::PipelineError;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    // ============================================================================
    // Stubs
    // ============================================================================

    struct StubFeed {
        series: Result<RawSeries, PipelineError>,
        calls: Arc<AtomicU32>,
    }

    impl StubFeed {
        fn ok(series: RawSeries) -> Self {
            Self {
                series: Ok(series),
                calls: Arc::new(AtomicU32::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                series: Err(PipelineError::unavailable("stub", "connection refused")),
                calls: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    #[async_trait]
    impl RawSeriesSource for StubFeed {
        fn name(&self) -> &'static str {
            "stub feed"
        }

        async fn fetch(&self) -> Result<RawSeries, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.series.clone()
        }
    }

    struct StubListing(Vec<CoinMarket>);

    #[async_trait]
    impl MarketListing for StubListing {
        fn name(&self) -> &'static str {
            "stub listing"
        }

        async fn fetch_markets(&self, limit: usize) -> Result<Vec<CoinMarket>, PipelineError> {
            Ok(self.0.iter().take(limit).cloned().collect())
        }
    }

    fn linear_series(n: usize) -> RawSeries {
        let start = NaiveDate::from_ymd_opt(2010, 8, 17).unwrap();
        RawSeries::new(
            (0..n)
                .map(|i| PricePoint::new(start + chrono::Duration::days(i as i64), 100.0 + i as f64))
                .collect(),
        )
        .unwrap()
    }

    fn coins(n: usize) -> Vec<CoinMarket> {
        (0..n)
            .map(|i| CoinMarket {
                id: format!("coin-{i}"),
                symbol: format!("sym{i}"),
                current_price: Some(100.0 / (i + 1) as f64),
                price_change_percentage_24h: Some(if i % 2 == 0 { 1.5 } else { -2.0 }),
            })
            .collect()
    }

    // ============================================================================
    // Windowing
    // ============================================================================

    #[test]
    fn test_rolling_mean_matches_slice_mean() {
        let raw = linear_series(50);
        let window = 7;
        let mean = rolling_mean(&raw, window);

        assert_eq!(mean.defined_count(), 50 - window + 1);

        let i = 20;
        let slice: Vec<f64> = raw.points()[i + 1 - window..=i]
            .iter()
            .map(|p| p.price.unwrap())
            .collect();
        let expected = slice.iter().sum::<f64>() / window as f64;
        assert!((mean.values()[i].unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_trim_then_short_window_alignment() {
        let start = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let raw = RawSeries::new(
            [10.0, 0.0, 20.0, 30.0]
                .iter()
                .enumerate()
                .map(|(i, &p)| PricePoint::new(start + chrono::Duration::days(i as i64), p))
                .collect(),
        )
        .unwrap();

        let filtered = filter_positive(&raw).kept;
        let mean = rolling_mean(&filtered, 2);
        assert_eq!(mean.values(), vec![None, Some(15.0), Some(25.0)]);

        let trimmed = trim_leading_undefined(&mean, 2);
        assert_eq!(trimmed.values(), vec![Some(15.0), Some(25.0)]);
        // the zero-price day is gone from the dates as well
        assert_eq!(
            trimmed.dates(),
            vec![start + chrono::Duration::days(2), start + chrono::Duration::days(3)]
        );
    }

    #[test]
    fn test_heat_map_end_to_end_closed_form() {
        let n = LONG_WINDOW_DAYS + HEAT_MAP_PERIOD_DAYS + 1;
        let raw = linear_series(n);
        let series = derive_series(&raw, &AnalysisParams::default());

        let daily = &series.heat_map.daily;
        assert_eq!(daily.len(), n - (LONG_WINDOW_DAYS - 1));

        // mean of 100 ..= 1499
        let first = 100.0 + (LONG_WINDOW_DAYS as f64 - 1.0) / 2.0;
        assert!((daily.first_value().unwrap() - first).abs() < 1e-9);
        assert_eq!(daily.points()[0].date, raw.points()[LONG_WINDOW_DAYS - 1].date);

        let samples = &series.heat_map.samples;
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].pct_change, None);

        let second = first + HEAT_MAP_PERIOD_DAYS as f64;
        assert!((samples[1].long_window_value.unwrap() - second).abs() < 1e-9);
        let expected_pct = (second - first) / first * 100.0;
        assert!((samples[1].pct_change.unwrap() - expected_pct).abs() < 1e-9);
    }

    #[test]
    fn test_golden_ratio_end_to_end() {
        let n = LONG_WINDOW_DAYS + 10;
        let raw = linear_series(n);
        let series = derive_series(&raw, &AnalysisParams::default());

        let baseline = &series.golden_ratio.baseline;
        assert_eq!(baseline.len(), n - (SHORT_WINDOW_DAYS - 1));
        let first = 100.0 + (SHORT_WINDOW_DAYS as f64 - 1.0) / 2.0;
        assert!((baseline.first_value().unwrap() - first).abs() < 1e-9);

        let multipliers = &series.golden_ratio.multipliers;
        assert_eq!(multipliers.factors(), GOLDEN_RATIO_MULTIPLIERS.to_vec());
        let line = multipliers.get(8.0).unwrap();
        assert_eq!(line.points.len(), baseline.len());
        assert!((line.points[0].1.unwrap() - first * 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_stride_sampling_on_trimmed_series() {
        let raw = linear_series(100);
        let daily = trim_leading_undefined(&rolling_mean(&raw, 10), 10);
        let samples = sample_and_pct_change(&daily, 28);

        // 91 rows -> indices 0, 28, 56, 84
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[3].date, daily.points()[84].date);
    }

    // ============================================================================
    // Feed payload
    // ============================================================================

    #[test]
    fn test_payload_to_series_to_chart() {
        let start = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        let rows: Vec<serde_json::Value> = (0..12)
            .rev()
            .map(|i| {
                let date = (start + chrono::Duration::days(i)).format("%Y-%m-%d").to_string();
                let price = if i == 0 {
                    serde_json::Value::Null
                } else {
                    serde_json::json!(i as f64)
                };
                serde_json::json!([date, price])
            })
            .collect();
        let body = serde_json::json!({ "dataset": { "data": rows } });

        let raw = parse_dataset(&body).unwrap();
        assert_eq!(raw.first_date(), Some(start));
        assert_eq!(raw.points()[0].price, None);

        let params = AnalysisParams {
            long_window: 4,
            short_window: 3,
            period_days: 2,
        };
        let series = derive_series(&raw, &params);
        // null on day 0 leaves the first long window undefined
        assert_eq!(series.heat_map.daily.values()[0], None);
        assert_eq!(series.heat_map.daily.values()[1], Some(2.5));
        // short path drops the null row entirely
        assert_eq!(series.short_input_len, 11);
        assert_eq!(series.golden_ratio.baseline.first_value(), Some(2.0));
    }

    // ============================================================================
    // Market snapshot
    // ============================================================================

    #[test]
    fn test_top_ten_of_fifteen() {
        let fetcher = MarketSnapshotFetcher::new(StubListing(coins(15)));
        let snapshot = tokio_test::block_on(fetcher.fetch_top_n(10)).unwrap();

        assert_eq!(snapshot.len(), 10);
        let symbols: Vec<&str> = snapshot.rows().iter().map(|r| r.symbol.as_str()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("SYM{i}")).collect();
        assert_eq!(symbols, expected);
        assert_eq!(snapshot.rows()[3].current_price, 25.0);
        assert_eq!(snapshot.rows()[3].change_pct_24h, -2.0);
    }

    // ============================================================================
    // Pipeline
    // ============================================================================

    #[test]
    fn test_pipeline_run() {
        let pipeline = Pipeline::new(
            StubFeed::ok(linear_series(LONG_WINDOW_DAYS + 60)),
            StubListing(coins(12)),
        );
        let data = tokio_test::block_on(pipeline.run()).unwrap();

        let heat_map = data.heat_map().unwrap();
        assert_eq!(heat_map.daily.len(), 61);
        assert_eq!(heat_map.samples.len(), 3);
        assert_eq!(data.golden_ratio().unwrap().multipliers.len(), 7);
        assert_eq!(data.market().len(), 10);
    }

    #[test]
    fn test_pipeline_short_history() {
        let pipeline = Pipeline::new(StubFeed::ok(linear_series(500)), StubListing(coins(3)));
        let data = tokio_test::block_on(pipeline.run()).unwrap();

        assert!(matches!(
            data.heat_map(),
            Err(PipelineError::InsufficientHistory {
                required: LONG_WINDOW_DAYS,
                available: 500,
                ..
            })
        ));
        assert_eq!(data.golden_ratio().unwrap().baseline.len(), 500 - 349);
    }

    #[tokio::test]
    async fn test_pipeline_retries_then_fails() {
        use btc_heatmap::pipeline::RetryPolicy;
        use std::time::Duration;

        let feed = StubFeed::failing();
        let calls = Arc::clone(&feed.calls);
        let pipeline = Pipeline::new(feed, StubListing(coins(3))).with_retry(RetryPolicy {
            max_retries: 2,
            initial_backoff: Duration::from_millis(1),
        });

        let result = pipeline.run().await;
        assert!(matches!(result, Err(PipelineError::DataUnavailable { .. })));
        // first attempt + two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_pipeline_without_retry_calls_feed_once() {
        let feed = StubFeed::failing();
        let calls = Arc::clone(&feed.calls);
        let pipeline = Pipeline::new(feed, StubListing(coins(3)));

        assert!(tokio_test::block_on(pipeline.run()).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pipeline_top_n_above_default_capacity() {
        let pipeline = Pipeline::new(
            StubFeed::ok(linear_series(LONG_WINDOW_DAYS + 1)),
            StubListing(coins(15)),
        )
        .with_top_n(12);
        let data = tokio_test::block_on(pipeline.run()).unwrap();

        assert_eq!(data.market().len(), 12);
        assert_eq!(data.market().rows()[11].symbol, "SYM11");
    }
}
