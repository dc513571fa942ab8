//! End-to-end pipeline test: retrieval (mocked) -> matrix builder ->
//! analytics engine, exercising the single-asset selection path.

use analytics::{AnalyticsEngine, AnalyticsError};
use async_trait::async_trait;
use chrono::NaiveDate;
use configuration::settings::DataConfig;
use core_types::{
    BENCHMARK_SYMBOL, PORTFOLIO_SYMBOL, PricePoint, PriceSeries, RetrievalResult,
};
use market_data::{MarketDataClient, MarketDataError};
use matrix_builder::{BuildError, MatrixBuilder};
use rust_decimal_macros::dec;

struct StubClient {
    assets: RetrievalResult,
    benchmark: Option<PriceSeries>,
}

#[async_trait]
impl MarketDataClient for StubClient {
    async fn fetch_adjusted_close(
        &self,
        _symbols: &[String],
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<RetrievalResult, MarketDataError> {
        Ok(self.assets.clone())
    }

    async fn fetch_benchmark(
        &self,
        _symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Option<PriceSeries>, MarketDataError> {
        Ok(self.benchmark.clone())
    }
}

fn config() -> DataConfig {
    DataConfig {
        benchmark_source_symbol: "^BVSP".to_string(),
        ticker_suffix: ".SA".to_string(),
        tickers_file: "tickers_ibra.csv".to_string(),
        endpoint: "http://localhost".to_string(),
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
}

fn series(symbol: &str, prices: &[(u32, rust_decimal::Decimal)]) -> PriceSeries {
    PriceSeries::new(
        symbol,
        prices
            .iter()
            .map(|&(day, price)| PricePoint { date: date(day), adj_close: Some(price) })
            .collect(),
    )
    .unwrap()
}

#[tokio::test]
async fn single_asset_selection_flows_through_the_whole_pipeline() {
    let client = StubClient {
        assets: RetrievalResult::Single(series(
            "WEGE3.SA",
            &[(2, dec!(50)), (3, dec!(55)), (4, dec!(60))],
        )),
        benchmark: Some(series(
            "^BVSP",
            &[(2, dec!(110000)), (3, dec!(111000)), (4, dec!(112000))],
        )),
    };
    let builder = MatrixBuilder::new(Box::new(client), config());

    let matrix = builder
        .build(&["WEGE3".to_string()], date(2), date(31))
        .await
        .unwrap();
    let report = AnalyticsEngine::new().analyze(&matrix).unwrap();

    // Asset, benchmark, and portfolio columns, one metrics row each.
    assert_eq!(report.normalized.num_columns(), 3);
    assert_eq!(report.metrics.len(), 3);

    let asset = report.normalized.column("WEGE3").unwrap();
    assert_eq!(
        asset.values,
        vec![Some(dec!(100)), Some(dec!(110)), Some(dec!(120))]
    );

    // A one-asset portfolio is the asset itself.
    let portfolio = report.normalized.column(PORTFOLIO_SYMBOL).unwrap();
    assert_eq!(portfolio.values, asset.values);

    let asset_metrics = report
        .metrics
        .iter()
        .find(|m| m.instrument.symbol == "WEGE3")
        .unwrap();
    assert_eq!(asset_metrics.total_return, dec!(0.20));

    assert!(report.normalized.column(BENCHMARK_SYMBOL).is_some());
}

#[tokio::test]
async fn benchmark_outage_still_yields_asset_metrics() {
    // The benchmark source returns nothing; the builder keeps an all-gap
    // IBOV column so the matrix shape is stable.
    let client = StubClient {
        assets: RetrievalResult::Single(series(
            "WEGE3.SA",
            &[(2, dec!(50)), (3, dec!(55)), (4, dec!(60))],
        )),
        benchmark: None,
    };
    let builder = MatrixBuilder::new(Box::new(client), config());
    let matrix = builder
        .build(&["WEGE3".to_string()], date(2), date(31))
        .await
        .unwrap();

    // Analyzed as-is, the all-gap benchmark column cannot be normalized.
    let engine = AnalyticsEngine::new();
    let strict = engine.analyze(&matrix);
    assert!(matches!(
        strict,
        Err(AnalyticsError::DegenerateSeries(ref s)) if s == BENCHMARK_SYMBOL
    ));

    // Dropping the dead column recovers the asset analytics, which is what
    // the CLI does on a benchmark outage.
    let report = engine
        .analyze(&matrix.without_column(BENCHMARK_SYMBOL))
        .unwrap();
    assert!(report.normalized.column(BENCHMARK_SYMBOL).is_none());
    assert_eq!(report.metrics.len(), 2);

    let asset_metrics = report
        .metrics
        .iter()
        .find(|m| m.instrument.symbol == "WEGE3")
        .unwrap();
    assert_eq!(asset_metrics.total_return, dec!(0.20));
    assert!(report.normalized.column(PORTFOLIO_SYMBOL).is_some());
}

#[tokio::test]
async fn empty_retrieval_stops_before_the_engine() {
    let client = StubClient { assets: RetrievalResult::Empty, benchmark: None };
    let builder = MatrixBuilder::new(Box::new(client), config());

    let result = builder
        .build(&["XXXX9".to_string()], date(2), date(31))
        .await;
    assert!(matches!(result, Err(BuildError::NoData)));
}
