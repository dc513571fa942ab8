use crate::responses::{ChartResponse, ChartResult};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use configuration::settings::DataConfig;
use core_types::{PricePoint, PriceSeries, RetrievalResult};
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

pub mod error;
pub mod responses;

// --- Public API ---
pub use error::MarketDataError;

/// The generic, abstract interface for an adjusted-close data provider.
/// This trait is the contract the matrix builder works against, allowing
/// the underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetches the daily adjusted-close series for a set of symbols.
    ///
    /// An empty outcome is not an error at this layer: a range with no
    /// market days yields `RetrievalResult::Empty`. A single requested
    /// symbol yields `RetrievalResult::Single`, mirroring providers that
    /// return an unlabeled series instead of a table in that case.
    async fn fetch_adjusted_close(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RetrievalResult, MarketDataError>;

    /// Fetches the benchmark index series for a single provider symbol.
    async fn fetch_benchmark(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<PriceSeries>, MarketDataError>;
}

/// A concrete `MarketDataClient` for the Yahoo Finance v8 chart endpoint,
/// the same source the original dashboard pulled adjusted closes from.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(config: &DataConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                // The chart endpoint rejects requests without a UA.
                .user_agent("Mozilla/5.0 (compatible; carteira/0.1)")
                .build()
                .expect("Failed to build reqwest client"),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches one symbol's daily chart and converts it into a labeled
    /// `PriceSeries`. `Ok(None)` means the provider had no rows in range.
    async fn fetch_chart(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<PriceSeries>, MarketDataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        // period2 is exclusive at second granularity; extend by one day so
        // the end date itself is included.
        let period1 = start
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| MarketDataError::InvalidData(format!("invalid start date {start}")))?
            .and_utc()
            .timestamp();
        let period2 = end
            .succ_opt()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| MarketDataError::InvalidData(format!("invalid end date {end}")))?
            .and_utc()
            .timestamp();

        let period1 = period1.to_string();
        let period2 = period2.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "div,splits"),
            ])
            .send()
            .await?
            .json::<ChartResponse>()
            .await?;

        if let Some(err) = response.chart.error {
            return Err(MarketDataError::Provider(format!(
                "{}: {}",
                err.code, err.description
            )));
        }

        let result = match response.chart.result.and_then(|mut r| {
            if r.is_empty() { None } else { Some(r.remove(0)) }
        }) {
            Some(result) => result,
            None => return Ok(None),
        };

        series_from_chart(symbol, result)
    }
}

/// Converts one chart result into a `PriceSeries`, collapsing intraday
/// timestamps onto their trading date. The provider occasionally repeats
/// the current day's bar; only the first observation per date is kept.
fn series_from_chart(
    symbol: &str,
    result: ChartResult,
) -> Result<Option<PriceSeries>, MarketDataError> {
    let adjcloses = match result.indicators.adjclose.first() {
        Some(block) => &block.adjclose,
        None => return Ok(None),
    };

    let mut points: Vec<PricePoint> = Vec::with_capacity(result.timestamp.len());
    for (ts, raw) in result.timestamp.iter().zip(adjcloses.iter()) {
        let date = Utc
            .timestamp_opt(*ts, 0)
            .single()
            .ok_or_else(|| MarketDataError::InvalidData(format!("invalid timestamp {ts}")))?
            .date_naive();

        if points.last().is_some_and(|p: &PricePoint| p.date == date) {
            continue;
        }

        let adj_close = match raw {
            Some(value) => Some(Decimal::from_f64(*value).ok_or_else(|| {
                MarketDataError::InvalidData(format!("unrepresentable price {value} for {symbol}"))
            })?),
            None => None,
        };

        points.push(PricePoint { date, adj_close });
    }

    if points.is_empty() {
        return Ok(None);
    }

    PriceSeries::new(symbol, points)
        .map(Some)
        .map_err(|e| MarketDataError::InvalidData(e.to_string()))
}

#[async_trait]
impl MarketDataClient for YahooClient {
    async fn fetch_adjusted_close(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RetrievalResult, MarketDataError> {
        let requests = symbols.iter().map(|s| self.fetch_chart(s, start, end));
        let outcomes = join_all(requests).await;

        let mut table: Vec<PriceSeries> = Vec::with_capacity(symbols.len());
        for (symbol, outcome) in symbols.iter().zip(outcomes) {
            match outcome {
                Ok(Some(series)) => table.push(series),
                Ok(None) => {
                    tracing::warn!(%symbol, "no chart rows in the requested range");
                }
                Err(e) => {
                    // A failing symbol must not sink the whole selection.
                    tracing::warn!(%symbol, error = %e, "skipping symbol after fetch failure");
                }
            }
        }

        if table.is_empty() {
            return Ok(RetrievalResult::Empty);
        }

        if symbols.len() == 1 {
            // A single-symbol request comes back as a bare series, not a
            // table; the matrix builder relabels and tabulates it.
            return Ok(RetrievalResult::Single(table.remove(0)));
        }

        Ok(RetrievalResult::Multiple(table))
    }

    async fn fetch_benchmark(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<PriceSeries>, MarketDataError> {
        self.fetch_chart(symbol, start, end).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn chart_result(json: &str) -> ChartResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn chart_converts_to_labeled_series() {
        // 2023-01-02 and 2023-01-03, one null hole on the second day.
        let result = chart_result(
            r#"{
                "timestamp": [1672660800, 1672747200],
                "indicators": {"adjclose": [{"adjclose": [30.5, null]}]}
            }"#,
        );

        let series = series_from_chart("PETR4.SA", result).unwrap().unwrap();
        assert_eq!(series.symbol, "PETR4.SA");
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].adj_close, Some(dec!(30.5)));
        assert_eq!(series.points[1].adj_close, None);
    }

    #[test]
    fn repeated_trading_date_keeps_first_observation() {
        // Two bars on the same date (live bar repeated at close).
        let result = chart_result(
            r#"{
                "timestamp": [1672660800, 1672675200],
                "indicators": {"adjclose": [{"adjclose": [30.5, 30.9]}]}
            }"#,
        );

        let series = series_from_chart("PETR4.SA", result).unwrap().unwrap();
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].adj_close, Some(dec!(30.5)));
    }

    #[test]
    fn chart_without_adjclose_block_is_empty() {
        let result = chart_result(r#"{"timestamp": [], "indicators": {"adjclose": []}}"#);
        assert!(series_from_chart("PETR4.SA", result).unwrap().is_none());
    }

    #[test]
    fn error_envelope_deserializes() {
        let response: ChartResponse = serde_json::from_str(
            r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}}"#,
        )
        .unwrap();
        assert!(response.chart.error.is_some());
    }
}
