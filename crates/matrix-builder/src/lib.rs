//! # Price Matrix Builder
//!
//! Turns a ticker selection and a date range into a date-aligned
//! `PriceMatrix` with the benchmark column attached. This crate owns the
//! messy edges of retrieval: suffix-decorated symbols, the single-series
//! shape some providers return for one-ticker requests, and ranges with
//! no market days at all.
//!
//! Every retrieval failure surfaces as [`BuildError::NoData`]; the
//! underlying cause is logged, never propagated. No data is a normal,
//! displayable outcome of a selection, not a fault of the process.

use chrono::NaiveDate;
use configuration::settings::DataConfig;
use core_types::{
    BENCHMARK_SYMBOL, Instrument, PORTFOLIO_SYMBOL, PriceColumn, PriceMatrix, PriceSeries,
    RetrievalResult,
};
use market_data::MarketDataClient;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

pub mod error;

pub use error::BuildError;

/// Builds date-aligned price matrices from a retrieval client.
///
/// The client is held as a trait object so tests can substitute a mock
/// for the live provider.
pub struct MatrixBuilder {
    client: Box<dyn MarketDataClient>,
    config: DataConfig,
}

impl MatrixBuilder {
    pub fn new(client: Box<dyn MarketDataClient>, config: DataConfig) -> Self {
        Self { client, config }
    }

    /// Retrieves and aligns the selection into a `PriceMatrix`.
    ///
    /// Rows are the union of the assets' trading dates; gaps stay `None`
    /// and are never forward-filled. The benchmark column is always
    /// present in the result, all-gaps if its retrieval failed.
    pub async fn build(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceMatrix, BuildError> {
        if tickers.is_empty() {
            return Err(BuildError::EmptySelection);
        }
        if start > end {
            return Err(BuildError::InvalidRange { start, end });
        }

        let bare: Vec<String> = tickers
            .iter()
            .map(|t| self.bare_symbol(t).to_string())
            .collect();
        for (i, symbol) in bare.iter().enumerate() {
            if symbol == BENCHMARK_SYMBOL || symbol == PORTFOLIO_SYMBOL {
                return Err(BuildError::ReservedSymbol(symbol.clone()));
            }
            if bare[..i].contains(symbol) {
                return Err(BuildError::DuplicateSymbol(symbol.clone()));
            }
        }

        let provider_symbols: Vec<String> = bare
            .iter()
            .map(|s| format!("{}{}", s, self.config.ticker_suffix))
            .collect();

        let retrieved = match self
            .client
            .fetch_adjusted_close(&provider_symbols, start, end)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "asset retrieval failed");
                return Err(BuildError::NoData);
            }
        };
        if retrieved.is_empty() {
            return Err(BuildError::NoData);
        }

        let assets = self.normalize_result(retrieved, &bare);
        if assets.is_empty() {
            return Err(BuildError::NoData);
        }

        // Row index: the union of the assets' trading dates, ascending.
        let index: Vec<NaiveDate> = assets
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut columns: Vec<PriceColumn> = assets
            .iter()
            .map(|series| PriceColumn {
                instrument: Instrument::asset(series.symbol.as_str()),
                values: aligned_values(series, &index),
            })
            .collect();

        columns.push(PriceColumn {
            instrument: Instrument::benchmark(BENCHMARK_SYMBOL),
            values: self.fetch_benchmark_values(&index, start, end).await,
        });

        Ok(PriceMatrix::new(index, columns)?)
    }

    /// Fetches the benchmark and aligns it to the asset date index.
    /// Benchmark dates outside the index are dropped. A failed or empty
    /// benchmark retrieval degrades to an all-gap column so the matrix
    /// shape stays stable for downstream consumers.
    async fn fetch_benchmark_values(
        &self,
        index: &[NaiveDate],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<Option<Decimal>> {
        let symbol = self.config.benchmark_source_symbol.as_str();
        match self.client.fetch_benchmark(symbol, start, end).await {
            Ok(Some(series)) => aligned_values(&series, index),
            Ok(None) => {
                tracing::warn!(symbol, "benchmark returned no data in range");
                vec![None; index.len()]
            }
            Err(e) => {
                tracing::warn!(symbol, error = %e, "benchmark retrieval failed");
                vec![None; index.len()]
            }
        }
    }

    /// Normalizes the tagged retrieval result into a list of series with
    /// bare (suffix-free) labels. A single-ticker selection relabels the
    /// sole series with that ticker's bare symbol regardless of how the
    /// provider decorated it.
    fn normalize_result(&self, retrieved: RetrievalResult, bare: &[String]) -> Vec<PriceSeries> {
        match retrieved {
            RetrievalResult::Single(series) => {
                let symbol = if bare.len() == 1 {
                    bare[0].clone()
                } else {
                    self.bare_symbol(&series.symbol).to_string()
                };
                vec![series.with_symbol(symbol)]
            }
            RetrievalResult::Multiple(table) => table
                .into_iter()
                .filter(|series| !series.points.is_empty())
                .map(|series| {
                    let symbol = self.bare_symbol(&series.symbol).to_string();
                    series.with_symbol(symbol)
                })
                .collect(),
            RetrievalResult::Empty => Vec::new(),
        }
    }

    fn bare_symbol<'a>(&self, ticker: &'a str) -> &'a str {
        let trimmed = ticker.trim();
        trimmed
            .strip_suffix(self.config.ticker_suffix.as_str())
            .unwrap_or(trimmed)
    }
}

/// Projects one series onto the row index; dates the series does not
/// cover become gaps.
fn aligned_values(series: &PriceSeries, index: &[NaiveDate]) -> Vec<Option<Decimal>> {
    let by_date: BTreeMap<NaiveDate, Option<Decimal>> = series
        .points
        .iter()
        .map(|p| (p.date, p.adj_close))
        .collect();
    index.iter().map(|d| by_date.get(d).copied().flatten()).collect()
}
