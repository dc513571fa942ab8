use core_types::{Instrument, PriceMatrix};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The derived metrics for one matrix column (asset, benchmark, or the
/// synthetic portfolio). Return values are fractions (0.12 = 12%); the
/// presentation layer formats them as percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentMetrics {
    pub instrument: Instrument,
    /// Cumulative return from the first to the last available observation.
    pub total_return: Decimal,
    /// Sample standard deviation of the simple returns, scaled by √252.
    /// `None` when fewer than two return observations exist.
    pub annualized_volatility: Option<Decimal>,
    /// `total_return / annualized_volatility`, a coloring/ranking signal.
    /// `None` when the volatility is undefined or zero.
    pub risk_reward: Option<Decimal>,
}

/// The full output of the analytics engine.
///
/// This struct is the data transfer object for derived results: the
/// normalized matrix feeds time-series charts, the metrics rows feed
/// cards and the risk/return scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Same shape as the input matrix with the portfolio column appended,
    /// every column rescaled so its first row is exactly 100.
    pub normalized: PriceMatrix,
    /// One row per matrix column, portfolio included, in column order.
    pub metrics: Vec<InstrumentMetrics>,
}
