use crate::error::AnalyticsError;
use crate::report::{AnalyticsReport, InstrumentMetrics};
use core_types::{Instrument, PORTFOLIO_SYMBOL, PriceColumn, PriceMatrix};
use rust_decimal::{Decimal, MathematicalOps};

/// The trading-day annualization constant. A domain convention for daily
/// series, not a configuration knob.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// A stateless calculator for deriving performance metrics from a price
/// matrix.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for deriving the display metrics.
    ///
    /// Synthesizes the equal-weight portfolio column, normalizes every
    /// column to a base of 100, and computes per-column total return,
    /// annualized volatility, and the risk/reward ratio. The input matrix
    /// is not mutated; each invocation recomputes everything.
    pub fn analyze(&self, matrix: &PriceMatrix) -> Result<AnalyticsReport, AnalyticsError> {
        if matrix.num_rows() == 0 {
            return Err(AnalyticsError::NotEnoughData(
                "the price matrix has no rows".to_string(),
            ));
        }
        if matrix.has_portfolio() {
            return Err(AnalyticsError::PortfolioAlreadyPresent);
        }

        let mut matrix = matrix.clone();
        self.synthesize_portfolio(&mut matrix)?;
        let normalized = self.normalize(&matrix)?;

        let annualization = Decimal::from(TRADING_DAYS_PER_YEAR).sqrt().ok_or_else(|| {
            AnalyticsError::Calculation("failed to take the annualization square root".to_string())
        })?;

        let mut metrics = Vec::with_capacity(matrix.num_columns());
        for (column, normalized_column) in matrix.columns().iter().zip(normalized.columns()) {
            let returns = return_series(&column.values);
            let annualized_volatility = sample_std_dev(&returns).map(|sd| sd * annualization);
            let total_return = total_return(normalized_column)?;

            // Zero volatility leaves the ratio undefined; `None`, not NaN.
            let risk_reward = match annualized_volatility {
                Some(vol) if !vol.is_zero() => Some(total_return / vol),
                _ => None,
            };

            metrics.push(InstrumentMetrics {
                instrument: column.instrument.clone(),
                total_return,
                annualized_volatility,
                risk_reward,
            });
        }

        Ok(AnalyticsReport { normalized, metrics })
    }

    /// Appends the equal-weight portfolio column: weight `1/n` over the
    /// asset columns, the benchmark excluded from the weighting set. A
    /// row where any held asset has a gap leaves the portfolio undefined
    /// for that row.
    fn synthesize_portfolio(&self, matrix: &mut PriceMatrix) -> Result<(), AnalyticsError> {
        let asset_columns: Vec<&PriceColumn> = matrix.asset_columns().collect();
        if asset_columns.is_empty() {
            return Err(AnalyticsError::NotEnoughData(
                "the matrix has no asset columns to weight".to_string(),
            ));
        }
        let weight = Decimal::ONE / Decimal::from(asset_columns.len() as u64);

        let values: Vec<Option<Decimal>> = (0..matrix.num_rows())
            .map(|row| {
                let mut total = Decimal::ZERO;
                for column in &asset_columns {
                    total += weight * column.values[row]?;
                }
                Some(total)
            })
            .collect();

        matrix
            .append_portfolio(Instrument::portfolio(PORTFOLIO_SYMBOL), values)
            .map_err(|e| AnalyticsError::Calculation(e.to_string()))
    }

    /// Rescales every column so its first row is exactly 100.
    fn normalize(&self, matrix: &PriceMatrix) -> Result<PriceMatrix, AnalyticsError> {
        let mut columns = Vec::with_capacity(matrix.num_columns());
        for column in matrix.columns() {
            let first = column
                .values
                .first()
                .copied()
                .flatten()
                .filter(|price| !price.is_zero())
                .ok_or_else(|| {
                    AnalyticsError::DegenerateSeries(column.instrument.symbol.clone())
                })?;

            let values = column
                .values
                .iter()
                .map(|value| value.map(|price| Decimal::ONE_HUNDRED * price / first))
                .collect();

            columns.push(PriceColumn { instrument: column.instrument.clone(), values });
        }

        matrix
            .derive(columns)
            .map_err(|e| AnalyticsError::Calculation(e.to_string()))
    }
}

/// Simple period-over-period percentage change: `N-1` entries for an
/// `N`-row column. A cell is `None` when either endpoint is missing or
/// the prior price is zero; gaps never count as zero returns.
fn return_series(values: &[Option<Decimal>]) -> Vec<Option<Decimal>> {
    values
        .windows(2)
        .map(|window| match (window[0], window[1]) {
            (Some(prev), Some(cur)) if !prev.is_zero() => Some(cur / prev - Decimal::ONE),
            _ => None,
        })
        .collect()
}

/// Sample (n-1 denominator) standard deviation over the non-missing
/// returns. `None` with fewer than two observations, which also covers a
/// single-row matrix deterministically.
fn sample_std_dev(returns: &[Option<Decimal>]) -> Option<Decimal> {
    let observed: Vec<Decimal> = returns.iter().copied().flatten().collect();
    if observed.len() < 2 {
        return None;
    }

    let n = Decimal::from(observed.len() as u64);
    let mean = observed.iter().sum::<Decimal>() / n;
    let variance = observed
        .iter()
        .map(|r| (*r - mean) * (*r - mean))
        .sum::<Decimal>()
        / (n - Decimal::ONE);

    variance.sqrt()
}

/// Cumulative return from the first to the last available observation of
/// a normalized column, as a fraction.
fn total_return(normalized: &PriceColumn) -> Result<Decimal, AnalyticsError> {
    let last = normalized
        .values
        .iter()
        .rev()
        .find_map(|value| *value)
        .ok_or_else(|| {
            AnalyticsError::Calculation(format!(
                "normalized column '{}' has no observations",
                normalized.instrument.symbol
            ))
        })?;

    Ok((last - Decimal::ONE_HUNDRED) / Decimal::ONE_HUNDRED)
}
