use crate::enums::InstrumentKind;
use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A symbol together with the role it plays in the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub kind: InstrumentKind,
}

impl Instrument {
    pub fn asset(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into(), kind: InstrumentKind::Asset }
    }

    pub fn benchmark(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into(), kind: InstrumentKind::Benchmark }
    }

    pub fn portfolio(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into(), kind: InstrumentKind::Portfolio }
    }
}

/// One observation of an adjusted close.
///
/// `adj_close` is `None` on dates where the instrument did not trade even
/// though other instruments in the same selection did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adj_close: Option<Decimal>,
}

/// An ordered adjusted-close series for a single symbol.
///
/// The constructor is the only way to build one, so every `PriceSeries`
/// in the system is guaranteed to have strictly increasing dates and
/// non-negative prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validates and builds a series.
    ///
    /// Rejects duplicate or out-of-order dates and negative prices with
    /// `CoreError::InvalidInput`.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, CoreError> {
        let symbol = symbol.into();

        for window in points.windows(2) {
            if window[1].date <= window[0].date {
                return Err(CoreError::InvalidInput(
                    symbol.clone(),
                    format!(
                        "dates must be strictly increasing, got {} after {}",
                        window[1].date, window[0].date
                    ),
                ));
            }
        }

        if let Some(point) = points
            .iter()
            .find(|p| p.adj_close.is_some_and(|price| price < Decimal::ZERO))
        {
            return Err(CoreError::InvalidInput(
                symbol.clone(),
                format!("negative adjusted close on {}", point.date),
            ));
        }

        Ok(Self { symbol, points })
    }

    /// Returns the same series under a different symbol. Used by the
    /// matrix builder to replace provider-decorated labels with bare ones.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }
}

/// One aligned column of a `PriceMatrix`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceColumn {
    pub instrument: Instrument,
    /// One value per matrix row; `None` marks a gap for this instrument.
    pub values: Vec<Option<Decimal>>,
}

/// A date-aligned table of adjusted closes: one row per trading date in
/// the selection, one column per instrument (benchmark included).
///
/// The portfolio column does not exist at construction time; the
/// analytics engine appends it exactly once via [`PriceMatrix::append_portfolio`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMatrix {
    dates: Vec<NaiveDate>,
    columns: Vec<PriceColumn>,
}

impl PriceMatrix {
    /// Validates and builds a matrix.
    ///
    /// Every column must have exactly one value per date, symbols must be
    /// unique, and at most one benchmark column is allowed. A portfolio
    /// column is rejected outright: it is derived, never constructed.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<PriceColumn>) -> Result<Self, CoreError> {
        for window in dates.windows(2) {
            if window[1] <= window[0] {
                return Err(CoreError::InvalidInput(
                    "PriceMatrix".to_string(),
                    "row dates must be strictly increasing".to_string(),
                ));
            }
        }

        for column in &columns {
            if column.values.len() != dates.len() {
                return Err(CoreError::InvalidInput(
                    column.instrument.symbol.clone(),
                    format!(
                        "column has {} values for {} rows",
                        column.values.len(),
                        dates.len()
                    ),
                ));
            }
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i]
                .iter()
                .any(|other| other.instrument.symbol == column.instrument.symbol)
            {
                return Err(CoreError::InvalidInput(
                    column.instrument.symbol.clone(),
                    "duplicate column symbol".to_string(),
                ));
            }
        }

        if columns
            .iter()
            .filter(|c| c.instrument.kind == InstrumentKind::Benchmark)
            .count()
            > 1
        {
            return Err(CoreError::InvalidInput(
                "PriceMatrix".to_string(),
                "more than one benchmark column".to_string(),
            ));
        }

        if columns
            .iter()
            .any(|c| c.instrument.kind == InstrumentKind::Portfolio)
        {
            return Err(CoreError::InvalidInput(
                "PriceMatrix".to_string(),
                "portfolio columns are derived and cannot be constructed".to_string(),
            ));
        }

        Ok(Self { dates, columns })
    }

    /// Builds a derived matrix over the same row index, e.g. a normalized
    /// rescaling of this one. Unlike [`PriceMatrix::new`], a portfolio
    /// column is allowed here: derived matrices are produced after
    /// portfolio synthesis.
    pub fn derive(&self, columns: Vec<PriceColumn>) -> Result<PriceMatrix, CoreError> {
        for column in &columns {
            if column.values.len() != self.dates.len() {
                return Err(CoreError::InvalidInput(
                    column.instrument.symbol.clone(),
                    format!(
                        "derived column has {} values for {} rows",
                        column.values.len(),
                        self.dates.len()
                    ),
                ));
            }
        }

        Ok(PriceMatrix { dates: self.dates.clone(), columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[PriceColumn] {
        &self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, symbol: &str) -> Option<&PriceColumn> {
        self.columns.iter().find(|c| c.instrument.symbol == symbol)
    }

    /// Iterates over the asset columns only, in insertion order. This is
    /// the weighting set for portfolio synthesis.
    pub fn asset_columns(&self) -> impl Iterator<Item = &PriceColumn> {
        self.columns.iter().filter(|c| c.instrument.kind.is_weighted())
    }

    pub fn has_portfolio(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.instrument.kind == InstrumentKind::Portfolio)
    }

    /// Returns a copy of the matrix without the named column, leaving the
    /// row index untouched. This is the recovery path for callers that
    /// drop a degenerate column (e.g., a benchmark that returned no data)
    /// instead of abandoning the whole analysis.
    pub fn without_column(&self, symbol: &str) -> PriceMatrix {
        PriceMatrix {
            dates: self.dates.clone(),
            columns: self
                .columns
                .iter()
                .filter(|c| c.instrument.symbol != symbol)
                .cloned()
                .collect(),
        }
    }

    /// Appends the derived portfolio column.
    ///
    /// Fails if a portfolio column is already present (the addition must
    /// happen exactly once) or if the value count does not match the rows.
    pub fn append_portfolio(
        &mut self,
        instrument: Instrument,
        values: Vec<Option<Decimal>>,
    ) -> Result<(), CoreError> {
        if instrument.kind != InstrumentKind::Portfolio {
            return Err(CoreError::InvalidInput(
                instrument.symbol,
                "appended column must be of portfolio kind".to_string(),
            ));
        }
        if self.has_portfolio() {
            return Err(CoreError::InvalidInput(
                instrument.symbol,
                "portfolio column already present".to_string(),
            ));
        }
        if values.len() != self.dates.len() {
            return Err(CoreError::InvalidInput(
                instrument.symbol,
                format!("{} values for {} rows", values.len(), self.dates.len()),
            ));
        }

        self.columns.push(PriceColumn { instrument, values });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
    }

    fn point(day: u32, price: Decimal) -> PricePoint {
        PricePoint { date: date(day), adj_close: Some(price) }
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let result = PriceSeries::new(
            "PETR4",
            vec![point(2, dec!(10)), point(2, dec!(11))],
        );
        assert!(matches!(result, Err(CoreError::InvalidInput(_, _))));
    }

    #[test]
    fn series_rejects_negative_prices() {
        let result = PriceSeries::new("PETR4", vec![point(2, dec!(-1))]);
        assert!(matches!(result, Err(CoreError::InvalidInput(_, _))));
    }

    #[test]
    fn series_tolerates_gaps() {
        let series = PriceSeries::new(
            "PETR4",
            vec![
                point(2, dec!(10)),
                PricePoint { date: date(3), adj_close: None },
                point(4, dec!(11)),
            ],
        )
        .unwrap();
        assert_eq!(series.points.len(), 3);
    }

    #[test]
    fn matrix_rejects_ragged_columns() {
        let result = PriceMatrix::new(
            vec![date(2), date(3)],
            vec![PriceColumn {
                instrument: Instrument::asset("PETR4"),
                values: vec![Some(dec!(10))],
            }],
        );
        assert!(result.is_err());
    }

    #[test]
    fn matrix_rejects_constructed_portfolio_column() {
        let result = PriceMatrix::new(
            vec![date(2)],
            vec![PriceColumn {
                instrument: Instrument::portfolio("portfolio"),
                values: vec![Some(dec!(10))],
            }],
        );
        assert!(result.is_err());
    }

    #[test]
    fn without_column_drops_only_the_named_column() {
        let matrix = PriceMatrix::new(
            vec![date(2), date(3)],
            vec![
                PriceColumn {
                    instrument: Instrument::asset("PETR4"),
                    values: vec![Some(dec!(10)), Some(dec!(11))],
                },
                PriceColumn {
                    instrument: Instrument::benchmark("IBOV"),
                    values: vec![None, None],
                },
            ],
        )
        .unwrap();

        let trimmed = matrix.without_column("IBOV");
        assert_eq!(trimmed.num_columns(), 1);
        assert_eq!(trimmed.num_rows(), 2);
        assert!(trimmed.column("IBOV").is_none());
        assert!(trimmed.column("PETR4").is_some());

        // An absent symbol leaves the matrix unchanged.
        let unchanged = matrix.without_column("VALE3");
        assert_eq!(unchanged.num_columns(), 2);
    }

    #[test]
    fn portfolio_can_only_be_appended_once() {
        let mut matrix = PriceMatrix::new(
            vec![date(2), date(3)],
            vec![PriceColumn {
                instrument: Instrument::asset("PETR4"),
                values: vec![Some(dec!(10)), Some(dec!(11))],
            }],
        )
        .unwrap();

        matrix
            .append_portfolio(
                Instrument::portfolio("portfolio"),
                vec![Some(dec!(10)), Some(dec!(11))],
            )
            .unwrap();

        let second = matrix.append_portfolio(
            Instrument::portfolio("portfolio"),
            vec![Some(dec!(10)), Some(dec!(11))],
        );
        assert!(second.is_err());
        assert_eq!(matrix.num_columns(), 2);
    }
}
