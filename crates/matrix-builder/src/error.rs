use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    /// Retrieval produced nothing for the requested tickers and range.
    /// This is a user-facing condition, not a fault: invalid tickers and
    /// ranges without market days both land here.
    #[error("No price data found for the selected tickers and date range.")]
    NoData,

    #[error("The selection must contain at least one ticker.")]
    EmptySelection,

    #[error("Invalid date range: start {start} is after end {end}.")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("'{0}' is a reserved column symbol and cannot be selected as a ticker.")]
    ReservedSymbol(String),

    #[error("'{0}' appears more than once in the selection.")]
    DuplicateSymbol(String),

    #[error("Matrix construction error: {0}")]
    Core(#[from] core_types::CoreError),
}
