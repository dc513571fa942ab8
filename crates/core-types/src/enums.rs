use crate::structs::PriceSeries;
use serde::{Deserialize, Serialize};

/// The role a column plays inside a `PriceMatrix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentKind {
    /// A tradable asset selected by the user.
    Asset,
    /// The reference index used for relative-performance comparison.
    Benchmark,
    /// The synthetic equal-weight portfolio derived by the analytics engine.
    /// Never retrieved from a data provider.
    Portfolio,
}

impl InstrumentKind {
    /// Returns true for columns that participate in portfolio weighting.
    pub fn is_weighted(&self) -> bool {
        matches!(self, InstrumentKind::Asset)
    }
}

/// The shape of a retrieval outcome.
///
/// Data providers return a single unlabeled series when exactly one symbol
/// is requested, a table of series otherwise, and nothing at all for
/// ranges with no market days. Making the three cases explicit here lets
/// the matrix builder normalize them into one table shape instead of
/// branching on a duck-typed result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RetrievalResult {
    /// One series for a single requested symbol; the label may be missing
    /// or provider-decorated, the builder assigns the canonical one.
    Single(PriceSeries),
    /// One labeled series per requested symbol that had data.
    Multiple(Vec<PriceSeries>),
    /// No trading data in the requested range.
    Empty,
}

impl RetrievalResult {
    /// Returns true when the retrieval produced no data at all.
    pub fn is_empty(&self) -> bool {
        match self {
            RetrievalResult::Single(series) => series.points.is_empty(),
            RetrievalResult::Multiple(table) => {
                table.iter().all(|series| series.points.is_empty())
            }
            RetrievalResult::Empty => true,
        }
    }
}
