pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{InstrumentKind, RetrievalResult};
pub use error::CoreError;
pub use structs::{Instrument, PriceColumn, PriceMatrix, PricePoint, PriceSeries};

/// The reserved column symbol under which the benchmark index is attached.
///
/// This identifier lives in the same namespace as real asset symbols; the
/// matrix builder rejects any selection that would collide with it.
pub const BENCHMARK_SYMBOL: &str = "IBOV";

/// The reserved column symbol under which the synthetic equal-weight
/// portfolio is appended by the analytics engine.
pub const PORTFOLIO_SYMBOL: &str = "portfolio";
