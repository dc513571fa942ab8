//! # Carteira Analytics Engine
//!
//! This crate turns a date-aligned `PriceMatrix` into the derived metrics
//! the presentation layer displays: normalized price trajectories, the
//! synthetic equal-weight portfolio, per-instrument cumulative return,
//! annualized volatility, and the risk/reward ratio.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless
//!   calculator. Every call to `analyze` recomputes everything from the
//!   matrix it is handed; nothing is cached between invocations.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The main struct that contains the calculation logic.
//! - `AnalyticsReport`: The normalized matrix plus one metrics row per column.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, TRADING_DAYS_PER_YEAR};
pub use error::AnalyticsError;
pub use report::{AnalyticsReport, InstrumentMetrics};
