//! # Analytics Engine
//!
//! This crate turns a chronologically ordered list of trades into compounding
//! equity curves, period aggregates and summary statistics.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every entry point is a pure function of its arguments,
//!   so re-running a simulation with a different starting capital is always safe.
//! - **Always Degrade:** bad or missing values never abort a calculation; they are
//!   treated as zero-effect inputs.
//!
//! ## Public API
//!
//! - `simulate` / `simulate_both`: the compounding simulator.
//! - `aggregate`, `aggregate_range`, `ticker_totals`: the period aggregator.
//! - `PerformanceSummary`: headline statistics for a simulation run.

pub mod aggregator;
pub mod report;
pub mod simulator;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::{
    BucketValue, Dated, MAX_RANGE_PERIODS, aggregate, aggregate_range, categorical_totals, date_bounds,
    filter_by_ticker, period_key, period_span, ticker_totals, trade_points, unique_tickers,
};
pub use report::{CurveStats, PerformanceSummary};
pub use simulator::{
    ALLOCATION_FRACTION, DEFAULT_INITIAL_CAPITAL, SimulationRun, simulate, simulate_both,
};
