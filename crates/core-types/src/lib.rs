//! # Core Types
//!
//! Layer 0 of the workspace: the shared vocabulary every other crate speaks.
//! No logic beyond small accessors lives here.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Granularity, MarketMode};
pub use error::CoreError;
pub use structs::{PeriodBucket, RawRow, SimulationPoint, TradeRecord};
