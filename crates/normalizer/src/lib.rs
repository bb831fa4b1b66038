//! # Normalizer
//!
//! Turns heterogeneous date and percentage representations into canonical
//! values, and adapts loosely-typed spreadsheet rows into strict `TradeRecord`s.
//!
//! ## Architectural Principles
//!
//! - **Single place for defaults:** every "missing value" policy (percent → 0,
//!   ticker → `UNKNOWN`, text → `N/A`) is decided here, never at call sites.
//! - **Never throws:** parsing functions signal failure with `None`. The only
//!   error in this crate is a sheet whose header row cannot be interpreted at all.
//!
//! ## Public API
//!
//! - `parse_date` / `parse_date_value`: dates from text, serials or native values.
//! - `parse_percent` / `parse_percent_value`: signed percentages.
//! - `trade_from_raw_row`: the raw-row → `TradeRecord` adapter.
//! - `trades_from_sheet_values`: header-row + value-rows → sorted trades.

pub mod dates;
pub mod error;
pub mod percent;
pub mod rows;

pub use dates::{DateInput, from_serial, parse_date, parse_date_value};
pub use error::NormalizeError;
pub use percent::{parse_percent, parse_percent_value};
pub use rows::{
    NOT_AVAILABLE, UNKNOWN_TICKER, sort_chronologically, string_value, trade_from_raw_row,
    trades_from_raw_rows, trades_from_sheet_values,
};
