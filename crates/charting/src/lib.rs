//! # Chart Data Assembler
//!
//! Maps equity curves and period buckets into plain `{x, y}` tuples that any
//! rendering surface can draw, and resolves a clicked point back to the trade
//! behind it.
//!
//! This crate does no drawing. Every output type is `Serialize` so the web
//! server can hand it straight to a browser chart.

pub mod axis;
pub mod buckets;
pub mod payload;
pub mod series;

pub use axis::{AxisBounds, ONE_DAY_MS, axis_bounds};
pub use buckets::{BucketMeasure, CategoryPoint, bucket_series};
pub use payload::ChartPayload;
pub use series::{ClickedTrade, SeriesPoint, resolve_click, resolve_trade_details, to_series};
