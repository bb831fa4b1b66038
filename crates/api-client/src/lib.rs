//! # Trade Record Source
//!
//! Where trade records come from. The rest of the system only sees the
//! `TradeSource` trait, so the live Google Sheet, a JSON trade API, a file on
//! disk or an in-memory list can be swapped without touching the engine.

use crate::error::ApiError;
use async_trait::async_trait;
use configuration::TradeSourceSettings;
use core_types::TradeRecord;
use normalizer::sort_chronologically;
use std::sync::Arc;

pub mod error;
pub mod http;
pub mod local;
pub mod responses;
pub mod sheets;

// --- Public API ---
pub use http::{HttpTradeSource, trades_from_json};
pub use local::{FileTradeSource, StaticTradeSource};
pub use responses::SheetValuesResponse;
pub use sheets::GoogleSheetSource;

/// The abstract interface for anything that can supply trade records.
/// Handlers and commands receive it injected, so tests can swap in a static list.
#[async_trait]
pub trait TradeSource: Send + Sync {
    async fn fetch_trades(&self) -> Result<Vec<TradeRecord>, ApiError>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// Fetches trades, degrading any failure to an empty dataset.
///
/// The error is logged once here. The result is always sorted by date, which is
/// what the simulator expects.
pub async fn load_trades(source: &dyn TradeSource) -> Vec<TradeRecord> {
    match source.fetch_trades().await {
        Ok(mut trades) => {
            sort_chronologically(&mut trades);
            tracing::info!(source = %source.describe(), count = trades.len(), "Loaded trades.");
            trades
        }
        Err(e) => {
            tracing::error!(source = %source.describe(), error = %e, "Failed to fetch trades; continuing with an empty dataset.");
            Vec::new()
        }
    }
}

/// Builds the source selected by the `[trade_source]` config section.
pub fn source_from_settings(
    settings: &TradeSourceSettings,
) -> Result<Arc<dyn TradeSource>, ApiError> {
    let source: Arc<dyn TradeSource> = match settings {
        TradeSourceSettings::Http { url, timeout_secs } => {
            Arc::new(HttpTradeSource::new(url.clone(), *timeout_secs)?)
        }
        TradeSourceSettings::GoogleSheet {
            sheet_id,
            range,
            api_key,
            timeout_secs,
        } => Arc::new(GoogleSheetSource::new(
            sheet_id.clone(),
            range.clone(),
            api_key.clone(),
            *timeout_secs,
        )?),
        TradeSourceSettings::File { path } => Arc::new(FileTradeSource::new(path.clone())),
        TradeSourceSettings::None => {
            tracing::warn!("No trade source configured; trade endpoints will return empty data.");
            Arc::new(StaticTradeSource::default())
        }
    };
    Ok(source)
}
