use crate::TradeSource;
use crate::error::ApiError;
use crate::http::trades_from_json;
use async_trait::async_trait;
use core_types::TradeRecord;
use std::path::PathBuf;

/// Reads a JSON array of trades from disk on every fetch.
#[derive(Debug, Clone)]
pub struct FileTradeSource {
    path: PathBuf,
}

impl FileTradeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TradeSource for FileTradeSource {
    async fn fetch_trades(&self) -> Result<Vec<TradeRecord>, ApiError> {
        let bytes = tokio::fs::read(&self.path).await?;
        trades_from_json(serde_json::from_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// An in-memory trade list. With no trades it is the "no source configured" source.
#[derive(Debug, Clone, Default)]
pub struct StaticTradeSource {
    trades: Vec<TradeRecord>,
}

impl StaticTradeSource {
    pub fn new(trades: Vec<TradeRecord>) -> Self {
        Self { trades }
    }
}

#[async_trait]
impl TradeSource for StaticTradeSource {
    async fn fetch_trades(&self) -> Result<Vec<TradeRecord>, ApiError> {
        Ok(self.trades.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} trades)", self.trades.len())
    }
}
