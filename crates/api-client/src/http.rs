use crate::TradeSource;
use crate::error::ApiError;
use async_trait::async_trait;
use core_types::TradeRecord;
use normalizer::trade_from_raw_row;
use serde_json::Value;
use std::time::Duration;

/// Converts a JSON array of trade objects.
///
/// Entries that are not objects, or whose date cannot be resolved, are skipped
/// and counted in a single warning.
pub fn trades_from_json(body: Value) -> Result<Vec<TradeRecord>, ApiError> {
    let Value::Array(entries) = body else {
        return Err(ApiError::InvalidData(
            "expected a JSON array of trade objects".to_string(),
        ));
    };

    let trades: Vec<TradeRecord> = entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(trade_from_raw_row)
        .collect();

    let skipped = entries.len() - trades.len();
    if skipped > 0 {
        tracing::warn!(skipped, total = entries.len(), "Skipped unusable trade entries.");
    }
    Ok(trades)
}

pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, ApiError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Reads the body of a successful response, or turns the status into an error.
pub(crate) async fn json_body(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<Value>().await?)
}

/// A trade API that answers `GET <url>` with a JSON array of trades.
#[derive(Clone)]
pub struct HttpTradeSource {
    client: reqwest::Client,
    url: String,
}

impl HttpTradeSource {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl TradeSource for HttpTradeSource {
    async fn fetch_trades(&self) -> Result<Vec<TradeRecord>, ApiError> {
        let response = self.client.get(&self.url).send().await?;
        let body = json_body(response).await?;
        trades_from_json(body)
    }

    fn describe(&self) -> String {
        format!("http {}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn json_array_is_converted_and_bad_entries_skipped() {
        let trades = trades_from_json(json!([
            {"date": "2024-01-02", "ticker": "ETH", "direction": "short", "pnlPercentSpot": -3, "pnlPercentFutures": 8, "status": "SL"},
            {"date": "not a date", "ticker": "BTC"},
            "garbage",
            {"Date": "01/01/2024", "Ticker": "BTC", "Direction": "long", "SPOT": "5%", "FUTURES": "-2%"}
        ]))
        .unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].ticker, "ETH");
        assert_eq!(trades[0].pnl_percent_futures, Some(dec!(8)));
        assert_eq!(trades[1].pnl_percent_spot, Some(dec!(5)));
    }

    #[test]
    fn non_array_body_is_invalid() {
        assert!(matches!(
            trades_from_json(json!({"error": "nope"})),
            Err(ApiError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn fetches_trades_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/trades")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"date":"2024-03-01","ticker":"SOL","direction":"long","pnlPercentSpot":1.5,"status":"TP"}]"#)
            .create_async()
            .await;

        let source = HttpTradeSource::new(format!("{}/trades", server.url()), 5).unwrap();
        let trades = source.fetch_trades().await.unwrap();

        mock.assert_async().await;
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].ticker, "SOL");
        assert_eq!(trades[0].pnl_percent_spot, Some(dec!(1.5)));
        assert_eq!(trades[0].pnl_percent_futures, None);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/trades")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let source = HttpTradeSource::new(format!("{}/trades", server.url()), 5).unwrap();
        match source.fetch_trades().await {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }
}
