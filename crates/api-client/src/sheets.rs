use crate::TradeSource;
use crate::error::ApiError;
use crate::http::{build_client, json_body};
use crate::responses::SheetValuesResponse;
use async_trait::async_trait;
use core_types::TradeRecord;
use normalizer::trades_from_sheet_values;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const ROWS: &str = "ROWS";

/// A Google Sheet read through the Sheets v4 `values` endpoint with an API key.
///
/// Values are requested in their formatted form, so dates arrive as the text the
/// sheet shows and percentages keep their `%` sign. The normalizer handles both.
#[derive(Clone)]
pub struct GoogleSheetSource {
    client: reqwest::Client,
    base_url: String,
    sheet_id: String,
    range: String,
    api_key: String,
}

impl GoogleSheetSource {
    pub fn new(
        sheet_id: impl Into<String>,
        range: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: SHEETS_API_BASE.to_string(),
            sheet_id: sheet_id.into(),
            range: range.into(),
            api_key: api_key.into(),
        })
    }

    /// Points the source at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn values_url(&self) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidData(format!("bad Sheets API url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidData("Sheets API url cannot take a path".to_string()))?
            .pop_if_empty()
            .extend([self.sheet_id.as_str(), "values", self.range.as_str()]);
        Ok(url)
    }
}

#[async_trait]
impl TradeSource for GoogleSheetSource {
    async fn fetch_trades(&self) -> Result<Vec<TradeRecord>, ApiError> {
        let response = self
            .client
            .get(self.values_url()?)
            .query(&[
                ("key", self.api_key.as_str()),
                ("valueRenderOption", "FORMATTED_VALUE"),
                ("dateTimeRenderOption", "FORMATTED_STRING"),
                ("majorDimension", ROWS),
            ])
            .send()
            .await?;

        let body: SheetValuesResponse = serde_json::from_value(json_body(response).await?)?;
        // The API echoes the resolved range, e.g. "Trades!A1:F3" for "Trades".
        let resolved = body.range.as_deref().unwrap_or(&self.range);
        if let Some(dimension) = body.major_dimension.as_deref().filter(|d| *d != ROWS) {
            return Err(ApiError::InvalidData(format!(
                "sheet range {resolved} came back as {dimension}, expected {ROWS}"
            )));
        }
        if body.values.is_empty() {
            tracing::warn!(sheet_id = %self.sheet_id, range = %resolved, "Sheet range holds no data.");
            return Ok(Vec::new());
        }
        tracing::debug!(sheet_id = %self.sheet_id, range = %resolved, rows = body.values.len(), "Fetched sheet values.");
        Ok(trades_from_sheet_values(&body.values)?)
    }

    fn describe(&self) -> String {
        format!("google sheet {} ({})", self.sheet_id, self.range)
    }
}
