use serde::Deserialize;
use serde_json::Value;

// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.

/// The response of `GET /v4/spreadsheets/{id}/values/{range}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetValuesResponse {
    pub range: Option<String>,
    pub major_dimension: Option<String>,
    /// Rows of cells. The API omits the field entirely for an empty range.
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}
