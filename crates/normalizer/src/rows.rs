use crate::dates::parse_date_value;
use crate::error::NormalizeError;
use crate::percent::{is_error_token, parse_percent_value};
use core_types::{RawRow, TradeRecord};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Ticker used when a row does not name its instrument.
pub const UNKNOWN_TICKER: &str = "UNKNOWN";
/// Placeholder for missing free-text fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Percent figures are kept to four decimal places.
const PERCENT_DP: u32 = 4;

// Spreadsheet column names first, trade-API camelCase names second.
const DATE_KEYS: [&str; 2] = ["Date", "date"];
const TICKER_KEYS: [&str; 2] = ["Ticker", "ticker"];
const DIRECTION_KEYS: [&str; 2] = ["Direction", "direction"];
const SPOT_KEYS: [&str; 2] = ["SPOT", "pnlPercentSpot"];
const FUTURES_KEYS: [&str; 2] = ["FUTURES", "pnlPercentFutures"];
const STATUS_KEYS: [&str; 2] = ["Status", "status"];

/// Returns the trimmed text of a cell, or `None` when it is empty, `N/A`,
/// `undefined` or a spreadsheet error token.
pub fn string_value(cell: &Value) -> Option<String> {
    let text = match cell {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };

    let upper = text.to_ascii_uppercase();
    if text.is_empty() || upper == "N/A" || upper == "UNDEFINED" || is_error_token(&text) {
        return None;
    }
    Some(text)
}

fn field<'a>(row: &'a RawRow, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .find(|value| !value.is_null())
}

fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PERCENT_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Adapts one opaque row into a strict `TradeRecord`.
///
/// Only an unresolvable date rejects the row. Extra fields are ignored; a
/// missing ticker becomes `UNKNOWN`, missing direction/status become `N/A`,
/// and missing or malformed percents stay absent.
pub fn trade_from_raw_row(row: &RawRow) -> Option<TradeRecord> {
    let date = field(row, &DATE_KEYS).and_then(parse_date_value)?;
    let text = |keys: &[&str], default: &str| {
        field(row, keys)
            .and_then(string_value)
            .unwrap_or_else(|| default.to_string())
    };

    Some(TradeRecord {
        date,
        ticker: text(&TICKER_KEYS, UNKNOWN_TICKER),
        direction: text(&DIRECTION_KEYS, NOT_AVAILABLE),
        pnl_percent_spot: field(row, &SPOT_KEYS)
            .and_then(parse_percent_value)
            .map(round_percent),
        pnl_percent_futures: field(row, &FUTURES_KEYS)
            .and_then(parse_percent_value)
            .map(round_percent),
        status: text(&STATUS_KEYS, NOT_AVAILABLE),
    })
}

/// Adapts many rows, dropping the ones without a usable date, and returns them
/// in chronological order.
pub fn trades_from_raw_rows(rows: &[RawRow]) -> Vec<TradeRecord> {
    let mut trades: Vec<TradeRecord> = rows.iter().filter_map(trade_from_raw_row).collect();
    let skipped = rows.len() - trades.len();
    if skipped > 0 {
        tracing::debug!(skipped, "Dropped rows with unresolvable dates.");
    }
    sort_chronologically(&mut trades);
    trades
}

/// Stable ascending sort by date; trades on the same day keep their order.
pub fn sort_chronologically(trades: &mut [TradeRecord]) {
    trades.sort_by_key(|trade| trade.date);
}

fn is_blank_row(row: &[Value]) -> bool {
    row.iter().all(|cell| match cell {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    })
}

/// Converts a sheet's value grid (first row = headers) into sorted trades.
///
/// `Date`, `Direction` and `Ticker` headers are mandatory. Rows that are blank,
/// have no resolvable date or no direction are skipped.
pub fn trades_from_sheet_values(values: &[Vec<Value>]) -> Result<Vec<TradeRecord>, NormalizeError> {
    let Some((header_row, data_rows)) = values.split_first() else {
        tracing::info!("Sheet is empty.");
        return Ok(Vec::new());
    };
    if data_rows.is_empty() {
        tracing::info!("No data rows found in sheet.");
        return Ok(Vec::new());
    }

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| string_value(cell).unwrap_or_default())
        .collect();
    let column = |name: &str| headers.iter().position(|header| header == name);

    let (date_col, direction_col, ticker_col) = match (column("Date"), column("Direction"), column("Ticker")) {
        (Some(date), Some(direction), Some(ticker)) => (date, direction, ticker),
        _ => {
            return Err(NormalizeError::MissingHeaders(format!(
                "expected Date, Direction and Ticker; found {}",
                headers.join(",")
            )));
        }
    };
    let spot_col = column("SPOT");
    let futures_col = column("FUTURES");
    let status_col = column("Status");
    if spot_col.is_none() {
        tracing::warn!("'SPOT' column header not found. Spot PnL values will be 0.");
    }
    if futures_col.is_none() {
        tracing::warn!("'FUTURES' column header not found. Futures PnL values will be 0.");
    }
    if status_col.is_none() {
        tracing::warn!("'Status' column header not found. Status will default to N/A.");
    }

    let cell = |row: &[Value], col: Option<usize>| -> Option<Value> {
        col.and_then(|c| row.get(c)).cloned()
    };

    let mut trades = Vec::with_capacity(data_rows.len());
    let mut skipped = 0usize;
    for row in data_rows {
        if is_blank_row(row) {
            skipped += 1;
            continue;
        }
        let Some(date) = cell(row, Some(date_col)).as_ref().and_then(parse_date_value) else {
            skipped += 1;
            continue;
        };
        let Some(direction) = cell(row, Some(direction_col)).as_ref().and_then(string_value) else {
            skipped += 1;
            continue;
        };

        trades.push(TradeRecord {
            date,
            ticker: cell(row, Some(ticker_col))
                .as_ref()
                .and_then(string_value)
                .unwrap_or_else(|| UNKNOWN_TICKER.to_string()),
            direction,
            pnl_percent_spot: cell(row, spot_col)
                .as_ref()
                .and_then(parse_percent_value)
                .map(round_percent),
            pnl_percent_futures: cell(row, futures_col)
                .as_ref()
                .and_then(parse_percent_value)
                .map(round_percent),
            status: cell(row, status_col)
                .as_ref()
                .and_then(string_value)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        });
    }

    sort_chronologically(&mut trades);
    tracing::info!(cleaned = trades.len(), skipped, "Finished processing sheet rows.");
    Ok(trades)
}
