use crate::enums::MarketMode;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An uploaded spreadsheet row. Columns are arbitrary and stored untouched;
/// only the normalizer's adapter interprets them.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// One historical trade, as supplied by the trade data source.
///
/// Records are immutable once built. A record only exists if its date was
/// resolvable, so every `TradeRecord` can be placed on a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub ticker: String,
    pub direction: String,
    #[serde(default)]
    pub pnl_percent_spot: Option<Decimal>,
    #[serde(default)]
    pub pnl_percent_futures: Option<Decimal>,
    pub status: String,
}

impl TradeRecord {
    /// The percent return for the given account variant. Absent values count as zero.
    pub fn pnl_percent(&self, mode: MarketMode) -> Decimal {
        let value = match mode {
            MarketMode::Spot => self.pnl_percent_spot,
            MarketMode::Futures => self.pnl_percent_futures,
        };
        value.unwrap_or(Decimal::ZERO)
    }
}

/// One node of a derived equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPoint {
    /// The source trade's date, or for the origin point the first trade's date
    /// (the Unix epoch when there are no trades).
    pub date: NaiveDate,
    pub capital_after: Decimal,
    pub trade_pnl_absolute: Decimal,
    pub trade_pnl_percent: Decimal,
    pub cumulative_net_pnl: Decimal,
    /// The trade that produced this point. `None` marks the synthetic origin.
    pub trade: Option<TradeRecord>,
}

impl SimulationPoint {
    /// Builds the synthetic "Start" point of a curve.
    pub fn origin(date: NaiveDate, initial_capital: Decimal) -> Self {
        Self {
            date,
            capital_after: initial_capital,
            trade_pnl_absolute: Decimal::ZERO,
            trade_pnl_percent: Decimal::ZERO,
            cumulative_net_pnl: Decimal::ZERO,
            trade: None,
        }
    }

    pub fn is_origin(&self) -> bool {
        self.trade.is_none()
    }

    /// Display label for the point's date: "Start" for the origin, `MM/DD/YYYY` otherwise.
    pub fn label(&self) -> String {
        if self.is_origin() {
            "Start".to_string()
        } else {
            self.date.format("%m/%d/%Y").to_string()
        }
    }
}

/// Additive aggregate over one period (and optionally one grouping key such as a ticker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBucket {
    /// `YYYY-MM-DD`, `YYYY-MM` or `YYYY` depending on granularity.
    pub period_key: String,
    pub group_key: Option<String>,
    pub sum_percent: Decimal,
    pub sum_absolute: Decimal,
    pub count: usize,
}

impl PeriodBucket {
    /// A bucket with zeroed aggregates, used to fill gaps in a continuous axis.
    pub fn empty(period_key: impl Into<String>, group_key: Option<String>) -> Self {
        Self {
            period_key: period_key.into(),
            group_key,
            sum_percent: Decimal::ZERO,
            sum_absolute: Decimal::ZERO,
            count: 0,
        }
    }
}
