use chrono::{NaiveDate, NaiveTime};
use core_types::SimulationPoint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One drawable point of an equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// UTC midnight of the point's date, in epoch milliseconds.
    pub x: i64,
    /// Capital after the trade.
    pub y: Decimal,
    /// `"Start"` for the origin, otherwise the trade date.
    pub label: String,
    /// The point this tuple was built from, kept for click-through detail.
    pub original_point: SimulationPoint,
}

pub(crate) fn epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

pub fn to_series(points: &[SimulationPoint]) -> Vec<SeriesPoint> {
    points
        .iter()
        .map(|point| SeriesPoint {
            x: epoch_millis(point.date),
            y: point.capital_after,
            label: point.label(),
            original_point: point.clone(),
        })
        .collect()
}

/// The simulation point behind a clicked index.
///
/// Index 0 is the synthetic origin and has no trade to show, so it resolves to
/// `None` like any out-of-range index.
pub fn resolve_click(series: &[SeriesPoint], index: usize) -> Option<&SimulationPoint> {
    if index == 0 {
        return None;
    }
    series.get(index).map(|point| &point.original_point)
}

/// Everything a detail panel shows for one clicked trade, across both modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickedTrade {
    pub date: NaiveDate,
    pub ticker: String,
    pub direction: String,
    pub status: String,
    pub spot: Option<SimulationPoint>,
    pub futures: Option<SimulationPoint>,
}

/// Resolves the same index on the spot and futures curves.
///
/// Both curves come from one trade list, so a given index names the same trade
/// in each.
pub fn resolve_trade_details(
    spot: &[SeriesPoint],
    futures: &[SeriesPoint],
    index: usize,
) -> Option<ClickedTrade> {
    let spot_point = resolve_click(spot, index);
    let futures_point = resolve_click(futures, index);
    let trade = spot_point
        .or(futures_point)
        .and_then(|point| point.trade.as_ref())?;

    Some(ClickedTrade {
        date: trade.date,
        ticker: trade.ticker.clone(),
        direction: trade.direction.clone(),
        status: trade.status.clone(),
        spot: spot_point.cloned(),
        futures: futures_point.cloned(),
    })
}
