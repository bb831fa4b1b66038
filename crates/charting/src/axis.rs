use crate::series::SeriesPoint;
use serde::{Deserialize, Serialize};

pub const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Time axis range in epoch milliseconds. `max` is always greater than `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: i64,
    pub max: i64,
}

/// Common time range of several series.
///
/// When every point sits on the same timestamp (one trade, or only the origin),
/// the range is widened to one day so the axis never collapses. Returns `None`
/// only when all series are empty.
pub fn axis_bounds(series: &[&[SeriesPoint]]) -> Option<AxisBounds> {
    let mut xs = series.iter().flat_map(|points| points.iter().map(|p| p.x));
    let first = xs.next()?;
    let (min, max) = xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x)));

    let max = if max == min {
        min.saturating_add(ONE_DAY_MS)
    } else {
        max
    };
    Some(AxisBounds { min, max })
}
