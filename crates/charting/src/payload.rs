use crate::axis::{AxisBounds, axis_bounds};
use crate::series::{SeriesPoint, to_series};
use analytics::SimulationRun;
use serde::{Deserialize, Serialize};

/// Everything a line chart needs for both market modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    pub spot: Vec<SeriesPoint>,
    pub futures: Vec<SeriesPoint>,
    pub bounds: Option<AxisBounds>,
}

impl ChartPayload {
    pub fn assemble(run: &SimulationRun) -> Self {
        let spot = to_series(&run.spot);
        let futures = to_series(&run.futures);
        let bounds = axis_bounds(&[spot.as_slice(), futures.as_slice()]);
        Self { spot, futures, bounds }
    }
}
