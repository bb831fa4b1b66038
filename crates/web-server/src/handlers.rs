use crate::{AppState, error::AppError};
use analytics::{
    BucketValue, MAX_RANGE_PERIODS, PerformanceSummary, aggregate_range, date_bounds,
    filter_by_ticker, period_span, simulate_both, ticker_totals, unique_tickers,
};
use api_client::load_trades;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use charting::{
    BucketMeasure, CategoryPoint, ChartPayload, ClickedTrade, bucket_series,
    resolve_trade_details,
};
use chrono::{Datelike, NaiveDate};
use core_types::{Granularity, PeriodBucket, RawRow, TradeRecord};
use database::SheetDocument;
use normalizer::trades_from_raw_rows;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

const TRADES_CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate=59";

#[derive(Debug, Default, Deserialize)]
pub struct SimulateParams {
    pub spot_capital: Option<Decimal>,
    pub futures_capital: Option<Decimal>,
    pub ticker: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClickParams {
    pub index: usize,
    pub spot_capital: Option<Decimal>,
    pub futures_capital: Option<Decimal>,
    pub ticker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PeriodParams {
    pub granularity: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub ticker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TickerParams {
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OverviewParams {
    pub ticker: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub sheet_name: String,
    #[serde(default)]
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    pub trade_count: usize,
    pub spot_capital: Decimal,
    pub futures_capital: Decimal,
    pub chart: ChartPayload,
    pub summary: PerformanceSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodsResponse {
    pub granularity: Granularity,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub spot: Vec<PeriodBucket>,
    pub futures: Vec<PeriodBucket>,
    /// Spot and futures percent summed per trade.
    pub combined: Vec<PeriodBucket>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickersResponse {
    pub year: Option<i32>,
    pub spot: Vec<CategoryPoint>,
    pub futures: Vec<CategoryPoint>,
    pub combined: Vec<CategoryPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub tickers: Vec<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub summary: PerformanceSummary,
}

/// Trades from the injected source, narrowed to one ticker when asked.
async fn source_trades(state: &AppState, ticker: Option<&str>) -> Vec<TradeRecord> {
    let trades = load_trades(state.trade_source.as_ref()).await;
    match ticker {
        Some(_) => filter_by_ticker(&trades, ticker),
        None => trades,
    }
}

/// Trades adapted from every uploaded sheet.
async fn sheet_trades(state: &AppState, ticker: Option<&str>) -> Result<Vec<TradeRecord>, AppError> {
    let rows = state.db_repo.get_all_rows().await?;
    let trades = trades_from_raw_rows(&rows);
    Ok(filter_by_ticker(&trades, ticker))
}

fn run_simulation(
    state: &AppState,
    trades: &[TradeRecord],
    spot_capital: Option<Decimal>,
    futures_capital: Option<Decimal>,
) -> SimulationResponse {
    let spot_capital = spot_capital.unwrap_or(state.simulation.default_spot_capital);
    let futures_capital = futures_capital.unwrap_or(state.simulation.default_futures_capital);
    let run = simulate_both(spot_capital, futures_capital, trades);

    SimulationResponse {
        trade_count: run.trade_count(),
        spot_capital,
        futures_capital,
        chart: ChartPayload::assemble(&run),
        summary: PerformanceSummary::from_run(trades, &run),
    }
}

fn check_range(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Result<(), AppError> {
    let periods = period_span(start, end, granularity);
    if periods > MAX_RANGE_PERIODS {
        return Err(AppError::BadRequest(format!(
            "range spans {periods} {granularity} periods; the limit is {MAX_RANGE_PERIODS}"
        )));
    }
    Ok(())
}

/// # GET /api/health
pub async fn health() -> &'static str {
    "OK"
}

/// # GET /api/get-trades
/// Normalized trades from the configured source. Fetch failures yield an empty list.
pub async fn get_trades(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let trades = load_trades(state.trade_source.as_ref()).await;
    ([(header::CACHE_CONTROL, TRADES_CACHE_CONTROL)], Json(trades))
}

/// # GET /api/simulate
/// Both equity curves as chart series, with axis bounds and summary statistics.
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SimulateParams>,
) -> Json<SimulationResponse> {
    let trades = source_trades(&state, params.ticker.as_deref()).await;
    Json(run_simulation(
        &state,
        &trades,
        params.spot_capital,
        params.futures_capital,
    ))
}

/// # GET /api/simulate/click
/// The trade behind a clicked chart index, or `null` for the origin and out-of-range indices.
pub async fn simulate_click(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClickParams>,
) -> Json<Option<ClickedTrade>> {
    let trades = source_trades(&state, params.ticker.as_deref()).await;
    let response = run_simulation(&state, &trades, params.spot_capital, params.futures_capital);
    Json(resolve_trade_details(
        &response.chart.spot,
        &response.chart.futures,
        params.index,
    ))
}

/// # GET /api/performance/periods
/// Gap-free spot, futures and combined buckets over the uploaded sheet rows.
/// Ranges longer than `MAX_RANGE_PERIODS` are rejected.
pub async fn performance_periods(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<PeriodsResponse>, AppError> {
    let granularity = match params.granularity.as_deref() {
        Some(text) => text.parse::<Granularity>()?,
        None => Granularity::Monthly,
    };

    // Reject oversized explicit ranges before touching the store.
    if let (Some(start), Some(end)) = (params.start, params.end) {
        check_range(start, end, granularity)?;
    }

    let trades = sheet_trades(&state, params.ticker.as_deref()).await?;
    let bounds = date_bounds(&trades);
    let start = params.start.or(bounds.map(|(lo, _)| lo));
    let end = params.end.or(bounds.map(|(_, hi)| hi));

    let (spot, futures, combined) = match (start, end) {
        (Some(start), Some(end)) => {
            check_range(start, end, granularity)?;
            (
                aggregate_range(&trades, granularity, start, end, BucketValue::spot),
                aggregate_range(&trades, granularity, start, end, BucketValue::futures),
                aggregate_range(&trades, granularity, start, end, BucketValue::combined),
            )
        }
        _ => (Vec::new(), Vec::new(), Vec::new()),
    };

    Ok(Json(PeriodsResponse {
        granularity,
        start,
        end,
        spot,
        futures,
        combined,
    }))
}

/// # GET /api/performance/tickers
/// Per-ticker totals for one year; defaults to the latest year in the data.
pub async fn performance_tickers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TickerParams>,
) -> Result<Json<TickersResponse>, AppError> {
    let trades = sheet_trades(&state, None).await?;
    let year = params
        .year
        .or_else(|| date_bounds(&trades).map(|(_, latest)| latest.year()));

    let series = |value_fn: fn(&TradeRecord) -> BucketValue| match year {
        Some(year) => bucket_series(&ticker_totals(&trades, year, value_fn), BucketMeasure::Percent),
        None => Vec::new(),
    };

    Ok(Json(TickersResponse {
        year,
        spot: series(BucketValue::spot),
        futures: series(BucketValue::futures),
        combined: series(BucketValue::combined),
    }))
}

/// # GET /api/performance/overview
/// Ticker list, date range and summary cards for the uploaded sheets.
pub async fn performance_overview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OverviewParams>,
) -> Result<Json<OverviewResponse>, AppError> {
    let all_trades = sheet_trades(&state, None).await?;
    let tickers = unique_tickers(&all_trades);
    let trades = filter_by_ticker(&all_trades, params.ticker.as_deref());
    let bounds = date_bounds(&trades);
    let response = run_simulation(&state, &trades, None, None);

    Ok(Json(OverviewResponse {
        tickers,
        start: bounds.map(|(lo, _)| lo),
        end: bounds.map(|(_, hi)| hi),
        summary: response.summary,
    }))
}

/// # POST /api/excel/upload
/// Stores already-extracted sheet rows as one document.
pub async fn upload_sheet(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UploadRequest>,
) -> Result<Json<Value>, AppError> {
    let sheet_name = request.sheet_name.trim();
    if sheet_name.is_empty() {
        return Err(AppError::BadRequest("sheetName must not be empty".to_string()));
    }

    let document = state.db_repo.save_sheet(sheet_name, &request.rows).await?;
    Ok(Json(json!({
        "message": "Data saved successfully",
        "data": document,
    })))
}

/// # GET /api/excel/all-data
/// Rows of every uploaded sheet, concatenated.
pub async fn get_all_data(State(state): State<Arc<AppState>>) -> Result<Json<Vec<RawRow>>, AppError> {
    Ok(Json(state.db_repo.get_all_rows().await?))
}

/// # GET /api/excel/files
pub async fn get_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SheetDocument>>, AppError> {
    Ok(Json(state.db_repo.get_sheets_with_ids().await?))
}

/// # DELETE /api/excel/files/:id
pub async fn delete_file(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    state.db_repo.delete_sheet(id).await?;
    Ok(Json(json!({ "message": "File deleted successfully", "id": id })))
}
