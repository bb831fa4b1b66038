//! # HTTP API
//!
//! An axum server exposing trades, simulations, period aggregations and the
//! uploaded-sheet store. Handlers are thin: they fetch data through the injected
//! `TradeSource` or `DbRepository` and hand it to the pure engine crates.

use api_client::{TradeSource, source_from_settings};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use configuration::{Config, SimulationSettings};
use database::DbRepository;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

const BODY_LIMIT_BYTES: usize = 1024 * 1024 * 50;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
    pub trade_source: Arc<dyn TradeSource>,
    pub simulation: SimulationSettings,
}

/// Builds the router with every API route, CORS and request tracing.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/get-trades", get(handlers::get_trades))
        .route("/api/simulate", get(handlers::simulate))
        .route("/api/simulate/click", get(handlers::simulate_click))
        .route("/api/performance/periods", get(handlers::performance_periods))
        .route("/api/performance/tickers", get(handlers::performance_tickers))
        .route("/api/performance/overview", get(handlers::performance_overview))
        .route("/api/excel/upload", post(handlers::upload_sheet))
        .route("/api/excel/all-data", get(handlers::get_all_data))
        .route("/api/excel/files", get(handlers::get_files))
        .route("/api/excel/files/:id", delete(handlers::delete_file))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

/// Connects the database, builds the trade source and serves until shutdown.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    // Tracing is initialized by the caller; this function only logs.
    let db_pool = database::connect().await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    let trade_source = source_from_settings(&config.trade_source)?;
    tracing::info!(source = %trade_source.describe(), "Trade source ready.");

    let app_state = Arc::new(AppState {
        db_repo,
        trade_source,
        simulation: config.simulation.clone(),
    });
    let app = build_router(app_state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
