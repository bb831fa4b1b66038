use analytics::{
    BucketValue, MAX_RANGE_PERIODS, PerformanceSummary, aggregate_range, date_bounds,
    filter_by_ticker, period_span, simulate_both, ticker_totals,
};
use api_client::{FileTradeSource, TradeSource, load_trades, source_from_settings};
use charting::{BucketMeasure, ChartPayload, bucket_series};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::{Config, LogFormat};
use core_types::{Granularity, TradeRecord};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

mod logging;
mod tables;

/// The main entry point for the PnL simulator.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file when one exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config()?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    let _log_guard = logging::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => web_server::run_server(&config).await,
        Commands::Simulate(args) => handle_simulate(args, &config).await,
        Commands::Aggregate(args) => handle_aggregate(args, &config).await,
        Commands::Tickers(args) => handle_tickers(args, &config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Replays a trade journal as compounding spot and futures equity curves.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Override the configured log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve,
    /// Simulate both equity curves and print them with a summary.
    Simulate(SimulateArgs),
    /// Sum trade returns per day, month or year over a gap-free range.
    Aggregate(AggregateArgs),
    /// Total return per ticker for one year.
    Tickers(TickersArgs),
}

#[derive(Parser)]
struct SourceArgs {
    /// Read trades from this JSON file instead of the configured source.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Only use trades for this ticker.
    #[arg(long)]
    ticker: Option<String>,
}

#[derive(Parser)]
struct SimulateArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Starting capital for the spot curve (defaults to the configured value).
    #[arg(long)]
    spot_capital: Option<Decimal>,

    /// Starting capital for the futures curve (defaults to the configured value).
    #[arg(long)]
    futures_capital: Option<Decimal>,

    /// Print the chart payload as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct AggregateArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// daily, monthly or yearly.
    #[arg(long, default_value = "monthly")]
    granularity: Granularity,

    /// First day of the range (format: YYYY-MM-DD). Defaults to the first trade.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the range (format: YYYY-MM-DD). Defaults to the last trade.
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Parser)]
struct TickersArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// The calendar year to total.
    #[arg(long)]
    year: i32,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn load_source_trades(args: &SourceArgs, config: &Config) -> anyhow::Result<Vec<TradeRecord>> {
    let source: Arc<dyn TradeSource> = match &args.input {
        Some(path) => Arc::new(FileTradeSource::new(path.clone())),
        None => source_from_settings(&config.trade_source)?,
    };
    let trades = load_trades(source.as_ref()).await;
    let selected = filter_by_ticker(&trades, args.ticker.as_deref());
    if let Some(ticker) = &args.ticker {
        tracing::debug!(%ticker, selected = selected.len(), total = trades.len(), "Filtered trades by ticker.");
    }
    Ok(selected)
}

async fn handle_simulate(args: SimulateArgs, config: &Config) -> anyhow::Result<()> {
    let trades = load_source_trades(&args.source, config).await?;
    let spot_capital = args
        .spot_capital
        .unwrap_or(config.simulation.default_spot_capital);
    let futures_capital = args
        .futures_capital
        .unwrap_or(config.simulation.default_futures_capital);

    let run = simulate_both(spot_capital, futures_capital, &trades);

    if args.json {
        let payload = ChartPayload::assemble(&run);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Spot (starting capital {spot_capital})");
    println!("{}", tables::curve_table(&run.spot));
    println!("Futures (starting capital {futures_capital})");
    println!("{}", tables::curve_table(&run.futures));

    let summary = PerformanceSummary::from_run(&trades, &run);
    println!(
        "{} trades, summed spot {}%, summed futures {}%",
        summary.total_trades, summary.sum_percent_spot, summary.sum_percent_futures
    );
    println!("{}", tables::summary_table(&summary));
    Ok(())
}

async fn handle_aggregate(args: AggregateArgs, config: &Config) -> anyhow::Result<()> {
    let trades = load_source_trades(&args.source, config).await?;
    let bounds = date_bounds(&trades);
    let start = args.start.or(bounds.map(|(lo, _)| lo));
    let end = args.end.or(bounds.map(|(_, hi)| hi));

    let (Some(start), Some(end)) = (start, end) else {
        println!("No trades to aggregate.");
        return Ok(());
    };

    let periods = period_span(start, end, args.granularity);
    if periods > MAX_RANGE_PERIODS {
        anyhow::bail!(
            "range spans {periods} {} periods; the limit is {MAX_RANGE_PERIODS}",
            args.granularity
        );
    }

    let spot = aggregate_range(&trades, args.granularity, start, end, BucketValue::spot);
    let futures = aggregate_range(&trades, args.granularity, start, end, BucketValue::futures);

    println!("{} buckets from {start} to {end}", args.granularity);
    println!("{}", tables::periods_table(&spot, &futures));
    Ok(())
}

async fn handle_tickers(args: TickersArgs, config: &Config) -> anyhow::Result<()> {
    let trades = load_source_trades(&args.source, config).await?;

    let spot = bucket_series(
        &ticker_totals(&trades, args.year, BucketValue::spot),
        BucketMeasure::Percent,
    );
    let futures = bucket_series(
        &ticker_totals(&trades, args.year, BucketValue::futures),
        BucketMeasure::Percent,
    );

    println!("Spot {}", args.year);
    println!("{}", tables::category_table("Ticker", &spot));
    println!("Futures {}", args.year);
    println!("{}", tables::category_table("Ticker", &futures));
    Ok(())
}
