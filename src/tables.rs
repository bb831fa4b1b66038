use analytics::{CurveStats, PerformanceSummary};
use charting::CategoryPoint;
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use core_types::{PeriodBucket, SimulationPoint};

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn number(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

pub fn curve_table(points: &[SimulationPoint]) -> Table {
    let mut table = table(vec!["#", "Date", "Ticker", "Direction", "PnL %", "PnL", "Capital", "Net PnL"]);
    for (index, point) in points.iter().enumerate() {
        let (ticker, direction) = point
            .trade
            .as_ref()
            .map(|t| (t.ticker.as_str(), t.direction.as_str()))
            .unwrap_or(("", ""));
        table.add_row(vec![
            number(index),
            Cell::new(point.label()),
            Cell::new(ticker),
            Cell::new(direction),
            number(point.trade_pnl_percent),
            number(point.trade_pnl_absolute),
            number(point.capital_after),
            number(point.cumulative_net_pnl),
        ]);
    }
    table
}

fn stats_row(mode: &str, stats: &CurveStats) -> Vec<Cell> {
    vec![
        Cell::new(mode),
        number(stats.initial_capital),
        number(stats.final_capital),
        number(stats.net_pnl),
        number(format!("{}%", stats.total_return_pct)),
        number(format!("{} ({}%)", stats.max_drawdown, stats.max_drawdown_pct)),
        number(format!("{}/{}", stats.winning_trades, stats.losing_trades)),
    ]
}

pub fn summary_table(summary: &PerformanceSummary) -> Table {
    let mut table = table(vec![
        "Mode", "Initial", "Final", "Net PnL", "Return", "Max Drawdown", "Wins/Losses",
    ]);
    table.add_row(stats_row("Spot", &summary.spot));
    table.add_row(stats_row("Futures", &summary.futures));
    table
}

pub fn periods_table(spot: &[PeriodBucket], futures: &[PeriodBucket]) -> Table {
    let mut table = table(vec!["Period", "Trades", "Spot %", "Futures %"]);
    for (spot, futures) in spot.iter().zip(futures) {
        table.add_row(vec![
            Cell::new(&spot.period_key),
            number(spot.count),
            number(spot.sum_percent),
            number(futures.sum_percent),
        ]);
    }
    table
}

pub fn category_table(title: &str, points: &[CategoryPoint]) -> Table {
    let mut table = table(vec![title, "Trades", "Total %"]);
    for point in points {
        table.add_row(vec![
            Cell::new(&point.label),
            number(point.count),
            number(point.value),
        ]);
    }
    table
}
