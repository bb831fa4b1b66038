use chrono::NaiveDate;
use core_types::{MarketMode, SimulationPoint, TradeRecord};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Share of current capital put at risk on every trade.
pub const ALLOCATION_FRACTION: Decimal = dec!(0.10);

/// Starting capital used when the caller does not choose one.
pub const DEFAULT_INITIAL_CAPITAL: Decimal = dec!(10000);

const ONE_HUNDRED: Decimal = dec!(100);
const CURRENCY_DP: u32 = 2;

pub(crate) fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Compounds `initial_capital` across `trades` for one market mode.
///
/// `trades` must already be sorted by date. The output always starts with a
/// synthetic origin point and then holds exactly one point per trade, so its
/// length is `trades.len() + 1`. Negative capital is clamped to zero.
///
/// For each trade, `capital * ALLOCATION_FRACTION * percent / 100` is added to
/// the running capital. Trades with a zero or missing percent, or any trade once
/// capital has reached zero, leave capital unchanged.
pub fn simulate(
    initial_capital: Decimal,
    trades: &[TradeRecord],
    mode: MarketMode,
) -> Vec<SimulationPoint> {
    let initial_capital = initial_capital.max(Decimal::ZERO);
    let origin_date = trades
        .first()
        .map(|trade| trade.date)
        .unwrap_or_else(NaiveDate::default);

    let mut points = Vec::with_capacity(trades.len() + 1);
    points.push(SimulationPoint::origin(origin_date, initial_capital));

    let mut capital = initial_capital;
    for trade in trades {
        let percent = trade.pnl_percent(mode);
        let pnl_amount = if capital > Decimal::ZERO && !percent.is_zero() {
            trade_pnl(capital, percent)
        } else {
            Decimal::ZERO
        };

        // An amount that would overflow the running capital is dropped like a bad value.
        let (next_capital, pnl_amount) = match capital.checked_add(pnl_amount) {
            Some(next) => (next, pnl_amount),
            None => (capital, Decimal::ZERO),
        };
        capital = next_capital;

        points.push(SimulationPoint {
            date: trade.date,
            capital_after: round_currency(capital),
            trade_pnl_absolute: round_currency(pnl_amount),
            trade_pnl_percent: percent,
            // Only a capital driven far below zero can leave the decimal range here.
            cumulative_net_pnl: capital
                .checked_sub(initial_capital)
                .map_or(Decimal::MIN, round_currency),
            trade: Some(trade.clone()),
        });
    }

    points
}

fn trade_pnl(capital: Decimal, percent: Decimal) -> Decimal {
    let allocation = capital * ALLOCATION_FRACTION;
    match allocation.checked_mul(percent / ONE_HUNDRED) {
        Some(amount) => amount,
        None => {
            tracing::warn!(%capital, %percent, "Trade PnL overflowed; treating trade as zero-effect.");
            Decimal::ZERO
        }
    }
}

/// Both equity curves for the same trade list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRun {
    pub spot: Vec<SimulationPoint>,
    pub futures: Vec<SimulationPoint>,
}

impl SimulationRun {
    pub fn curve(&self, mode: MarketMode) -> &[SimulationPoint] {
        match mode {
            MarketMode::Spot => &self.spot,
            MarketMode::Futures => &self.futures,
        }
    }

    /// Number of trades simulated (the origin point is not a trade).
    pub fn trade_count(&self) -> usize {
        self.spot.len().saturating_sub(1)
    }
}

/// Runs the spot and futures simulations with independent starting capitals.
pub fn simulate_both(
    spot_capital: Decimal,
    futures_capital: Decimal,
    trades: &[TradeRecord],
) -> SimulationRun {
    tracing::debug!(trades = trades.len(), %spot_capital, %futures_capital, "Simulating equity curves.");
    SimulationRun {
        spot: simulate(spot_capital, trades, MarketMode::Spot),
        futures: simulate(futures_capital, trades, MarketMode::Futures),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(date: &str, spot: Option<Decimal>, futures: Option<Decimal>) -> TradeRecord {
        TradeRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            ticker: "BTC".to_string(),
            direction: "long".to_string(),
            pnl_percent_spot: spot,
            pnl_percent_futures: futures,
            status: "TP".to_string(),
        }
    }

    fn capitals(points: &[SimulationPoint]) -> Vec<Decimal> {
        points.iter().map(|p| p.capital_after).collect()
    }

    #[test]
    fn ten_percent_return_on_a_thousand() {
        let points = simulate(dec!(1000), &[trade("2024-01-01", Some(dec!(10)), None)], MarketMode::Spot);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].capital_after, dec!(1010.00));
        assert_eq!(points[1].trade_pnl_absolute, dec!(10.00));
        assert_eq!(points[1].trade_pnl_percent, dec!(10));
        assert_eq!(points[1].cumulative_net_pnl, dec!(10.00));
    }

    #[test]
    fn two_trade_scenario_for_both_modes() {
        let trades = vec![
            trade("2024-01-01", Some(dec!(5)), Some(dec!(-2))),
            trade("2024-01-02", Some(dec!(-3)), Some(dec!(8))),
        ];
        let run = simulate_both(dec!(10000), dec!(10000), &trades);

        assert_eq!(capitals(&run.spot), vec![dec!(10000), dec!(10050), dec!(10019.85)]);
        assert_eq!(run.spot[2].trade_pnl_absolute, dec!(-30.15));
        assert_eq!(run.spot[2].cumulative_net_pnl, dec!(19.85));

        assert_eq!(capitals(&run.futures), vec![dec!(10000), dec!(9980), dec!(10059.84)]);
        assert_eq!(run.futures[2].trade_pnl_absolute, dec!(79.84));
        assert_eq!(run.trade_count(), 2);
    }

    #[test]
    fn origin_point_is_first_and_carries_initial_capital() {
        let trades = vec![trade("2024-05-01", Some(dec!(1)), None)];
        let points = simulate(dec!(2500), &trades, MarketMode::Spot);
        assert!(points[0].is_origin());
        assert_eq!(points[0].date, trades[0].date);
        assert_eq!(points[0].capital_after, dec!(2500));
        assert_eq!(points[0].trade_pnl_absolute, Decimal::ZERO);
        assert_eq!(points[0].cumulative_net_pnl, Decimal::ZERO);
    }

    #[test]
    fn empty_trade_list_yields_a_single_origin_at_the_epoch() {
        let points = simulate(DEFAULT_INITIAL_CAPITAL, &[], MarketMode::Futures);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        assert_eq!(points[0].capital_after, dec!(10000));
    }

    #[test]
    fn missing_percent_is_a_zero_effect_trade() {
        let trades = vec![
            trade("2024-01-01", None, None),
            trade("2024-01-02", Some(dec!(0)), None),
        ];
        let points = simulate(dec!(1000), &trades, MarketMode::Spot);
        assert_eq!(capitals(&points), vec![dec!(1000), dec!(1000), dec!(1000)]);
        assert!(points.iter().all(|p| p.trade_pnl_absolute.is_zero()));
        assert_eq!(points[1].trade_pnl_percent, Decimal::ZERO);
    }

    #[test]
    fn negative_capital_is_clamped_and_never_trades() {
        let points = simulate(dec!(-500), &[trade("2024-01-01", Some(dec!(50)), None)], MarketMode::Spot);
        assert_eq!(points[0].capital_after, Decimal::ZERO);
        assert_eq!(points[1].capital_after, Decimal::ZERO);
        assert_eq!(points[1].trade_pnl_absolute, Decimal::ZERO);
    }

    #[test]
    fn total_loss_stops_further_compounding() {
        // A -1000% return on a 10% allocation wipes out the account.
        let trades = vec![
            trade("2024-01-01", Some(dec!(-1000)), None),
            trade("2024-01-02", Some(dec!(50)), None),
        ];
        let points = simulate(dec!(1000), &trades, MarketMode::Spot);
        assert_eq!(points[1].capital_after, Decimal::ZERO);
        assert_eq!(points[2].capital_after, Decimal::ZERO);
        assert_eq!(points[2].trade_pnl_absolute, Decimal::ZERO);
    }

    #[test]
    fn rerunning_with_new_capital_is_independent() {
        let trades = vec![trade("2024-01-01", Some(dec!(4)), Some(dec!(6)))];
        let first = simulate(dec!(1000), &trades, MarketMode::Spot);
        let _other = simulate(dec!(50000), &trades, MarketMode::Spot);
        let again = simulate(dec!(1000), &trades, MarketMode::Spot);
        assert_eq!(first, again);
    }

    #[test]
    fn points_keep_the_source_trade_for_detail_display() {
        let trades = vec![trade("2024-02-10", Some(dec!(3)), None)];
        let points = simulate(dec!(1000), &trades, MarketMode::Spot);
        assert_eq!(points[1].trade.as_ref(), Some(&trades[0]));
        assert_eq!(points[1].date, trades[0].date);
    }
}
