//! Property tests for the compounding simulator.
//!
//! Uses proptest to verify:
//! 1. Curve length: one origin point plus one point per trade
//! 2. Origin: the first point carries the starting capital and zero PnL
//! 3. Exhaustion: once capital is gone, later trades have no effect
//! 4. Zero-effect trades: a missing or zero percent leaves capital unchanged
//! 5. Bucket conservation: aggregated sums equal the raw total

use analytics::{BucketValue, aggregate, simulate};
use chrono::{Days, NaiveDate};
use core_types::{Granularity, MarketMode, TradeRecord};
use proptest::prelude::*;
use rust_decimal::Decimal;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_percent() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![
        1 => Just(None),
        1 => Just(Some(Decimal::ZERO)),
        6 => (-150_000i64..150_000).prop_map(|hundredths| Some(Decimal::new(hundredths, 2))),
    ]
}

fn arb_capital() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_trades() -> impl Strategy<Value = Vec<TradeRecord>> {
    prop::collection::vec((0u64..1500, arb_percent(), arb_percent()), 0..40).prop_map(|rows| {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let mut trades: Vec<TradeRecord> = rows
            .into_iter()
            .map(|(offset, spot, futures)| TradeRecord {
                date: start + Days::new(offset),
                ticker: "BTC".to_string(),
                direction: "long".to_string(),
                pnl_percent_spot: spot,
                pnl_percent_futures: futures,
                status: "TP".to_string(),
            })
            .collect();
        trades.sort_by_key(|t| t.date);
        trades
    })
}

fn arb_mode() -> impl Strategy<Value = MarketMode> {
    prop_oneof![Just(MarketMode::Spot), Just(MarketMode::Futures)]
}

proptest! {
    #[test]
    fn curve_has_one_point_per_trade_plus_origin(
        capital in arb_capital(),
        trades in arb_trades(),
        mode in arb_mode(),
    ) {
        let points = simulate(capital, &trades, mode);
        prop_assert_eq!(points.len(), trades.len() + 1);
        for (point, trade) in points.iter().skip(1).zip(&trades) {
            prop_assert_eq!(point.date, trade.date);
        }
    }

    #[test]
    fn origin_carries_initial_capital(
        capital in arb_capital(),
        trades in arb_trades(),
        mode in arb_mode(),
    ) {
        let points = simulate(capital, &trades, mode);
        prop_assert!(points[0].is_origin());
        prop_assert_eq!(points[0].capital_after, capital);
        prop_assert_eq!(points[0].trade_pnl_absolute, Decimal::ZERO);
        prop_assert_eq!(points[0].cumulative_net_pnl, Decimal::ZERO);
    }

    #[test]
    fn exhausted_capital_stops_trading(
        capital in arb_capital(),
        trades in arb_trades(),
        mode in arb_mode(),
    ) {
        let points = simulate(capital, &trades, mode);
        for pair in points.windows(2) {
            if pair[0].capital_after <= Decimal::ZERO {
                prop_assert_eq!(pair[1].capital_after, pair[0].capital_after);
                prop_assert_eq!(pair[1].trade_pnl_absolute, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn zero_effect_trades_leave_capital_unchanged(
        capital in arb_capital(),
        trades in arb_trades(),
        mode in arb_mode(),
    ) {
        let points = simulate(capital, &trades, mode);
        for (index, trade) in trades.iter().enumerate() {
            if trade.pnl_percent(mode).is_zero() {
                prop_assert_eq!(points[index + 1].capital_after, points[index].capital_after);
                prop_assert_eq!(points[index + 1].trade_pnl_absolute, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn aggregation_conserves_totals(trades in arb_trades()) {
        let total: Decimal = trades.iter().map(|t| t.pnl_percent(MarketMode::Spot)).sum();
        for granularity in [Granularity::Daily, Granularity::Monthly, Granularity::Yearly] {
            let buckets = aggregate(&trades, granularity, |_| None, BucketValue::spot);
            let sum: Decimal = buckets.iter().map(|b| b.sum_percent).sum();
            let count: usize = buckets.iter().map(|b| b.count).sum();
            prop_assert_eq!(sum, total);
            prop_assert_eq!(count, trades.len());
        }
    }
}
