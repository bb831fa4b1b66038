use crate::simulator::{SimulationRun, round_currency};
use core_types::{SimulationPoint, TradeRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Headline numbers for one equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveStats {
    pub initial_capital: Decimal,
    pub final_capital: Decimal,
    pub net_pnl: Decimal,
    pub total_return_pct: Decimal,

    // Peak-to-trough decline of capital, in currency and as a share of the peak.
    pub max_drawdown: Decimal,
    pub max_drawdown_pct: Decimal,

    pub winning_trades: usize,
    pub losing_trades: usize,
}

impl CurveStats {
    pub fn from_curve(points: &[SimulationPoint]) -> Self {
        let initial_capital = points.first().map(|p| p.capital_after).unwrap_or_default();
        let final_capital = points.last().map(|p| p.capital_after).unwrap_or_default();
        let net_pnl = match final_capital.checked_sub(initial_capital) {
            Some(net) => round_currency(net),
            None => {
                tracing::warn!(%initial_capital, %final_capital, "Net PnL overflowed; saturating.");
                saturated(final_capital)
            }
        };

        let total_return_pct = if initial_capital > Decimal::ZERO {
            match percent_of(net_pnl, initial_capital) {
                Some(pct) => round_currency(pct),
                None => {
                    tracing::warn!(%net_pnl, %initial_capital, "Total return overflowed; saturating.");
                    saturated(net_pnl)
                }
            }
        } else {
            Decimal::ZERO
        };

        let (max_drawdown, max_drawdown_pct) = calculate_drawdown(points);

        let trades = points.iter().filter(|p| !p.is_origin());
        let (winning_trades, losing_trades) = trades.fold((0, 0), |(wins, losses), point| {
            if point.trade_pnl_percent > Decimal::ZERO {
                (wins + 1, losses)
            } else if point.trade_pnl_percent < Decimal::ZERO {
                (wins, losses + 1)
            } else {
                (wins, losses)
            }
        });

        Self {
            initial_capital,
            final_capital,
            net_pnl,
            total_return_pct,
            max_drawdown,
            max_drawdown_pct,
            winning_trades,
            losing_trades,
        }
    }
}

/// `part` as a percentage of `whole`, or `None` when the result leaves the decimal range.
fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?.checked_mul(dec!(100))
}

/// The largest representable value with the sign of `value`.
fn saturated(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Sums the present values, skipping any that would overflow the running total.
fn sum_percents(values: impl Iterator<Item = Option<Decimal>>) -> Decimal {
    values.flatten().fold(Decimal::ZERO, |total, value| {
        total.checked_add(value).unwrap_or_else(|| {
            tracing::warn!(%total, %value, "Percent sum overflowed; skipping value.");
            total
        })
    })
}

fn calculate_drawdown(points: &[SimulationPoint]) -> (Decimal, Decimal) {
    let mut peak = Decimal::ZERO;
    let mut max_drawdown = Decimal::ZERO;
    let mut max_drawdown_pct = Decimal::ZERO;

    for point in points {
        let capital = point.capital_after;
        if capital > peak {
            peak = capital;
        }
        // Capital can fall below zero, which may push the drawdown past the decimal range.
        let drawdown = peak.checked_sub(capital).unwrap_or(Decimal::MAX);
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
        if peak > Decimal::ZERO {
            let drawdown_pct = percent_of(drawdown, peak).unwrap_or(Decimal::MAX);
            if drawdown_pct > max_drawdown_pct {
                max_drawdown_pct = drawdown_pct;
            }
        }
    }

    (round_currency(max_drawdown), round_currency(max_drawdown_pct))
}

/// Summary of a full simulation run across both market modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_trades: usize,
    /// Plain sum of per-trade percentages, without compounding.
    pub sum_percent_spot: Decimal,
    pub sum_percent_futures: Decimal,
    pub spot: CurveStats,
    pub futures: CurveStats,
}

impl PerformanceSummary {
    pub fn from_run(trades: &[TradeRecord], run: &SimulationRun) -> Self {
        Self {
            total_trades: trades.len(),
            sum_percent_spot: sum_percents(trades.iter().map(|t| t.pnl_percent_spot)),
            sum_percent_futures: sum_percents(trades.iter().map(|t| t.pnl_percent_futures)),
            spot: CurveStats::from_curve(&run.spot),
            futures: CurveStats::from_curve(&run.futures),
        }
    }
}
