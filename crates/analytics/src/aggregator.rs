use chrono::{Datelike, Months, NaiveDate};
use core_types::{Granularity, PeriodBucket, SimulationPoint, TradeRecord};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Anything that can be placed on the calendar.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for TradeRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for SimulationPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// The amounts one item contributes to its bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketValue {
    pub percent: Decimal,
    pub absolute: Decimal,
}

impl BucketValue {
    pub fn percent(percent: Decimal) -> Self {
        Self {
            percent,
            absolute: Decimal::ZERO,
        }
    }

    pub fn spot(trade: &TradeRecord) -> Self {
        Self::percent(trade.pnl_percent_spot.unwrap_or_default())
    }

    pub fn futures(trade: &TradeRecord) -> Self {
        Self::percent(trade.pnl_percent_futures.unwrap_or_default())
    }

    /// Spot and futures percent added together. Zero when the sum leaves the decimal range.
    pub fn combined(trade: &TradeRecord) -> Self {
        let spot = Self::spot(trade).percent;
        let futures = Self::futures(trade).percent;
        Self::percent(spot.checked_add(futures).unwrap_or_else(|| {
            tracing::warn!(%spot, %futures, "Combined percent overflowed; treating trade as zero-effect.");
            Decimal::ZERO
        }))
    }

    /// Per-trade PnL of a simulated point, both as percent and currency.
    pub fn from_point(point: &SimulationPoint) -> Self {
        Self {
            percent: point.trade_pnl_percent,
            absolute: point.trade_pnl_absolute,
        }
    }
}

/// Adds one item to a bucket. An item whose amounts would overflow the sums is
/// still counted but contributes nothing.
fn accumulate(bucket: &mut PeriodBucket, value: BucketValue) {
    let sums = bucket
        .sum_percent
        .checked_add(value.percent)
        .zip(bucket.sum_absolute.checked_add(value.absolute));
    match sums {
        Some((percent, absolute)) => {
            bucket.sum_percent = percent;
            bucket.sum_absolute = absolute;
        }
        None => tracing::warn!(
            period = %bucket.period_key,
            percent = %value.percent,
            absolute = %value.absolute,
            "Bucket sum overflowed; treating item as zero-effect."
        ),
    }
    bucket.count += 1;
}

/// Canonical key for the period containing `date`: `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
///
/// Keys of one granularity sort lexicographically in chronological order.
pub fn period_key(date: NaiveDate, granularity: Granularity) -> String {
    let format = match granularity {
        Granularity::Daily => "%Y-%m-%d",
        Granularity::Monthly => "%Y-%m",
        Granularity::Yearly => "%Y",
    };
    date.format(format).to_string()
}

/// Largest continuous range callers should request; about 27 years of days.
pub const MAX_RANGE_PERIODS: u64 = 10_000;

/// Number of periods a continuous range from `start` to `end` spans, zero when reversed.
pub fn period_span(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> u64 {
    if start > end {
        return 0;
    }
    let span = match granularity {
        Granularity::Daily => (end - start).num_days(),
        Granularity::Monthly => {
            let months = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
            months(end) - months(start)
        }
        Granularity::Yearly => i64::from(end.year()) - i64::from(start.year()),
    };
    u64::try_from(span).map_or(0, |span| span + 1)
}

fn period_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily => date,
        Granularity::Monthly => date.with_day(1).unwrap_or(date),
        Granularity::Yearly => date.with_ordinal(1).unwrap_or(date),
    }
}

fn next_period(start: NaiveDate, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Daily => start.succ_opt(),
        Granularity::Monthly => start.checked_add_months(Months::new(1)),
        Granularity::Yearly => start.checked_add_months(Months::new(12)),
    }
}

/// Groups items into buckets by period and an optional secondary key.
///
/// Only periods that contain at least one item are returned, ordered by period
/// key and then by secondary key (items without one first).
pub fn aggregate<T, K, V>(
    items: &[T],
    granularity: Granularity,
    key_fn: K,
    value_fn: V,
) -> Vec<PeriodBucket>
where
    T: Dated,
    K: Fn(&T) -> Option<String>,
    V: Fn(&T) -> BucketValue,
{
    let mut buckets: BTreeMap<(String, Option<String>), PeriodBucket> = BTreeMap::new();
    for item in items {
        let period = period_key(item.date(), granularity);
        let group = key_fn(item);
        let bucket = buckets
            .entry((period.clone(), group.clone()))
            .or_insert_with(|| PeriodBucket::empty(period, group));
        accumulate(bucket, value_fn(item));
    }
    buckets.into_values().collect()
}

/// Continuous aggregation: one bucket for every period between `start` and
/// `end` inclusive, zero-filled where nothing happened.
///
/// Items belong to a bucket when their period key falls inside the range, so a
/// monthly range starting mid-month still counts the whole first month. Items in
/// periods outside the range are ignored. A reversed range yields no buckets.
pub fn aggregate_range<T, V>(
    items: &[T],
    granularity: Granularity,
    start: NaiveDate,
    end: NaiveDate,
    value_fn: V,
) -> Vec<PeriodBucket>
where
    T: Dated,
    V: Fn(&T) -> BucketValue,
{
    if start > end {
        return Vec::new();
    }

    let mut buckets = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let last = period_start(end, granularity);
    let mut cursor = Some(period_start(start, granularity));
    while let Some(current) = cursor.filter(|c| *c <= last) {
        let key = period_key(current, granularity);
        index.insert(key.clone(), buckets.len());
        buckets.push(PeriodBucket::empty(key, None));
        cursor = next_period(current, granularity);
    }

    for item in items {
        if let Some(&slot) = index.get(&period_key(item.date(), granularity)) {
            accumulate(&mut buckets[slot], value_fn(item));
        }
    }

    buckets
}

/// Categorical aggregation restricted to one calendar year.
///
/// The year filter runs before grouping. Groups come back in order of first
/// appearance, and groups whose totals are both zero are dropped. The returned
/// buckets use the year as period key and the category as group key.
pub fn categorical_totals<T, K, V>(items: &[T], year: i32, key_fn: K, value_fn: V) -> Vec<PeriodBucket>
where
    T: Dated,
    K: Fn(&T) -> String,
    V: Fn(&T) -> BucketValue,
{
    let period = format!("{year:04}");
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, PeriodBucket> = HashMap::new();

    for item in items.iter().filter(|item| item.date().year() == year) {
        let key = key_fn(item);
        let bucket = totals.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            PeriodBucket::empty(period.clone(), Some(key))
        });
        accumulate(bucket, value_fn(item));
    }

    order
        .into_iter()
        .filter_map(|key| totals.remove(&key))
        .filter(|bucket| !(bucket.sum_percent.is_zero() && bucket.sum_absolute.is_zero()))
        .collect()
}

/// Total return per ticker for one year.
pub fn ticker_totals<V>(trades: &[TradeRecord], year: i32, value_fn: V) -> Vec<PeriodBucket>
where
    V: Fn(&TradeRecord) -> BucketValue,
{
    categorical_totals(trades, year, |trade| trade.ticker.clone(), value_fn)
}

/// The simulated trades of a curve, without its origin point.
pub fn trade_points(points: &[SimulationPoint]) -> &[SimulationPoint] {
    match points.split_first() {
        Some((first, rest)) if first.is_origin() => rest,
        _ => points,
    }
}

/// Trades for one ticker, or all of them when `ticker` is `None`.
pub fn filter_by_ticker(trades: &[TradeRecord], ticker: Option<&str>) -> Vec<TradeRecord> {
    match ticker {
        Some(wanted) => trades
            .iter()
            .filter(|trade| trade.ticker.eq_ignore_ascii_case(wanted))
            .cloned()
            .collect(),
        None => trades.to_vec(),
    }
}

/// Distinct tickers in order of first appearance.
pub fn unique_tickers(trades: &[TradeRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tickers = Vec::new();
    for trade in trades {
        if seen.insert(trade.ticker.as_str()) {
            tickers.push(trade.ticker.clone());
        }
    }
    tickers
}

/// Earliest and latest date among `items`.
pub fn date_bounds<T: Dated>(items: &[T]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = items.iter().map(Dated::date);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trade(date: NaiveDate, ticker: &str, spot: Decimal, futures: Decimal) -> TradeRecord {
        TradeRecord {
            date,
            ticker: ticker.to_string(),
            direction: "long".to_string(),
            pnl_percent_spot: Some(spot),
            pnl_percent_futures: Some(futures),
            status: "TP".to_string(),
        }
    }

    #[test]
    fn period_keys_per_granularity() {
        let date = ymd(2024, 3, 7);
        assert_eq!(period_key(date, Granularity::Daily), "2024-03-07");
        assert_eq!(period_key(date, Granularity::Monthly), "2024-03");
        assert_eq!(period_key(date, Granularity::Yearly), "2024");
    }

    #[test]
    fn monthly_buckets_sum_and_count() {
        let trades = vec![
            trade(ymd(2024, 1, 3), "BTC", dec!(2), dec!(1)),
            trade(ymd(2024, 1, 20), "ETH", dec!(-1), dec!(4)),
            trade(ymd(2024, 3, 1), "BTC", dec!(5), dec!(0)),
        ];
        let buckets = aggregate(&trades, Granularity::Monthly, |_| None, BucketValue::spot);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period_key, "2024-01");
        assert_eq!(buckets[0].sum_percent, dec!(1));
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[1].period_key, "2024-03");
        assert_eq!(buckets[1].sum_percent, dec!(5));
    }

    #[test]
    fn bucket_sums_equal_total_across_granularities() {
        let trades = vec![
            trade(ymd(2023, 12, 31), "BTC", dec!(1.5), dec!(0)),
            trade(ymd(2024, 1, 1), "ETH", dec!(-0.25), dec!(0)),
            trade(ymd(2024, 6, 15), "SOL", dec!(3), dec!(0)),
        ];
        let total: Decimal = trades.iter().map(|t| BucketValue::spot(t).percent).sum();
        for granularity in [Granularity::Daily, Granularity::Monthly, Granularity::Yearly] {
            let buckets = aggregate(&trades, granularity, |_| None, BucketValue::spot);
            let sum: Decimal = buckets.iter().map(|b| b.sum_percent).sum();
            let count: usize = buckets.iter().map(|b| b.count).sum();
            assert_eq!(sum, total);
            assert_eq!(count, trades.len());
        }
    }

    #[test]
    fn secondary_key_splits_buckets() {
        let trades = vec![
            trade(ymd(2024, 1, 3), "ETH", dec!(1), dec!(0)),
            trade(ymd(2024, 1, 4), "BTC", dec!(2), dec!(0)),
            trade(ymd(2024, 1, 5), "ETH", dec!(3), dec!(0)),
        ];
        let buckets = aggregate(
            &trades,
            Granularity::Monthly,
            |t| Some(t.ticker.clone()),
            BucketValue::spot,
        );
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].group_key.as_deref(), Some("BTC"));
        assert_eq!(buckets[1].group_key.as_deref(), Some("ETH"));
        assert_eq!(buckets[1].sum_percent, dec!(4));
    }

    #[test]
    fn continuous_range_fills_empty_periods() {
        let trades = vec![
            trade(ymd(2024, 1, 10), "BTC", dec!(2), dec!(0)),
            trade(ymd(2024, 3, 5), "BTC", dec!(-1), dec!(0)),
        ];
        let buckets = aggregate_range(
            &trades,
            Granularity::Monthly,
            ymd(2024, 1, 15),
            ymd(2024, 3, 31),
            BucketValue::spot,
        );
        let keys: Vec<&str> = buckets.iter().map(|b| b.period_key.as_str()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(buckets[0].sum_percent, dec!(2));
        assert_eq!(buckets[1].sum_percent, Decimal::ZERO);
        assert_eq!(buckets[1].count, 0);
        assert_eq!(buckets[2].sum_percent, dec!(-1));
    }

    #[test]
    fn continuous_daily_range_crosses_month_end() {
        let buckets = aggregate_range::<TradeRecord, _>(
            &[],
            Granularity::Daily,
            ymd(2024, 2, 28),
            ymd(2024, 3, 1),
            BucketValue::spot,
        );
        let keys: Vec<&str> = buckets.iter().map(|b| b.period_key.as_str()).collect();
        assert_eq!(keys, vec!["2024-02-28", "2024-02-29", "2024-03-01"]);
    }

    #[test]
    fn continuous_range_ignores_items_outside_and_rejects_reversed_bounds() {
        let trades = vec![trade(ymd(2025, 1, 1), "BTC", dec!(9), dec!(0))];
        let buckets = aggregate_range(
            &trades,
            Granularity::Yearly,
            ymd(2023, 1, 1),
            ymd(2024, 12, 31),
            BucketValue::spot,
        );
        assert_eq!(buckets.len(), 2);
        assert!(buckets.iter().all(|b| b.count == 0));

        let reversed = aggregate_range(
            &trades,
            Granularity::Yearly,
            ymd(2025, 1, 1),
            ymd(2024, 1, 1),
            BucketValue::spot,
        );
        assert!(reversed.is_empty());
    }

    #[test]
    fn ticker_totals_filter_year_and_drop_zero_totals() {
        let trades = vec![
            trade(ymd(2024, 2, 1), "ETH", dec!(3), dec!(1)),
            trade(ymd(2024, 2, 2), "BTC", dec!(2), dec!(1)),
            trade(ymd(2024, 2, 3), "ETH", dec!(-3), dec!(1)),
            trade(ymd(2023, 2, 3), "SOL", dec!(7), dec!(1)),
            trade(ymd(2024, 5, 3), "BTC", dec!(1), dec!(1)),
        ];
        let totals = ticker_totals(&trades, 2024, BucketValue::spot);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].group_key.as_deref(), Some("BTC"));
        assert_eq!(totals[0].period_key, "2024");
        assert_eq!(totals[0].sum_percent, dec!(3));
        assert_eq!(totals[0].count, 2);

        // First-appearance order is preserved.
        let futures = ticker_totals(&trades, 2024, BucketValue::futures);
        let order: Vec<&str> = futures.iter().filter_map(|b| b.group_key.as_deref()).collect();
        assert_eq!(order, vec!["ETH", "BTC"]);
    }

    #[test]
    fn oversized_values_are_counted_without_overflowing() {
        let huge = Decimal::from_scientific("7e28").unwrap();
        let trades = vec![
            trade(ymd(2024, 1, 1), "BTC", huge, dec!(0)),
            trade(ymd(2024, 1, 2), "BTC", huge, dec!(0)),
            trade(ymd(2024, 1, 3), "BTC", dec!(-1), dec!(0)),
        ];
        let buckets = aggregate(&trades, Granularity::Monthly, |_| None, BucketValue::spot);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].sum_percent, huge - dec!(1));
        assert_eq!(buckets[0].count, 3);

        let totals = ticker_totals(&trades, 2024, BucketValue::spot);
        assert_eq!(totals[0].sum_percent, huge - dec!(1));

        let combined = trade(ymd(2024, 1, 4), "BTC", huge, huge);
        assert_eq!(BucketValue::combined(&combined).percent, Decimal::ZERO);
    }

    #[test]
    fn combined_value_adds_both_modes() {
        let trades = vec![
            trade(ymd(2024, 1, 3), "BTC", dec!(2), dec!(-0.5)),
            trade(ymd(2024, 1, 9), "ETH", dec!(1), dec!(4)),
        ];
        let buckets = aggregate(&trades, Granularity::Monthly, |_| None, BucketValue::combined);
        assert_eq!(buckets[0].sum_percent, dec!(6.5));

        let missing = TradeRecord {
            pnl_percent_futures: None,
            ..trades[0].clone()
        };
        assert_eq!(BucketValue::combined(&missing).percent, dec!(2));
    }

    #[test]
    fn period_span_counts_inclusive_periods() {
        let start = ymd(2023, 12, 31);
        let end = ymd(2024, 2, 1);
        assert_eq!(period_span(start, end, Granularity::Daily), 33);
        assert_eq!(period_span(start, end, Granularity::Monthly), 3);
        assert_eq!(period_span(start, end, Granularity::Yearly), 2);
        assert_eq!(period_span(end, start, Granularity::Daily), 0);

        let buckets = aggregate_range::<TradeRecord, _>(&[], Granularity::Monthly, start, end, BucketValue::spot);
        assert_eq!(buckets.len() as u64, period_span(start, end, Granularity::Monthly));
        assert_eq!(period_span(ymd(1, 1, 1), ymd(9999, 12, 31), Granularity::Daily), 3_652_059);
    }

    #[test]
    fn point_values_use_simulated_pnl() {
        let point = SimulationPoint {
            date: ymd(2024, 1, 1),
            capital_after: dec!(1010),
            trade_pnl_absolute: dec!(10),
            trade_pnl_percent: dec!(10),
            cumulative_net_pnl: dec!(10),
            trade: None,
        };
        let origin = SimulationPoint::origin(ymd(2024, 1, 1), dec!(1000));
        let points = vec![origin, point];
        let buckets = aggregate(trade_points(&points), Granularity::Yearly, |_| None, BucketValue::from_point);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].sum_absolute, dec!(10));
        assert_eq!(buckets[0].count, 1);
    }

    #[test]
    fn ticker_helpers() {
        let trades = vec![
            trade(ymd(2024, 3, 1), "ETH", dec!(1), dec!(0)),
            trade(ymd(2024, 1, 1), "BTC", dec!(1), dec!(0)),
            trade(ymd(2024, 2, 1), "ETH", dec!(1), dec!(0)),
        ];
        assert_eq!(unique_tickers(&trades), vec!["ETH", "BTC"]);
        assert_eq!(filter_by_ticker(&trades, Some("eth")).len(), 2);
        assert_eq!(filter_by_ticker(&trades, None).len(), 3);
        assert_eq!(date_bounds(&trades), Some((ymd(2024, 1, 1), ymd(2024, 3, 1))));
        assert_eq!(date_bounds::<TradeRecord>(&[]), None);
    }
}
