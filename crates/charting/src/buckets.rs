use core_types::PeriodBucket;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which aggregate of a bucket to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketMeasure {
    Percent,
    Absolute,
    Count,
}

/// One bar or pie slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPoint {
    pub label: String,
    pub value: Decimal,
    pub count: usize,
}

/// Maps buckets to category points, keeping their order.
///
/// Buckets with a group key are labelled by it (a ticker); the rest by their period key.
pub fn bucket_series(buckets: &[PeriodBucket], measure: BucketMeasure) -> Vec<CategoryPoint> {
    buckets
        .iter()
        .map(|bucket| CategoryPoint {
            label: bucket
                .group_key
                .clone()
                .unwrap_or_else(|| bucket.period_key.clone()),
            value: match measure {
                BucketMeasure::Percent => bucket.sum_percent,
                BucketMeasure::Absolute => bucket.sum_absolute,
                BucketMeasure::Count => Decimal::from(bucket.count),
            },
            count: bucket.count,
        })
        .collect()
}
