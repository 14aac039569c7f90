//! Readiness/pulse summary.
//!
//! Values arrive already rounded to the scale step; this module only reduces
//! them (mean, sorted median, extremes, fixed-width buckets).

use crate::models::{PulseContribution, PulseScale};
use crate::routes::pulse::{DistributionBucket, PulseSummary};

/// Summarize pulse contributions on `scale` with `bucket_count` buckets.
pub fn summarize_contributions(
    contributions: &[PulseContribution],
    scale: &PulseScale,
    bucket_count: usize,
) -> PulseSummary {
    let values: Vec<f64> = contributions.iter().map(|c| c.value).collect();
    summarize(&values, scale, bucket_count)
}

/// Summary statistics of `values`.
///
/// Non-finite values are skipped. An empty input yields zeros and empty
/// buckets.
pub fn summarize(values: &[f64], scale: &PulseScale, bucket_count: usize) -> PulseSummary {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.len() != values.len() {
        log::warn!(
            "Skipped {} non-finite pulse values",
            values.len() - sorted.len()
        );
    }
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let buckets = bucketize(&sorted, scale, bucket_count);

    if count == 0 {
        return PulseSummary {
            count,
            average: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            buckets,
        };
    }

    let average = sorted.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    PulseSummary {
        count,
        average,
        median,
        min: sorted[0],
        max: sorted[count - 1],
        buckets,
    }
}

/// Count values into `bucket_count` equal-width ranges over the scale.
///
/// Values outside the scale are clamped into the first or last bucket.
fn bucketize(values: &[f64], scale: &PulseScale, bucket_count: usize) -> Vec<DistributionBucket> {
    let n = bucket_count.max(1);
    let span = scale.max - scale.min;

    if span <= 0.0 {
        return vec![DistributionBucket {
            lower: scale.min,
            upper: scale.max,
            count: values.len() as u32,
        }];
    }

    let width = span / n as f64;
    let mut buckets: Vec<DistributionBucket> = (0..n)
        .map(|i| DistributionBucket {
            lower: scale.min + width * i as f64,
            upper: if i + 1 == n {
                scale.max
            } else {
                scale.min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &value in values {
        let offset = ((value - scale.min) / width).floor();
        let idx = if offset <= 0.0 {
            0
        } else {
            (offset as usize).min(n - 1)
        };
        buckets[idx].count += 1;
    }

    buckets
}
