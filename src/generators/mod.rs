//! Chart generators
//!
//! Each generator is a pure function of its input snapshot, the bucket and
//! the caller-supplied "now". Nothing is retained between calls.

pub mod concentrated;
pub mod fees;
pub mod standard;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use concentrated::{ConcentratedSeriesGenerator, ConcentratedSeriesInput, ShareSource};
pub use fees::{FeesSeriesGenerator, FeesSeriesInput};
pub use standard::{StandardSeriesGenerator, StandardSeriesInput};

use crate::buckets::BucketSpec;
use crate::error::ChartError;
use crate::models::{ConcentratedPoint, FeesPoint, StandardPoint, Timestamp};

/// Position shapes a chart can be requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionKind {
    Standard,
    Pool,
    Vault,
}

impl PositionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionKind::Standard => "standard",
            PositionKind::Pool => "pool",
            PositionKind::Vault => "vault",
        }
    }
}

/// Caller-controlled generation switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartOptions {
    /// Attach intermediate values to concentrated rows
    pub include_debug_breakdown: bool,
}

#[derive(Debug, Clone)]
pub enum ChartRequest {
    Standard(StandardSeriesInput),
    Concentrated(ConcentratedSeriesInput),
}

impl ChartRequest {
    pub fn kind(&self) -> PositionKind {
        match self {
            ChartRequest::Standard(_) => PositionKind::Standard,
            ChartRequest::Concentrated(input) => input.source.kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChartSeries {
    Standard(Vec<StandardPoint>),
    Concentrated(Vec<ConcentratedPoint>),
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        match self {
            ChartSeries::Standard(points) => points.len(),
            ChartSeries::Concentrated(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generate the value chart for any position kind
pub fn generate_chart(
    request: &ChartRequest,
    bucket: BucketSpec,
    now: Timestamp,
    options: ChartOptions,
) -> Result<ChartSeries, ChartError> {
    match request {
        ChartRequest::Standard(input) => Ok(ChartSeries::Standard(
            StandardSeriesGenerator::new(bucket).generate(input, now),
        )),
        ChartRequest::Concentrated(input) => ConcentratedSeriesGenerator::new(bucket)
            .with_options(options)
            .generate(input, now)
            .map(ChartSeries::Concentrated),
    }
}

/// Generate the harvested-fees chart
pub fn generate_fees_chart(
    input: &FeesSeriesInput,
    bucket: BucketSpec,
    now: Timestamp,
) -> Result<Vec<FeesPoint>, ChartError> {
    FeesSeriesGenerator::new(bucket).generate(input, now)
}

/// Sorted, deduplicated query times: every event instant inside
/// `[window_start, now]`, every interval tick from `window_start`, and `now`.
pub(crate) fn bucket_timestamps(
    bucket: &BucketSpec,
    window_start: Timestamp,
    now: Timestamp,
    events: impl IntoIterator<Item = Timestamp>,
) -> Vec<Timestamp> {
    let mut times: BTreeSet<Timestamp> = events
        .into_iter()
        .filter(|t| *t >= window_start && *t <= now)
        .collect();

    let step = bucket.sample_interval.max(1);
    let mut t = window_start;
    while t <= now {
        times.insert(t);
        t += step;
    }
    times.insert(now);

    times.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::TotalRange;

    fn bucket() -> BucketSpec {
        BucketSpec {
            sample_interval: 100,
            total_range: TotalRange::Bounded(300),
        }
    }

    #[test]
    fn test_bucket_timestamps_merges_events_ticks_and_now() {
        let times = bucket_timestamps(&bucket(), 1_000, 1_250, vec![950, 1_050, 1_100, 1_300]);
        assert_eq!(times, vec![1_000, 1_050, 1_100, 1_200, 1_250]);
    }

    #[test]
    fn test_bucket_timestamps_when_now_is_a_tick() {
        let times = bucket_timestamps(&bucket(), 1_000, 1_300, Vec::new());
        assert_eq!(times, vec![1_000, 1_100, 1_200, 1_300]);
    }

    #[test]
    fn test_bucket_timestamps_with_start_after_now() {
        let times = bucket_timestamps(&bucket(), 2_000, 1_300, vec![2_000]);
        assert_eq!(times, vec![1_300]);
    }

    #[test]
    fn test_position_kind_names() {
        assert_eq!(PositionKind::Standard.as_str(), "standard");
        assert_eq!(PositionKind::Pool.as_str(), "pool");
        assert_eq!(PositionKind::Vault.as_str(), "vault");
    }
}
