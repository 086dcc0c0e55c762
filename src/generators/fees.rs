//! Cumulative harvested-fee history

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::bucket_timestamps;
use crate::buckets::BucketSpec;
use crate::error::ChartError;
use crate::models::{FeesPoint, HarvestEntry, TimePoint, Timestamp};
use crate::series::StepSeries;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeesSeriesInput {
    /// Ascending harvest log with cumulative totals
    pub harvests: Vec<HarvestEntry>,
}

pub struct FeesSeriesGenerator {
    bucket: BucketSpec,
}

impl FeesSeriesGenerator {
    pub fn new(bucket: BucketSpec) -> Self {
        Self { bucket }
    }

    /// Callers gate on harvest count; an empty log is a precondition violation.
    pub fn generate(
        &self,
        input: &FeesSeriesInput,
        now: Timestamp,
    ) -> Result<Vec<FeesPoint>, ChartError> {
        let Some(first) = input.harvests.first() else {
            error!("fees series requested without harvests");
            return Err(ChartError::EmptyHarvests);
        };

        let zero_amounts = vec![Decimal::ZERO; first.cumulative_amounts.len()];
        let zero_values = vec![Decimal::ZERO; first.cumulative_values.len()];

        let mut amounts = StepSeries::new(
            input
                .harvests
                .iter()
                .map(|h| TimePoint::new(h.timestamp(), h.cumulative_amounts.clone()))
                .collect(),
            zero_amounts,
        );
        let mut values = StepSeries::new(
            input
                .harvests
                .iter()
                .map(|h| TimePoint::new(h.timestamp(), h.cumulative_values.clone()))
                .collect(),
            zero_values,
        );

        let window_start = self.bucket.window_start(first.timestamp(), now);
        let times = bucket_timestamps(
            &self.bucket,
            window_start,
            now,
            input.harvests.iter().map(|h| h.timestamp()),
        );

        let points: Vec<FeesPoint> = times
            .into_iter()
            .map(|t| FeesPoint {
                t,
                amounts: amounts.value_after(t),
                values: values.value_after(t),
            })
            .collect();

        debug!(
            points = points.len(),
            harvests = input.harvests.len(),
            "generated fees series"
        );
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::TotalRange;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn harvest(t: i64, amounts: Vec<Decimal>, values: Vec<Decimal>) -> HarvestEntry {
        HarvestEntry {
            datetime: DateTime::from_timestamp(t, 0).unwrap(),
            cumulative_amounts: amounts,
            cumulative_values: values,
        }
    }

    fn bucket() -> BucketSpec {
        BucketSpec {
            sample_interval: 100,
            total_range: TotalRange::AllTime,
        }
    }

    #[test]
    fn test_empty_harvests_is_precondition_violation() {
        let input = FeesSeriesInput {
            harvests: Vec::new(),
        };
        let err = FeesSeriesGenerator::new(bucket())
            .generate(&input, 1_000)
            .unwrap_err();
        assert_eq!(err, ChartError::EmptyHarvests);
    }

    #[test]
    fn test_cumulative_values_step_between_harvests() {
        let input = FeesSeriesInput {
            harvests: vec![
                harvest(1_000, vec![dec!(1), dec!(2)], vec![dec!(10), dec!(4)]),
                harvest(1_150, vec![dec!(3), dec!(2)], vec![dec!(30), dec!(4)]),
            ],
        };
        let points = FeesSeriesGenerator::new(bucket())
            .generate(&input, 1_250)
            .unwrap();

        let times: Vec<i64> = points.iter().map(|p| p.t).collect();
        assert_eq!(times, vec![1_000, 1_100, 1_150, 1_200, 1_250]);

        assert_eq!(points[1].amounts, vec![dec!(1), dec!(2)]);
        assert_eq!(points[2].amounts, vec![dec!(3), dec!(2)]);
        assert_eq!(points[4].values, vec![dec!(30), dec!(4)]);
    }

    #[test]
    fn test_bounded_window_starts_after_old_harvests() {
        let input = FeesSeriesInput {
            harvests: vec![harvest(100, vec![dec!(1)], vec![dec!(5)])],
        };
        let bounded = BucketSpec {
            sample_interval: 100,
            total_range: TotalRange::Bounded(200),
        };
        let points = FeesSeriesGenerator::new(bounded)
            .generate(&input, 1_000)
            .unwrap();

        let times: Vec<i64> = points.iter().map(|p| p.t).collect();
        assert_eq!(times, vec![800, 900, 1_000]);
        assert!(points.iter().all(|p| p.amounts == vec![dec!(1)]));
    }
}
