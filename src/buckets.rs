//! Chart resolutions
//!
//! A bucket pairs a sample interval with the total horizon of the chart.
//! The set is fixed; anything outside it is a configuration error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::models::Timestamp;

const HOUR: i64 = 60 * 60;
const DAY: i64 = 24 * HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BucketKey {
    #[serde(rename = "1h_1d")]
    OneHourOneDay,
    #[serde(rename = "1h_1w")]
    OneHourOneWeek,
    #[serde(rename = "1d_1M")]
    OneDayOneMonth,
    #[serde(rename = "1d_1Y")]
    OneDayOneYear,
    #[serde(rename = "1d_all")]
    OneDayAllTime,
}

/// How far back a chart reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalRange {
    Bounded(i64),
    /// From the first deposit onwards
    AllTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketSpec {
    pub sample_interval: i64,
    pub total_range: TotalRange,
}

impl BucketSpec {
    /// First timestamp the chart covers for a position first funded at `first_deposit`
    pub fn window_start(&self, first_deposit: Timestamp, now: Timestamp) -> Timestamp {
        match self.total_range {
            TotalRange::Bounded(range) => first_deposit.max(now - range),
            TotalRange::AllTime => first_deposit,
        }
    }

    /// `now` rounded down to the sample interval
    pub fn window_end(&self, now: Timestamp) -> Timestamp {
        now.div_euclid(self.sample_interval) * self.sample_interval
    }
}

impl BucketKey {
    pub const ALL: [BucketKey; 5] = [
        BucketKey::OneHourOneDay,
        BucketKey::OneHourOneWeek,
        BucketKey::OneDayOneMonth,
        BucketKey::OneDayOneYear,
        BucketKey::OneDayAllTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BucketKey::OneHourOneDay => "1h_1d",
            BucketKey::OneHourOneWeek => "1h_1w",
            BucketKey::OneDayOneMonth => "1d_1M",
            BucketKey::OneDayOneYear => "1d_1Y",
            BucketKey::OneDayAllTime => "1d_all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BucketKey::OneHourOneDay => "1 hour samples over 1 day",
            BucketKey::OneHourOneWeek => "1 hour samples over 1 week",
            BucketKey::OneDayOneMonth => "1 day samples over 1 month",
            BucketKey::OneDayOneYear => "1 day samples over 1 year",
            BucketKey::OneDayAllTime => "1 day samples over all time",
        }
    }

    pub fn spec(&self) -> BucketSpec {
        let (sample_interval, total_range) = match self {
            BucketKey::OneHourOneDay => (HOUR, TotalRange::Bounded(DAY)),
            BucketKey::OneHourOneWeek => (HOUR, TotalRange::Bounded(7 * DAY)),
            BucketKey::OneDayOneMonth => (DAY, TotalRange::Bounded(30 * DAY)),
            BucketKey::OneDayOneYear => (DAY, TotalRange::Bounded(365 * DAY)),
            BucketKey::OneDayAllTime => (DAY, TotalRange::AllTime),
        };
        BucketSpec {
            sample_interval,
            total_range,
        }
    }
}

impl FromStr for BucketKey {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BucketKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| ChartError::UnknownBucket(s.to_string()))
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a bucket identifier to its interval and range
pub fn resolve_bucket(id: &str) -> Result<BucketSpec, ChartError> {
    id.parse::<BucketKey>().map(|key| key.spec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_buckets() {
        let spec = resolve_bucket("1h_1d").unwrap();
        assert_eq!(spec.sample_interval, 3_600);
        assert_eq!(spec.total_range, TotalRange::Bounded(86_400));

        let spec = resolve_bucket("1d_1Y").unwrap();
        assert_eq!(spec.sample_interval, 86_400);
        assert_eq!(spec.total_range, TotalRange::Bounded(365 * 86_400));

        let spec = resolve_bucket("1d_all").unwrap();
        assert_eq!(spec.total_range, TotalRange::AllTime);
    }

    #[test]
    fn test_unknown_bucket_is_config_error() {
        let err = resolve_bucket("5m_1d").unwrap_err();
        assert_eq!(err, ChartError::UnknownBucket("5m_1d".to_string()));
    }

    #[test]
    fn test_identifiers_are_case_sensitive() {
        // "1d_1m" would be ambiguous with minutes
        assert!(resolve_bucket("1d_1m").is_err());
        assert!(resolve_bucket("1d_1M").is_ok());
    }

    #[test]
    fn test_interval_divides_bounded_range() {
        for key in BucketKey::ALL {
            let spec = key.spec();
            if let TotalRange::Bounded(range) = spec.total_range {
                assert_eq!(range % spec.sample_interval, 0, "{}", key);
            }
        }
    }

    #[test]
    fn test_round_trip_identifier() {
        for key in BucketKey::ALL {
            assert_eq!(key.as_str().parse::<BucketKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_window_bounds() {
        let spec = BucketSpec {
            sample_interval: 100,
            total_range: TotalRange::Bounded(300),
        };
        assert_eq!(spec.window_start(1_000, 1_300), 1_000);
        assert_eq!(spec.window_start(500, 1_300), 1_000);
        assert_eq!(spec.window_end(1_350), 1_300);

        let all_time = BucketSpec {
            sample_interval: 100,
            total_range: TotalRange::AllTime,
        };
        assert_eq!(all_time.window_start(500, 1_300), 500);
    }
}
