use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unix seconds
pub type Timestamp = i64;

/// A single sample of a time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePoint<V> {
    pub t: Timestamp,
    pub v: V,
}

impl<V> TimePoint<V> {
    pub fn new(t: Timestamp, v: V) -> Self {
        Self { t, v }
    }
}

/// Externally fetched price or ratio sample
pub type PricePoint = TimePoint<Decimal>;

/// One transaction of a single-asset position, carrying cumulative state
/// after the transaction was applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardTimelineEntry {
    pub datetime: DateTime<Utc>,
    pub share_balance: Decimal,
    pub share_to_underlying_price: Decimal,
    #[serde(default)]
    pub underlying_to_usd_price: Option<Decimal>,
}

impl StandardTimelineEntry {
    pub fn timestamp(&self) -> Timestamp {
        self.datetime.timestamp()
    }
}

/// One transaction of a dual-asset (concentrated liquidity) position.
///
/// Diffs are signed: deposits are positive, withdrawals negative. Ratios and
/// prices are the values observed at the transaction instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcentratedTimelineEntry {
    pub datetime: DateTime<Utc>,
    pub share_balance: Decimal,
    pub share_diff: Decimal,
    pub underlying0_diff: Decimal,
    pub underlying1_diff: Decimal,
    /// Underlying units per position share (1 for a bare pool)
    pub underlying_per_share: Decimal,
    pub underlying0_per_underlying: Decimal,
    pub underlying1_per_underlying: Decimal,
    pub underlying_to_usd: Decimal,
    pub token0_to_usd: Decimal,
    pub token1_to_usd: Decimal,
}

impl ConcentratedTimelineEntry {
    pub fn timestamp(&self) -> Timestamp {
        self.datetime.timestamp()
    }
}

/// Harvest event with cumulative (not per-event) claimed amounts per reward token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestEntry {
    pub datetime: DateTime<Utc>,
    pub cumulative_amounts: Vec<Decimal>,
    pub cumulative_values: Vec<Decimal>,
}

impl HarvestEntry {
    pub fn timestamp(&self) -> Timestamp {
        self.datetime.timestamp()
    }
}

/// Live state of a single-asset position, pinned as the freshest chart point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardLive {
    pub share_balance: Decimal,
    pub share_to_underlying: Decimal,
    pub underlying_to_usd: Decimal,
}

/// Live state of a concentrated position and its prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentratedLive {
    pub share_balance: Decimal,
    pub underlying_per_share: Decimal,
    pub underlying0_per_underlying: Decimal,
    pub underlying1_per_underlying: Decimal,
    pub underlying_to_usd: Decimal,
    pub token0_to_usd: Decimal,
    pub token1_to_usd: Decimal,
}

/// Row of a single-asset chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardPoint {
    pub t: Timestamp,
    pub share_balance: Decimal,
    pub underlying_balance: Decimal,
    pub usd_balance: Decimal,
}

/// Row of a concentrated-position chart.
///
/// `underlying_usd` against `held_usd` is the PnL-vs-hold comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentratedPoint {
    pub t: Timestamp,
    pub shares: Decimal,
    pub underlying: Decimal,
    pub underlying_usd: Decimal,
    pub held_usd: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ConcentratedBreakdown>,
}

impl ConcentratedPoint {
    pub fn pnl_vs_hold(&self) -> Decimal {
        self.underlying_usd - self.held_usd
    }
}

/// Intermediate values of a concentrated row. Carried for inspection only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentratedBreakdown {
    pub shares_to_underlying: Decimal,
    pub underlying_to_token0: Decimal,
    pub underlying_to_token1: Decimal,
    pub underlying_to_usd: Decimal,
    pub token0_to_usd: Decimal,
    pub token1_to_usd: Decimal,
    pub token0: Decimal,
    pub token1: Decimal,
    pub token0_usd: Decimal,
    pub token1_usd: Decimal,
    pub token0_at_deposit: Decimal,
    pub token1_at_deposit: Decimal,
    pub token0_at_deposit_usd: Decimal,
    pub token1_at_deposit_usd: Decimal,
}

/// Row of a harvested-fees chart, one entry per reward token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeesPoint {
    pub t: Timestamp,
    pub amounts: Vec<Decimal>,
    pub values: Vec<Decimal>,
}

/// Convert a chart timestamp back to a calendar datetime for display
pub fn to_datetime(t: Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(t, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_timeline_entry_deserializes_without_usd_price() {
        let json = r#"{
            "datetime": "2024-01-01T00:00:00Z",
            "share_balance": "10",
            "share_to_underlying_price": "1.05"
        }"#;
        let entry: StandardTimelineEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.share_balance, dec!(10));
        assert_eq!(entry.underlying_to_usd_price, None);
        assert_eq!(entry.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_pnl_vs_hold() {
        let point = ConcentratedPoint {
            t: 0,
            shares: dec!(1),
            underlying: dec!(1),
            underlying_usd: dec!(105),
            held_usd: dec!(110),
            breakdown: None,
        };
        assert_eq!(point.pnl_vs_hold(), dec!(-5));
    }

    #[test]
    fn test_breakdown_is_omitted_when_absent() {
        let point = ConcentratedPoint {
            t: 0,
            shares: dec!(1),
            underlying: dec!(1),
            underlying_usd: dec!(1),
            held_usd: dec!(1),
            breakdown: None,
        };
        let json = serde_json::to_string(&point).unwrap();
        assert!(!json.contains("breakdown"));
    }

    #[test]
    fn test_to_datetime() {
        let dt = to_datetime(1_704_067_200).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }
}
