//! Start/end summary of a generated chart

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ConcentratedPoint, FeesPoint, StandardPoint, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSummary {
    pub start: Timestamp,
    pub end: Timestamp,
    pub start_value: Decimal,
    pub end_value: Decimal,
    pub change: Decimal,
    /// Percentage change; zero when the chart starts at zero
    pub change_pct: Decimal,
    /// Final position value minus the hold baseline (concentrated charts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnl_vs_hold: Option<Decimal>,
}

impl ChartSummary {
    fn from_values(
        start: (Timestamp, Decimal),
        end: (Timestamp, Decimal),
        pnl_vs_hold: Option<Decimal>,
    ) -> Self {
        let change = end.1 - start.1;
        let change_pct = if start.1.is_zero() {
            Decimal::ZERO
        } else {
            (change / start.1) * Decimal::from(100)
        };
        Self {
            start: start.0,
            end: end.0,
            start_value: start.1,
            end_value: end.1,
            change,
            change_pct,
            pnl_vs_hold,
        }
    }

    pub fn standard(points: &[StandardPoint]) -> Option<Self> {
        let first = points.first()?;
        let last = points.last()?;
        Some(Self::from_values(
            (first.t, first.usd_balance),
            (last.t, last.usd_balance),
            None,
        ))
    }

    pub fn concentrated(points: &[ConcentratedPoint]) -> Option<Self> {
        let first = points.first()?;
        let last = points.last()?;
        Some(Self::from_values(
            (first.t, first.underlying_usd),
            (last.t, last.underlying_usd),
            Some(last.pnl_vs_hold()),
        ))
    }

    /// Change in total harvested USD value across all reward tokens
    pub fn fees(points: &[FeesPoint]) -> Option<Self> {
        let total = |p: &FeesPoint| p.values.iter().copied().sum::<Decimal>();
        let first = points.first()?;
        let last = points.last()?;
        Some(Self::from_values(
            (first.t, total(first)),
            (last.t, total(last)),
            None,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn standard_point(t: i64, usd: Decimal) -> StandardPoint {
        StandardPoint {
            t,
            share_balance: dec!(1),
            underlying_balance: dec!(1),
            usd_balance: usd,
        }
    }

    #[test]
    fn test_standard_summary() {
        let summary =
            ChartSummary::standard(&[standard_point(0, dec!(100)), standard_point(10, dec!(150))])
                .unwrap();
        assert_eq!(summary.change, dec!(50));
        assert_eq!(summary.change_pct, dec!(50));
        assert_eq!(summary.pnl_vs_hold, None);
    }

    #[test]
    fn test_zero_start_has_zero_pct() {
        let summary =
            ChartSummary::standard(&[standard_point(0, dec!(0)), standard_point(10, dec!(5))])
                .unwrap();
        assert_eq!(summary.change_pct, Decimal::ZERO);
    }

    #[test]
    fn test_empty_chart_has_no_summary() {
        assert!(ChartSummary::standard(&[]).is_none());
        assert!(ChartSummary::fees(&[]).is_none());
    }

    #[test]
    fn test_concentrated_summary_reports_pnl_vs_hold() {
        let point = |t, usd, held| ConcentratedPoint {
            t,
            shares: dec!(1),
            underlying: dec!(1),
            underlying_usd: usd,
            held_usd: held,
            breakdown: None,
        };
        let summary =
            ChartSummary::concentrated(&[point(0, dec!(20), dec!(20)), point(5, dec!(30), dec!(25))])
                .unwrap();
        assert_eq!(summary.end_value, dec!(30));
        assert_eq!(summary.pnl_vs_hold, Some(dec!(5)));
    }

    #[test]
    fn test_fees_summary_totals_tokens() {
        let point = |t, values: Vec<Decimal>| FeesPoint {
            t,
            amounts: vec![Decimal::ZERO; values.len()],
            values,
        };
        let summary = ChartSummary::fees(&[
            point(0, vec![dec!(1), dec!(1)]),
            point(5, vec![dec!(3), dec!(2)]),
        ])
        .unwrap();
        assert_eq!(summary.start_value, dec!(2));
        assert_eq!(summary.end_value, dec!(5));
        assert_eq!(summary.change_pct, dec!(150));
    }
}
