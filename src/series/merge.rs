//! Merging price points from several provenances into one series
//!
//! A ratio or price at a given instant can be known from three places: the
//! live snapshot pinned at "now", the value recorded on a transaction, and an
//! externally fetched historical sample. When two sources report the same
//! timestamp exactly one survives, chosen by [`Provenance`] precedence.

use rust_decimal::Decimal;

use crate::models::{PricePoint, TimePoint, Timestamp};

/// Where a price point came from. Ordered by precedence: at equal
/// timestamps the greatest provenance wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Provenance {
    Live,
    Transaction,
    Historical,
}

/// Merge live, transaction-embedded and historical points into one sorted
/// series with a single point per timestamp.
///
/// Historical samples override transaction values, which override the live
/// value. Within one provenance the last point given for a timestamp wins.
pub fn merge_price_sources(
    live: Option<(Timestamp, Decimal)>,
    transactions: impl IntoIterator<Item = PricePoint>,
    historical: impl IntoIterator<Item = PricePoint>,
) -> Vec<PricePoint> {
    let mut tagged: Vec<(Provenance, PricePoint)> = live
        .map(|(t, v)| (Provenance::Live, TimePoint::new(t, v)))
        .into_iter()
        .chain(transactions.into_iter().map(|p| (Provenance::Transaction, p)))
        .chain(historical.into_iter().map(|p| (Provenance::Historical, p)))
        .collect();

    // stable: input order is kept within (t, provenance)
    tagged.sort_by_key(|(provenance, point)| (point.t, *provenance));

    let mut merged: Vec<PricePoint> = Vec::with_capacity(tagged.len());
    for (_, point) in tagged {
        match merged.last_mut() {
            Some(last) if last.t == point.t => *last = point,
            _ => merged.push(point),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn p(t: i64, v: Decimal) -> PricePoint {
        TimePoint::new(t, v)
    }

    #[test]
    fn test_historical_overrides_transaction_at_same_instant() {
        let merged = merge_price_sources(None, vec![p(100, dec!(1))], vec![p(100, dec!(2))]);
        assert_eq!(merged, vec![p(100, dec!(2))]);
    }

    #[test]
    fn test_transaction_overrides_live_at_same_instant() {
        let merged = merge_price_sources(Some((100, dec!(9))), vec![p(100, dec!(1))], vec![]);
        assert_eq!(merged, vec![p(100, dec!(1))]);
    }

    #[test]
    fn test_historical_overrides_live_regardless_of_input_order() {
        let merged = merge_price_sources(Some((100, dec!(9))), vec![], vec![p(100, dec!(3))]);
        assert_eq!(merged, vec![p(100, dec!(3))]);
    }

    #[test]
    fn test_distinct_instants_are_all_kept_sorted() {
        let merged = merge_price_sources(
            Some((300, dec!(3))),
            vec![p(200, dec!(2))],
            vec![p(250, dec!(2.5)), p(100, dec!(1))],
        );
        let times: Vec<i64> = merged.iter().map(|p| p.t).collect();
        assert_eq!(times, vec![100, 200, 250, 300]);
    }

    #[test]
    fn test_last_point_wins_within_one_provenance() {
        let merged = merge_price_sources(None, vec![], vec![p(100, dec!(1)), p(100, dec!(4))]);
        assert_eq!(merged, vec![p(100, dec!(4))]);
    }

    #[test]
    fn test_empty_sources_merge_to_empty() {
        let merged = merge_price_sources(None, Vec::new(), Vec::new());
        assert!(merged.is_empty());
    }
}
