//! Single-asset position history
//!
//! Balances, share rates and USD prices are all treated as step series here:
//! the value at a tick is the last value known at or before it. The chart
//! always ends with the live state at "now".

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buckets::BucketSpec;
use crate::models::{
    PricePoint, StandardLive, StandardPoint, StandardTimelineEntry, TimePoint, Timestamp,
};
use crate::series::StepSeries;

/// Everything needed to chart one (account, position) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardSeriesInput {
    /// Ascending, balance-consistent transaction log
    pub timeline: Vec<StandardTimelineEntry>,
    #[serde(default)]
    pub share_to_underlying: Vec<PricePoint>,
    #[serde(default)]
    pub underlying_to_usd: Vec<PricePoint>,
    /// Defaults to the first timeline entry
    #[serde(default)]
    pub first_deposit: Option<Timestamp>,
    pub live: StandardLive,
}

impl StandardSeriesInput {
    pub fn first_deposit(&self) -> Option<Timestamp> {
        self.first_deposit
            .or_else(|| self.timeline.first().map(|entry| entry.timestamp()))
    }
}

pub struct StandardSeriesGenerator {
    bucket: BucketSpec,
}

impl StandardSeriesGenerator {
    pub fn new(bucket: BucketSpec) -> Self {
        Self { bucket }
    }

    pub fn generate(&self, input: &StandardSeriesInput, now: Timestamp) -> Vec<StandardPoint> {
        let mut points = match input.first_deposit() {
            Some(first_deposit) => self.historical_points(input, first_deposit, now),
            None => Vec::new(),
        };

        let live = &input.live;
        let underlying_balance = live.share_balance * live.share_to_underlying;
        points.push(StandardPoint {
            t: now,
            share_balance: live.share_balance,
            underlying_balance,
            usd_balance: underlying_balance * live.underlying_to_usd,
        });

        debug!(
            points = points.len(),
            transactions = input.timeline.len(),
            "generated standard series"
        );
        points
    }

    fn historical_points(
        &self,
        input: &StandardSeriesInput,
        first_deposit: Timestamp,
        now: Timestamp,
    ) -> Vec<StandardPoint> {
        let step = self.bucket.sample_interval.max(1);
        let window_start = self.bucket.window_start(first_deposit, now);
        let window_end = self.bucket.window_end(now);

        let mut balances = StepSeries::new(
            input
                .timeline
                .iter()
                .map(|entry| TimePoint::new(entry.timestamp(), entry.share_balance))
                .collect(),
            Decimal::ZERO,
        );
        let mut rates = StepSeries::new(input.share_to_underlying.clone(), Decimal::ZERO);
        let mut prices = StepSeries::new(input.underlying_to_usd.clone(), Decimal::ZERO);

        let mut points = Vec::new();
        let mut t = window_start;

        // The deposit itself carries the exact basis; no need to approximate it
        if let Some(first) = input.timeline.first() {
            if first.timestamp() == window_start && window_start < now {
                let underlying_balance = first.share_balance * first.share_to_underlying_price;
                let price = first
                    .underlying_to_usd_price
                    .unwrap_or_else(|| prices.value_after(window_start));
                points.push(StandardPoint {
                    t: window_start,
                    share_balance: first.share_balance,
                    underlying_balance,
                    usd_balance: underlying_balance * price,
                });
                t += step;
            }
        }

        while t <= window_end && t < now {
            let share_balance = balances.value_after(t);
            let rate = rates.value_after(t);
            let price = prices.value_after(t);

            if !share_balance.is_zero() {
                let underlying_balance = share_balance * rate;
                points.push(StandardPoint {
                    t,
                    share_balance,
                    underlying_balance,
                    usd_balance: underlying_balance * price,
                });
            }
            t += step;
        }

        points
    }
}
