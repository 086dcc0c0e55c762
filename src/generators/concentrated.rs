//! Dual-asset position history with a hold baseline
//!
//! Quantities held are step series derived from the cost-basis ledger.
//! Ratios and prices are interpolated over the union of the live value,
//! the values recorded on transactions and the fetched history, so the
//! chart follows the market between sparse samples.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{bucket_timestamps, ChartOptions, PositionKind};
use crate::buckets::BucketSpec;
use crate::error::ChartError;
use crate::ledger::{CostBasisLedger, FifoDepositLedger, LedgerDiff};
use crate::models::{
    ConcentratedBreakdown, ConcentratedLive, ConcentratedPoint, ConcentratedTimelineEntry,
    PricePoint, TimePoint, Timestamp,
};
use crate::series::{merge_price_sources, Interpolator, StepSeries};

/// Fetched historical samples for the pool's ratios and prices
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcentratedHistory {
    pub underlying_to_token0: Vec<PricePoint>,
    pub underlying_to_token1: Vec<PricePoint>,
    pub underlying_to_usd: Vec<PricePoint>,
    pub token0_to_usd: Vec<PricePoint>,
    pub token1_to_usd: Vec<PricePoint>,
}

/// Where the share-to-underlying conversion comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShareSource {
    /// Shares are the pool's underlying
    #[default]
    Pool,
    /// A vault wrapping the pool; its composition history converts shares
    Vault {
        #[serde(default)]
        share_to_underlying: Vec<PricePoint>,
    },
}

impl ShareSource {
    pub fn kind(&self) -> PositionKind {
        match self {
            ShareSource::Pool => PositionKind::Pool,
            ShareSource::Vault { .. } => PositionKind::Vault,
        }
    }

    fn conversion(
        &self,
        timeline: &[ConcentratedTimelineEntry],
        live: &ConcentratedLive,
        now: Timestamp,
    ) -> Result<ShareConversion, ChartError> {
        match self {
            ShareSource::Pool => Ok(ShareConversion::Identity),
            ShareSource::Vault {
                share_to_underlying,
            } => {
                let points = merge_price_sources(
                    Some((now, live.underlying_per_share)),
                    timeline
                        .iter()
                        .map(|e| TimePoint::new(e.timestamp(), e.underlying_per_share)),
                    share_to_underlying.iter().cloned(),
                );
                Interpolator::new(points).map(ShareConversion::Interpolated)
            }
        }
    }
}

enum ShareConversion {
    Identity,
    Interpolated(Interpolator),
}

impl ShareConversion {
    fn value_at(&mut self, t: Timestamp) -> Decimal {
        match self {
            ShareConversion::Identity => Decimal::ONE,
            ShareConversion::Interpolated(series) => series.value_at(t),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcentratedSeriesInput {
    #[serde(default)]
    pub source: ShareSource,
    pub timeline: Vec<ConcentratedTimelineEntry>,
    #[serde(default)]
    pub history: ConcentratedHistory,
    #[serde(default)]
    pub first_deposit: Option<Timestamp>,
    pub live: ConcentratedLive,
}

impl ConcentratedSeriesInput {
    pub fn first_deposit(&self) -> Option<Timestamp> {
        self.first_deposit
            .or_else(|| self.timeline.first().map(|entry| entry.timestamp()))
    }
}

/// Interpolated ratio and price series of one pass
struct MarketSeries {
    underlying_to_token0: Interpolator,
    underlying_to_token1: Interpolator,
    underlying_to_usd: Interpolator,
    token0_to_usd: Interpolator,
    token1_to_usd: Interpolator,
}

impl MarketSeries {
    fn build(input: &ConcentratedSeriesInput, now: Timestamp) -> Result<Self, ChartError> {
        let build = |live: Decimal,
                     embedded: fn(&ConcentratedTimelineEntry) -> Decimal,
                     historical: &[PricePoint]|
         -> Result<Interpolator, ChartError> {
            Interpolator::new(merge_price_sources(
                Some((now, live)),
                input
                    .timeline
                    .iter()
                    .map(|e| TimePoint::new(e.timestamp(), embedded(e))),
                historical.iter().cloned(),
            ))
        };

        let live = &input.live;
        let history = &input.history;
        Ok(Self {
            underlying_to_token0: build(
                live.underlying0_per_underlying,
                |e| e.underlying0_per_underlying,
                &history.underlying_to_token0,
            )?,
            underlying_to_token1: build(
                live.underlying1_per_underlying,
                |e| e.underlying1_per_underlying,
                &history.underlying_to_token1,
            )?,
            underlying_to_usd: build(
                live.underlying_to_usd,
                |e| e.underlying_to_usd,
                &history.underlying_to_usd,
            )?,
            token0_to_usd: build(
                live.token0_to_usd,
                |e| e.token0_to_usd,
                &history.token0_to_usd,
            )?,
            token1_to_usd: build(
                live.token1_to_usd,
                |e| e.token1_to_usd,
                &history.token1_to_usd,
            )?,
        })
    }
}

/// Holdings "as of deposit" after each transaction
struct DepositSeries {
    shares: StepSeries<Decimal>,
    token0: StepSeries<Decimal>,
    token1: StepSeries<Decimal>,
}

impl DepositSeries {
    fn fold<L: CostBasisLedger>(timeline: &[ConcentratedTimelineEntry], mut ledger: L) -> Self {
        let mut shares = Vec::with_capacity(timeline.len());
        let mut token0 = Vec::with_capacity(timeline.len());
        let mut token1 = Vec::with_capacity(timeline.len());

        for entry in timeline {
            ledger.add_transaction(&LedgerDiff::from(entry));
            let remaining = ledger.remaining();
            let t = entry.timestamp();
            shares.push(TimePoint::new(t, remaining.shares));
            token0.push(TimePoint::new(t, remaining.token0));
            token1.push(TimePoint::new(t, remaining.token1));
        }

        Self {
            shares: StepSeries::new(shares, Decimal::ZERO),
            token0: StepSeries::new(token0, Decimal::ZERO),
            token1: StepSeries::new(token1, Decimal::ZERO),
        }
    }
}

pub struct ConcentratedSeriesGenerator {
    bucket: BucketSpec,
    options: ChartOptions,
}

impl ConcentratedSeriesGenerator {
    pub fn new(bucket: BucketSpec) -> Self {
        Self {
            bucket,
            options: ChartOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    pub fn generate(
        &self,
        input: &ConcentratedSeriesInput,
        now: Timestamp,
    ) -> Result<Vec<ConcentratedPoint>, ChartError> {
        self.generate_with_ledger(input, now, FifoDepositLedger::new())
    }

    /// Same as [`generate`](Self::generate) with a caller-supplied ledger
    pub fn generate_with_ledger<L: CostBasisLedger>(
        &self,
        input: &ConcentratedSeriesInput,
        now: Timestamp,
        ledger: L,
    ) -> Result<Vec<ConcentratedPoint>, ChartError> {
        let mut deposits = DepositSeries::fold(&input.timeline, ledger);
        let mut market = MarketSeries::build(input, now)?;
        let mut conversion = input.source.conversion(&input.timeline, &input.live, now)?;

        let window_start = self
            .bucket
            .window_start(input.first_deposit().unwrap_or(now), now);
        let times = bucket_timestamps(
            &self.bucket,
            window_start,
            now,
            input.timeline.iter().map(|entry| entry.timestamp()),
        );

        let mut points = Vec::with_capacity(times.len());
        for t in times {
            let shares = deposits.shares.value_after(t);
            let token0_at_deposit = deposits.token0.value_after(t);
            let token1_at_deposit = deposits.token1.value_after(t);

            let shares_to_underlying = conversion.value_at(t);
            let underlying_to_token0 = market.underlying_to_token0.value_at(t);
            let underlying_to_token1 = market.underlying_to_token1.value_at(t);
            let underlying_to_usd = market.underlying_to_usd.value_at(t);
            let token0_to_usd = market.token0_to_usd.value_at(t);
            let token1_to_usd = market.token1_to_usd.value_at(t);

            let underlying = shares * shares_to_underlying;
            let token0 = underlying * underlying_to_token0;
            let token1 = underlying * underlying_to_token1;
            let underlying_usd = underlying * underlying_to_usd;

            let token0_at_deposit_usd = token0_at_deposit * token0_to_usd;
            let token1_at_deposit_usd = token1_at_deposit * token1_to_usd;
            let held_usd = token0_at_deposit_usd + token1_at_deposit_usd;

            let breakdown = self
                .options
                .include_debug_breakdown
                .then(|| ConcentratedBreakdown {
                    shares_to_underlying,
                    underlying_to_token0,
                    underlying_to_token1,
                    underlying_to_usd,
                    token0_to_usd,
                    token1_to_usd,
                    token0,
                    token1,
                    token0_usd: token0 * token0_to_usd,
                    token1_usd: token1 * token1_to_usd,
                    token0_at_deposit,
                    token1_at_deposit,
                    token0_at_deposit_usd,
                    token1_at_deposit_usd,
                });

            points.push(ConcentratedPoint {
                t,
                shares,
                underlying,
                underlying_usd,
                held_usd,
                breakdown,
            });
        }

        debug!(
            kind = input.source.kind().as_str(),
            points = points.len(),
            transactions = input.timeline.len(),
            "generated concentrated series"
        );
        Ok(points)
    }
}
