//! Cost-basis ledger for dual-asset positions
//!
//! Folds signed share/token diffs into the token quantities the investor
//! deposited for the shares still held. Generators only depend on the
//! [`CostBasisLedger`] contract.

use std::collections::VecDeque;

use rust_decimal::Decimal;
use tracing::{trace, warn};

use crate::models::ConcentratedTimelineEntry;

/// Signed change applied by one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerDiff {
    pub shares: Decimal,
    pub token0: Decimal,
    pub token1: Decimal,
}

impl From<&ConcentratedTimelineEntry> for LedgerDiff {
    fn from(entry: &ConcentratedTimelineEntry) -> Self {
        Self {
            shares: entry.share_diff,
            token0: entry.underlying0_diff,
            token1: entry.underlying1_diff,
        }
    }
}

/// Quantities still outstanding, valued as of their deposits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemainingBalances {
    pub shares: Decimal,
    pub token0: Decimal,
    pub token1: Decimal,
}

pub trait CostBasisLedger {
    fn add_transaction(&mut self, diff: &LedgerDiff);
    fn remaining(&self) -> RemainingBalances;
}

/// One deposit still (partly) held
#[derive(Debug, Clone, PartialEq, Eq)]
struct DepositLot {
    shares: Decimal,
    token0: Decimal,
    token1: Decimal,
}

/// First-in first-out lot matcher: withdrawals consume the oldest deposits
/// first, releasing their token amounts pro rata to the shares removed.
#[derive(Debug, Default)]
pub struct FifoDepositLedger {
    lots: VecDeque<DepositLot>,
}

impl FifoDepositLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_lots(&self) -> usize {
        self.lots.len()
    }

    fn add_deposit(&mut self, diff: &LedgerDiff) {
        self.lots.push_back(DepositLot {
            shares: diff.shares,
            token0: diff.token0,
            token1: diff.token1,
        });
    }

    fn match_withdrawal(&mut self, shares: Decimal) {
        let mut to_remove = shares;

        while to_remove > Decimal::ZERO {
            let Some(lot) = self.lots.front_mut() else {
                warn!(
                    unmatched = %to_remove,
                    "withdrawal exceeds deposited shares, clearing position"
                );
                return;
            };

            if lot.shares <= to_remove {
                to_remove -= lot.shares;
                self.lots.pop_front();
                continue;
            }

            let kept = (lot.shares - to_remove) / lot.shares;
            lot.shares -= to_remove;
            lot.token0 *= kept;
            lot.token1 *= kept;
            to_remove = Decimal::ZERO;
        }
    }
}

impl CostBasisLedger for FifoDepositLedger {
    fn add_transaction(&mut self, diff: &LedgerDiff) {
        if diff.shares > Decimal::ZERO {
            self.add_deposit(diff);
        } else if diff.shares < Decimal::ZERO {
            self.match_withdrawal(diff.shares.abs());
        } else {
            trace!("ledger ignoring zero-share transaction");
        }
    }

    fn remaining(&self) -> RemainingBalances {
        self.lots
            .iter()
            .fold(RemainingBalances::default(), |acc, lot| RemainingBalances {
                shares: acc.shares + lot.shares,
                token0: acc.token0 + lot.token0,
                token1: acc.token1 + lot.token1,
            })
    }
}
