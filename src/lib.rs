//! Yieldline - investor time-series reconstruction for DeFi positions
//!
//! Rebuilds fixed-cadence historical charts of a position's value from its
//! append-only transaction log and independently fetched, irregularly
//! sampled price series: single-asset positions, concentrated-liquidity
//! pools and vaults (with a "just held the tokens" baseline), and cumulative
//! harvested fees. All arithmetic is decimal; generation is pure and never
//! performs I/O.

pub mod buckets;
pub mod config;
pub mod error;
pub mod generators;
pub mod input;
pub mod ledger;
pub mod models;
pub mod series;
pub mod smoothing;
pub mod summary;
pub mod utils;
