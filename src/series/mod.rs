//! Time-series lookups over sparse samples
//!
//! Both series kinds keep a forward-only cursor, so a full chart pass costs
//! amortized O(1) per query as long as query times never decrease.

pub mod interpolated;
pub mod merge;
pub mod step;

pub use interpolated::Interpolator;
pub use merge::{merge_price_sources, Provenance};
pub use step::StepSeries;

use crate::models::TimePoint;

/// Result of a series query.
///
/// `degenerate` marks queries outside the sampled range that were answered
/// with the default or a clamped endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<V> {
    pub value: V,
    pub degenerate: bool,
}

impl<V> Lookup<V> {
    fn exact(value: V) -> Self {
        Self {
            value,
            degenerate: false,
        }
    }

    fn degenerate(value: V) -> Self {
        Self {
            value,
            degenerate: true,
        }
    }
}

/// Stable ascending sort by time; equal-time points keep their input order.
fn sort_points<V>(mut points: Vec<TimePoint<V>>) -> Vec<TimePoint<V>> {
    points.sort_by_key(|p| p.t);
    points
}
