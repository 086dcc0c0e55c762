use rust_decimal::Decimal;
use tracing::{error, trace};

use super::{sort_points, Lookup};
use crate::error::ChartError;
use crate::models::{PricePoint, Timestamp};

/// Piecewise-linear series for continuously moving values (prices, ratios).
///
/// Queries outside the sampled range clamp to the nearest endpoint instead
/// of extrapolating.
#[derive(Debug, Clone)]
pub struct Interpolator {
    points: Vec<PricePoint>,
    cursor: usize,
}

impl Interpolator {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, ChartError> {
        if points.is_empty() {
            error!("interpolator constructed without points");
            return Err(ChartError::EmptyInterpolator);
        }
        Ok(Self {
            points: sort_points(points),
            cursor: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value at `t`. Query times must be non-decreasing within one pass.
    pub fn lookup(&mut self, t: Timestamp) -> Lookup<Decimal> {
        let first = &self.points[0];
        let last = &self.points[self.points.len() - 1];

        if self.points.len() == 1 {
            return if t == first.t {
                Lookup::exact(first.v)
            } else {
                Lookup::degenerate(first.v)
            };
        }
        if t < first.t {
            trace!(t, first = first.t, "interpolation clamped to first point");
            return Lookup::degenerate(first.v);
        }
        if t > last.t {
            trace!(t, last = last.t, "interpolation clamped to last point");
            return Lookup::degenerate(last.v);
        }

        while self.cursor + 1 < self.points.len() && self.points[self.cursor + 1].t <= t {
            self.cursor += 1;
        }

        let before = &self.points[self.cursor];
        if before.t == t || self.cursor + 1 == self.points.len() {
            return Lookup::exact(before.v);
        }

        let after = &self.points[self.cursor + 1];
        let elapsed = Decimal::from(t - before.t);
        let span = Decimal::from(after.t - before.t);
        Lookup::exact(before.v + (after.v - before.v) * elapsed / span)
    }

    pub fn value_at(&mut self, t: Timestamp) -> Decimal {
        self.lookup(t).value
    }
}
