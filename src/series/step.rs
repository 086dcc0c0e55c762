use tracing::trace;

use super::{sort_points, Lookup};
use crate::models::{TimePoint, Timestamp};

/// Forward-fill series for values that only change at discrete events
/// (balances, cumulative totals).
#[derive(Debug, Clone)]
pub struct StepSeries<V> {
    points: Vec<TimePoint<V>>,
    cursor: usize,
    default: V,
}

impl<V: Clone> StepSeries<V> {
    /// Build from an unordered point list. `default` answers queries before
    /// the first point and every query on an empty series.
    pub fn new(points: Vec<TimePoint<V>>, default: V) -> Self {
        Self {
            points: sort_points(points),
            cursor: 0,
            default,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent value at or before `t`.
    ///
    /// Query times must be non-decreasing within one pass.
    pub fn lookup(&mut self, t: Timestamp) -> Lookup<V> {
        let Some(first) = self.points.first() else {
            return Lookup::degenerate(self.default.clone());
        };
        if t < first.t {
            trace!(t, first = first.t, "step lookup before first point");
            return Lookup::degenerate(self.default.clone());
        }

        while self.cursor + 1 < self.points.len() && self.points[self.cursor + 1].t <= t {
            self.cursor += 1;
        }
        Lookup::exact(self.points[self.cursor].v.clone())
    }

    pub fn value_after(&mut self, t: Timestamp) -> V {
        self.lookup(t).value
    }
}
