//! Rolling, time-bucketed history for a single channel
//!
//! A [`RollingSeries`] holds at most `max_points` samples spaced `step_ms`
//! apart. Writes inside the newest bucket overwrite it; writes past it append
//! one sample per skipped bucket, all carrying the new value (flat fill, no
//! interpolation). The oldest samples are evicted first.

use crate::units::Bounds;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;
use std::collections::VecDeque;

/// One rolling month at hourly resolution
pub const DEFAULT_MAX_POINTS: usize = 720;
pub const HOUR_MS: i64 = 60 * 60 * 1000;

/// A single (timestamp, value) sample; timestamps are Unix epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub timestamp: i64,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct RollingSeries {
    points: VecDeque<Point>,
    max_points: usize,
    step_ms: i64,
}

impl RollingSeries {
    pub fn new(max_points: usize, step_ms: i64) -> Self {
        assert!(max_points > 0, "series capacity must be positive");
        assert!(step_ms > 0, "series step must be positive");
        Self {
            points: VecDeque::with_capacity(max_points + 1),
            max_points,
            step_ms,
        }
    }

    /// 720 hourly buckets
    pub fn hourly() -> Self {
        Self::new(DEFAULT_MAX_POINTS, HOUR_MS)
    }

    /// Replace the contents with `max_points` samples of a bounded Gaussian
    /// random walk. The last sample lands on the latest step boundary at or
    /// before `anchor_ms`.
    pub fn seed<R: Rng>(
        &mut self,
        rng: &mut R,
        start: f64,
        step_variance: f64,
        bounds: Bounds,
        anchor_ms: i64,
    ) {
        self.points.clear();
        let last = anchor_ms - anchor_ms.rem_euclid(self.step_ms);
        let first = last - (self.max_points as i64 - 1) * self.step_ms;

        let mut current = start;
        for i in 0..self.max_points {
            let noise: f64 = rng.sample(StandardNormal);
            current = bounds.clamp(current + noise * step_variance);
            self.points.push_back(Point {
                timestamp: first + i as i64 * self.step_ms,
                value: current,
            });
        }
    }

    pub fn add_or_update(&mut self, value: f64, timestamp: i64) {
        let Some(last_ts) = self.points.back().map(|p| p.timestamp) else {
            self.points.push_back(Point { timestamp, value });
            return;
        };

        if timestamp - last_ts < self.step_ms {
            // Current bucket is still open
            if let Some(last) = self.points.back_mut() {
                *last = Point { timestamp, value };
            }
            return;
        }

        let mut cursor = last_ts;
        while timestamp - cursor >= self.step_ms {
            cursor += self.step_ms;
            self.points.push_back(Point {
                timestamp: cursor,
                value,
            });
        }

        self.trim_to_max();
    }

    fn trim_to_max(&mut self) {
        while self.points.len() > self.max_points {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value at `index` (0 = oldest)
    pub fn value(&self, index: usize) -> Option<f64> {
        self.points.get(index).map(|p| p.value)
    }

    /// Timestamp at `index` (0 = oldest)
    pub fn timestamp(&self, index: usize) -> Option<i64> {
        self.points.get(index).map(|p| p.timestamp)
    }

    pub fn last(&self) -> Option<Point> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter()
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn step_ms(&self) -> i64 {
        self.step_ms
    }
}
