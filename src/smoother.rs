//! Position smoothing.
//!
//! Raw GPS fixes jitter by several meters between samples, which is enough
//! to flip a walker in and out of a turn band. The smoother keeps a short
//! FIFO of raw samples and reports their mean, trading two or three samples
//! of latency for a stable position. Heading is derived from consecutive
//! smoothed positions, with a compass reading as fallback before the first
//! movement is known.

use std::collections::VecDeque;

use serde::Serialize;

use crate::geo::{bearing, Point};

/// One fix from the external position source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub lat: f64,
    pub lon: f64,
    /// Source timestamp in milliseconds. Carried for the host's benefit;
    /// samples are never rejected by time.
    pub timestamp_ms: u64,
}

impl RawSample {
    pub fn point(&self) -> Point {
        Point::new(self.lat, self.lon)
    }
}

/// Denoised position with an optional heading in degrees [0, 360).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmoothedPosition {
    pub point: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_deg: Option<f64>,
}

/// Moving-average smoother over the last `capacity` raw samples.
#[derive(Debug, Clone)]
pub struct PositionSmoother {
    window: VecDeque<Point>,
    capacity: usize,
    previous: Option<Point>,
    orientation_deg: Option<f64>,
    latest: Option<SmoothedPosition>,
}

impl PositionSmoother {
    /// Create a smoother; a zero capacity is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            previous: None,
            orientation_deg: None,
            latest: None,
        }
    }

    /// Add a sample and return the new smoothed position.
    pub fn observe(&mut self, sample: RawSample) -> SmoothedPosition {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(sample.point());

        let n = self.window.len() as f64;
        let (lat_sum, lon_sum) = self
            .window
            .iter()
            .fold((0.0, 0.0), |(lat, lon), p| (lat + p.lat, lon + p.lon));
        let point = Point::new(lat_sum / n, lon_sum / n);

        let heading_deg = match self.previous {
            Some(prev) => Some(bearing(&prev, &point)),
            None => self.orientation_deg,
        };
        self.previous = Some(point);

        let smoothed = SmoothedPosition { point, heading_deg };
        self.latest = Some(smoothed);
        smoothed
    }

    /// Record an external compass reading, used as heading until two
    /// smoothed positions exist.
    pub fn set_orientation(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.orientation_deg = Some(degrees.rem_euclid(360.0));
        }
    }

    /// Most recent smoothed position, if any sample has been observed.
    pub fn current(&self) -> Option<SmoothedPosition> {
        self.latest
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

impl Default for PositionSmoother {
    fn default() -> Self {
        Self::new(5)
    }
}
