//! Distance milestones and arrival.
//!
//! Milestones are announced against a watermark kept in `SequencerState`:
//! the distance at which the previous milestone was spoken. A threshold
//! fires only when the walker is inside it (plus margin) and the watermark
//! is still outside it, so each threshold is spoken once and a walker who
//! briefly backs off cannot trigger it again.

use crate::geo::{distance_m, Point};
use crate::sequencer::SequencerState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Announcement {
    Arrived,
    Milestone(u32),
}

#[derive(Debug, Clone)]
pub struct MilestoneAnnouncer {
    /// Strictly descending.
    thresholds_m: Vec<u32>,
    margin_m: f64,
    arrival_radius_m: f64,
}

impl MilestoneAnnouncer {
    /// Thresholds may come in any order; they are kept descending without
    /// duplicates.
    pub fn new(mut thresholds_m: Vec<u32>, margin_m: f64, arrival_radius_m: f64) -> Self {
        thresholds_m.sort_unstable_by(|a, b| b.cmp(a));
        thresholds_m.dedup();
        Self {
            thresholds_m,
            margin_m,
            arrival_radius_m,
        }
    }

    pub fn arrived(&self, position: &Point, destination: &Point) -> bool {
        distance_m(position, destination) < self.arrival_radius_m
    }

    /// Evaluate arrival, then milestones. At most one announcement per call.
    ///
    /// When several thresholds were crossed since the last announcement the
    /// tightest one is spoken: a walker first located 95 m out hears
    /// "100 meters", not "500 meters".
    pub fn evaluate(
        &self,
        state: &mut SequencerState,
        position: &Point,
        destination: &Point,
    ) -> Option<Announcement> {
        if self.arrived(position, destination) {
            return Some(Announcement::Arrived);
        }
        let d = distance_m(position, destination);

        let crossed = self.thresholds_m.iter().rev().copied().find(|&t| {
            let edge = f64::from(t) + self.margin_m;
            d < edge && state.last_announced_distance_m > edge
        })?;

        state.last_announced_distance_m = d;
        Some(Announcement::Milestone(crossed))
    }
}

impl Default for MilestoneAnnouncer {
    fn default() -> Self {
        Self::new(vec![500, 300, 200, 100, 50], 10.0, 15.0)
    }
}
