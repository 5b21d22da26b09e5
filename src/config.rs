//! Guidance configuration.
//!
//! Every field has a default tuned for a walking pedestrian, so an empty
//! JSON object is a valid configuration. Hosts override individual values
//! by passing a partial object across the JNI boundary.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GuidanceError, Result};

/// Tunable thresholds for one guidance session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Number of raw samples averaged by the position smoother.
    pub smoothing_window: usize,
    /// Period of the guidance tick in milliseconds.
    pub tick_interval_ms: u64,
    /// Distance from every route vertex beyond which the walker is off route.
    pub off_route_tolerance_m: f64,
    /// Inner band: closer than this to the turn point advances the instruction.
    pub advance_radius_m: f64,
    /// Outer band: closer than this triggers the one-shot approach warning.
    pub approach_radius_m: f64,
    /// Closer than this to the destination ends the session.
    pub arrival_radius_m: f64,
    /// Distance-to-destination milestones, announced once each.
    pub milestones_m: Vec<u32>,
    /// Slack added to each milestone threshold.
    pub milestone_margin_m: f64,
    /// Used to estimate walking time for routes built from bare polylines.
    pub walking_speed_mps: f64,
    /// How close a requested destination must be to the end of an offline route.
    pub destination_match_m: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 5,
            tick_interval_ms: 2200,
            off_route_tolerance_m: 40.0,
            advance_radius_m: 8.0,
            approach_radius_m: 35.0,
            arrival_radius_m: 15.0,
            milestones_m: vec![500, 300, 200, 100, 50],
            milestone_margin_m: 10.0,
            walking_speed_mps: 1.4,
            destination_match_m: 50.0,
        }
    }
}

impl GuidanceConfig {
    /// Parse a (possibly partial) JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GuidanceConfig = serde_json::from_str(json)?;
        config.validate()
    }

    /// Check value ranges and normalise the milestone list to strictly
    /// descending order.
    pub fn validate(mut self) -> Result<Self> {
        if self.smoothing_window == 0 {
            return Err(GuidanceError::invalid_config("smoothing_window must be at least 1"));
        }
        if self.tick_interval_ms < 100 {
            return Err(GuidanceError::invalid_config(format!(
                "tick_interval_ms must be at least 100, got {}",
                self.tick_interval_ms
            )));
        }
        if !(self.advance_radius_m > 0.0 && self.advance_radius_m < self.approach_radius_m) {
            return Err(GuidanceError::invalid_config(format!(
                "need 0 < advance_radius_m ({}) < approach_radius_m ({})",
                self.advance_radius_m, self.approach_radius_m
            )));
        }

        let positive = [
            ("off_route_tolerance_m", self.off_route_tolerance_m),
            ("arrival_radius_m", self.arrival_radius_m),
            ("walking_speed_mps", self.walking_speed_mps),
            ("destination_match_m", self.destination_match_m),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(GuidanceError::invalid_config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.milestone_margin_m >= 0.0) {
            return Err(GuidanceError::invalid_config("milestone_margin_m must not be negative"));
        }

        self.milestones_m.sort_unstable_by(|a, b| b.cmp(a));
        self.milestones_m.dedup();

        Ok(self)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
