//! Off-route detection.

use crate::geo::{nearest_distance_to_polyline, Point};
use crate::route::RouteModel;

/// Flags positions farther than a fixed tolerance from every route vertex.
///
/// Pure predicate: deciding whether to re-plan is up to the session.
#[derive(Debug, Clone, Copy)]
pub struct OffRouteDetector {
    tolerance_m: f64,
}

impl OffRouteDetector {
    pub fn new(tolerance_m: f64) -> Self {
        Self { tolerance_m }
    }

    pub fn tolerance_m(&self) -> f64 {
        self.tolerance_m
    }

    /// Distance to the route, in meters.
    pub fn deviation_m(&self, position: &Point, route: &RouteModel) -> f64 {
        nearest_distance_to_polyline(position, route.coordinates())
    }

    pub fn check(&self, position: &Point, route: &RouteModel) -> bool {
        self.deviation_m(position, route) > self.tolerance_m
    }
}

impl Default for OffRouteDetector {
    fn default() -> Self {
        Self::new(40.0)
    }
}
