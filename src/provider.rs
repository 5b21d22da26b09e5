//! Routing providers.
//!
//! The engine never plans paths itself. It asks a `RoutingProvider` for a
//! `RouteModel` between two points and installs whatever comes back. Online
//! providers live on the host side; `GpxRouteProvider` serves a route loaded
//! from a GPX file, which is enough for walking a known path offline.

use std::future::{ready, Future};

use log::debug;

use crate::config::GuidanceConfig;
use crate::error::{GuidanceError, Result};
use crate::geo::{distance_m, nearest_vertex, Point};
use crate::gpx;
use crate::route::RouteModel;

/// Source of planned routes.
pub trait RoutingProvider: Send + Sync + 'static {
    /// Plan a walking route. May take arbitrarily long; the engine issues
    /// at most one outstanding request and discards superseded results.
    fn plan_route(
        &self,
        origin: Point,
        destination: Point,
    ) -> impl Future<Output = Result<RouteModel>> + Send;
}

/// Serves sub-routes of a single polyline loaded from GPX.
#[derive(Debug, Clone)]
pub struct GpxRouteProvider {
    points: Vec<Point>,
    walking_speed_mps: f64,
    destination_match_m: f64,
}

impl GpxRouteProvider {
    pub fn new(points: Vec<Point>, config: &GuidanceConfig) -> Self {
        Self {
            points,
            walking_speed_mps: config.walking_speed_mps,
            destination_match_m: config.destination_match_m,
        }
    }

    /// Load the route or first track of a GPX document.
    pub fn from_gpx_bytes(data: &[u8], config: &GuidanceConfig) -> Result<Self> {
        let polyline = gpx::parse_bytes(data)?;
        debug!(
            "loaded GPX polyline {:?} with {} points",
            polyline.name,
            polyline.points.len()
        );
        Ok(Self::new(polyline.points, config))
    }

    /// End of the loaded polyline; the only destination this provider serves.
    pub fn destination(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Cut the polyline at the vertex nearest `origin` and walk from there.
    pub fn route_from(&self, origin: Point, destination: Point) -> Result<RouteModel> {
        let Some(end) = self.destination() else {
            return Err(GuidanceError::routing("no route loaded"));
        };
        let miss = distance_m(&destination, &end);
        if miss > self.destination_match_m {
            return Err(GuidanceError::routing(format!(
                "destination is {miss:.0} m from the end of the loaded route"
            )));
        }

        let start = nearest_vertex(&origin, &self.points).unwrap_or(0);
        let mut points = Vec::with_capacity(self.points.len() - start + 1);
        if distance_m(&origin, &self.points[start]) > 1.0 {
            points.push(origin);
        }
        points.extend_from_slice(&self.points[start..]);

        if points.len() < 2 {
            // Already standing on the destination
            points.insert(0, origin);
        }

        RouteModel::from_polyline(points, self.walking_speed_mps)
    }
}

impl RoutingProvider for GpxRouteProvider {
    fn plan_route(
        &self,
        origin: Point,
        destination: Point,
    ) -> impl Future<Output = Result<RouteModel>> + Send {
        ready(self.route_from(origin, destination))
    }
}
