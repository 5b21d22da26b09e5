//! Geometry primitives.
//!
//! Stateless functions over WGS84 coordinates (lat/lon in degrees):
//! great-circle distance, forward azimuth, and the vertex-distance
//! approximation used to measure how far a walker is from a route.

use serde::{Deserialize, Serialize};

/// A geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
}

impl Point {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
pub fn distance_m(a: &Point, b: &Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from point A to point B in degrees [0, 360).
///
/// `bearing(a, a)` is 0 by convention.
pub fn bearing(a: &Point, b: &Point) -> f64 {
    let (phi1, phi2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlon = (b.lon - a.lon).to_radians();

    let east = dlon.sin() * phi2.cos();
    let north = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlon.cos();
    east.atan2(north).to_degrees().rem_euclid(360.0)
}

/// Distance from a position to the nearest vertex of a polyline.
///
/// Vertices only, no segment projection. Routing providers emit dense
/// polylines so the error stays within a few meters. Returns infinity for
/// an empty polyline, which reads as "off route".
pub fn nearest_distance_to_polyline(position: &Point, coordinates: &[Point]) -> f64 {
    coordinates
        .iter()
        .map(|c| distance_m(position, c))
        .fold(f64::INFINITY, f64::min)
}

/// Index of the polyline vertex closest to a position.
pub fn nearest_vertex(position: &Point, coordinates: &[Point]) -> Option<usize> {
    coordinates
        .iter()
        .enumerate()
        .map(|(i, c)| (i, distance_m(position, c)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Total length of a polyline in meters.
pub fn polyline_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| distance_m(&w[0], &w[1]))
        .sum()
}

/// Point reached by walking `meters` from `origin` along `bearing_deg`.
pub fn destination_point(origin: &Point, bearing_deg: f64, meters: f64) -> Point {
    let delta = meters / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    Point::new(lat2.to_degrees(), lon2.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Point {
        Point::new(lat, lon)
    }

    #[test]
    fn distance_same_point() {
        let p = pt(48.2082, 16.3738);
        assert_eq!(distance_m(&p, &p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = pt(48.2082, 16.3738);
        let b = pt(48.1486, 17.1077);
        assert!((distance_m(&a, &b) - distance_m(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn distance_along_a_meridian() {
        // 0.001 degrees of latitude is about 111 m anywhere
        let a = pt(48.2, 16.37);
        let d = distance_m(&a, &pt(48.201, 16.37));
        assert!((d - 111.19).abs() < 0.05, "Expected ~111.19 m, got {d:.2}");
    }

    #[test]
    fn bearing_east() {
        let b = bearing(&pt(0.0, 0.0), &pt(0.0, 1.0));
        assert!((b - 90.0).abs() < 0.1, "Expected ~90, got {b}");
    }

    #[test]
    fn bearing_north() {
        let b = bearing(&pt(0.0, 0.0), &pt(1.0, 0.0));
        assert!(b.abs() < 0.1, "Expected ~0, got {b}");
    }

    #[test]
    fn bearing_west_is_positive() {
        let b = bearing(&pt(0.0, 0.0), &pt(0.0, -1.0));
        assert!((b - 270.0).abs() < 0.1, "Expected ~270, got {b}");
    }

    #[test]
    fn bearing_same_point_is_zero() {
        let p = pt(48.0, 16.0);
        assert_eq!(bearing(&p, &p), 0.0);
    }

    #[test]
    fn nearest_distance_empty_is_infinite() {
        assert!(nearest_distance_to_polyline(&pt(48.0, 16.0), &[]).is_infinite());
    }

    #[test]
    fn nearest_distance_picks_closest_vertex() {
        let origin = pt(48.0, 16.0);
        let line = vec![
            destination_point(&origin, 0.0, 200.0),
            destination_point(&origin, 90.0, 45.0),
            destination_point(&origin, 180.0, 120.0),
        ];
        let d = nearest_distance_to_polyline(&origin, &line);
        assert!((d - 45.0).abs() < 0.01, "Expected 45 m, got {d}");
        assert_eq!(nearest_vertex(&origin, &line), Some(1));
    }

    #[test]
    fn destination_point_round_trips_distance() {
        let origin = pt(48.2082, 16.3738);
        let target = destination_point(&origin, 37.0, 250.0);
        assert!((distance_m(&origin, &target) - 250.0).abs() < 0.01);
        assert!((bearing(&origin, &target) - 37.0).abs() < 0.1);
    }

    #[test]
    fn polyline_length_sums_legs() {
        // 120 m north, then 80 m east
        let start = pt(48.2, 16.37);
        let corner = destination_point(&start, 0.0, 120.0);
        let end = destination_point(&corner, 90.0, 80.0);
        let len = polyline_length(&[start, corner, end]);
        assert!((len - 200.0).abs() < 0.01, "Expected 200 m, got {len:.3}");
        assert_eq!(polyline_length(&[start]), 0.0);
    }
}
