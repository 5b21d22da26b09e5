//! GPX 1.1 route loading.
//!
//! Wraps the `gpx` crate and extracts a single polyline to walk: the first
//! `<rte>` with points, falling back to the first `<trk>` (all segments
//! flattened) for files recorded rather than planned.

use std::io::Read;

use crate::error::{GuidanceError, Result};
use crate::geo::Point;

/// A named polyline read from a GPX file.
#[derive(Debug, Clone)]
pub struct GpxPolyline {
    pub name: Option<String>,
    pub points: Vec<Point>,
}

/// Parse a GPX file from any reader and return the polyline to navigate.
pub fn read_polyline<R: Read>(reader: R) -> Result<GpxPolyline> {
    let gpx = gpx::read(reader).map_err(|e| GuidanceError::Gpx(format!("parse error: {e}")))?;

    let route = gpx.routes.iter().find(|r| !r.points.is_empty()).map(|r| GpxPolyline {
        name: r.name.clone(),
        points: r
            .points
            .iter()
            .map(|wp| Point::new(wp.point().y(), wp.point().x()))
            .collect(),
    });

    let track = || {
        gpx.tracks
            .iter()
            .map(|t| GpxPolyline {
                name: t.name.clone(),
                points: t
                    .segments
                    .iter()
                    .flat_map(|seg| seg.points.iter())
                    .map(|wp| Point::new(wp.point().y(), wp.point().x()))
                    .collect(),
            })
            .find(|t| !t.points.is_empty())
    };

    route
        .or_else(track)
        .ok_or_else(|| GuidanceError::Gpx("file contains no route or track points".into()))
}

/// Parse GPX from a byte slice. Convenience wrapper for JNI.
pub fn parse_bytes(data: &[u8]) -> Result<GpxPolyline> {
    read_polyline(data)
}
