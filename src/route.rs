//! Route model.
//!
//! A `RouteModel` is the immutable snapshot of one planned route: the
//! polyline, the ordered instruction list, the destination and summary
//! totals. It is built once per planning request and replaced wholesale on
//! re-plan; sessions hold it behind an `Arc` and never mutate it.

use serde::{Deserialize, Serialize};

use crate::error::{GuidanceError, Result};
use crate::geo::{polyline_length, Point};
use crate::route_nav::generate_instructions;

/// Instruction category as reported by the routing provider.
///
/// Providers name their maneuvers differently; the left and right families
/// fold into `TurnLeft`/`TurnRight` and anything unrecognised is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InstructionKind {
    #[serde(alias = "Head", alias = "Continue")]
    Straight,
    #[serde(alias = "Left", alias = "SlightLeft", alias = "SharpLeft")]
    TurnLeft,
    #[serde(alias = "Right", alias = "SlightRight", alias = "SharpRight")]
    TurnRight,
    #[serde(alias = "DestinationReached")]
    Arrive,
    #[default]
    #[serde(other)]
    Other,
}

/// Haptic direction for an approach warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Left,
    Right,
    Forward,
}

/// One step of the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(default, alias = "type")]
    pub kind: InstructionKind,
    #[serde(default)]
    pub text: String,
    /// Index into the route's coordinates where this instruction applies.
    #[serde(alias = "index")]
    pub polyline_index: usize,
}

impl Instruction {
    pub fn new(kind: InstructionKind, text: impl Into<String>, polyline_index: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            polyline_index,
        }
    }

    /// Direction to signal when approaching this instruction.
    ///
    /// The typed kind decides whenever the provider supplied one. Text
    /// matching is only consulted for `Other`, which is what providers
    /// without a typed field produce.
    pub fn direction(&self) -> TurnDirection {
        match self.kind {
            InstructionKind::TurnLeft => TurnDirection::Left,
            InstructionKind::TurnRight => TurnDirection::Right,
            InstructionKind::Straight | InstructionKind::Arrive => TurnDirection::Forward,
            InstructionKind::Other => {
                let text = self.text.to_lowercase();
                if text.contains("right") {
                    TurnDirection::Right
                } else if text.contains("left") {
                    TurnDirection::Left
                } else {
                    TurnDirection::Forward
                }
            }
        }
    }
}

/// Immutable planned-route snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteModel {
    coordinates: Vec<Point>,
    #[serde(default)]
    instructions: Vec<Instruction>,
    destination: Point,
    #[serde(default)]
    total_distance_m: f64,
    #[serde(default)]
    total_time_s: f64,
}

impl RouteModel {
    pub fn new(
        coordinates: Vec<Point>,
        instructions: Vec<Instruction>,
        destination: Point,
        total_distance_m: f64,
        total_time_s: f64,
    ) -> Self {
        Self {
            coordinates,
            instructions,
            destination,
            total_distance_m,
            total_time_s,
        }
    }

    /// Build a route from a bare polyline, synthesising turn instructions
    /// from bearing changes. The destination is the last point.
    pub fn from_polyline(points: Vec<Point>, walking_speed_mps: f64) -> Result<Self> {
        let Some(destination) = points.last().copied() else {
            return Err(GuidanceError::routing("route has no points"));
        };
        if points.len() < 2 {
            return Err(GuidanceError::routing("route needs at least two points"));
        }

        let instructions = generate_instructions(&points);
        let total_distance_m = polyline_length(&points);
        let total_time_s = if walking_speed_mps > 0.0 {
            total_distance_m / walking_speed_mps
        } else {
            0.0
        };

        Ok(Self::new(points, instructions, destination, total_distance_m, total_time_s))
    }

    /// Parse a provider route from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn coordinates(&self) -> &[Point] {
        &self.coordinates
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn destination(&self) -> Point {
        self.destination
    }

    pub fn total_distance_m(&self) -> f64 {
        self.total_distance_m
    }

    pub fn total_time_s(&self) -> f64 {
        self.total_time_s
    }

    /// Coordinate an instruction applies at, or `MalformedRoute` when the
    /// instruction points past the end of the polyline.
    pub fn turn_point(&self, instruction: usize) -> Result<Point> {
        let polyline_index = self
            .instructions
            .get(instruction)
            .map(|i| i.polyline_index)
            .unwrap_or(usize::MAX);

        self.coordinates
            .get(polyline_index)
            .copied()
            .ok_or(GuidanceError::MalformedRoute {
                instruction,
                polyline_index,
                coordinates: self.coordinates.len(),
            })
    }

    /// Spoken summary, e.g. "1.2 kilometers, about 15 minutes".
    pub fn summary(&self) -> String {
        let km = self.total_distance_m / 1000.0;
        let minutes = (self.total_time_s / 60.0).round() as i64;
        format!("{km:.1} kilometers, about {minutes} minutes")
    }
}
