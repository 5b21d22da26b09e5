//! Instruction synthesis for bare polylines.
//!
//! Offline routes (GPX files) carry waypoints but no maneuvers. This module
//! derives maneuvers from the bearing change at each waypoint, so the
//! sequencer can treat them like provider routes.

use crate::geo::{bearing, polyline_length, Point};
use crate::route::{Instruction, InstructionKind};

/// Turn direction categories.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Turn {
    Start,
    Straight,
    SlightLeft,
    Left,
    SharpLeft,
    SlightRight,
    Right,
    SharpRight,
    UTurn,
    Arrive,
}

impl Turn {
    fn kind(self) -> InstructionKind {
        match self {
            Turn::Start | Turn::Straight => InstructionKind::Straight,
            Turn::SlightLeft | Turn::Left | Turn::SharpLeft => InstructionKind::TurnLeft,
            Turn::SlightRight | Turn::Right | Turn::SharpRight => InstructionKind::TurnRight,
            Turn::UTurn => InstructionKind::Other,
            Turn::Arrive => InstructionKind::Arrive,
        }
    }

    fn text(self) -> &'static str {
        match self {
            Turn::Start => "Start navigation",
            Turn::Straight => "Continue straight",
            Turn::SlightLeft => "Keep slightly left",
            Turn::Left => "Turn left",
            Turn::SharpLeft => "Turn sharp left",
            Turn::SlightRight => "Keep slightly right",
            Turn::Right => "Turn right",
            Turn::SharpRight => "Turn sharp right",
            Turn::UTurn => "Make a U-turn",
            Turn::Arrive => "Arrive at destination",
        }
    }
}

/// Generate instructions for a polyline.
///
/// One instruction starts the route and one arrives; in between, only
/// vertices where the bearing actually changes get an instruction, with
/// the distance to the next maneuver. Straight-through vertices are
/// skipped so a walker does not have to pass each of them. Fewer than two
/// points produce no instructions.
pub fn generate_instructions(points: &[Point]) -> Vec<Instruction> {
    if points.len() < 2 {
        return Vec::new();
    }

    let last = points.len() - 1;
    let mut maneuvers = vec![(0, Turn::Start)];
    for i in 1..last {
        let turn = compute_turn(&points[i - 1], &points[i], &points[i + 1]);
        if turn != Turn::Straight {
            maneuvers.push((i, turn));
        }
    }
    maneuvers.push((last, Turn::Arrive));

    let mut instructions = Vec::with_capacity(maneuvers.len());
    for pair in maneuvers.windows(2) {
        let (index, turn) = pair[0];
        let leg = format_distance(polyline_length(&points[index..=pair[1].0]));
        let text = match turn {
            Turn::Start => format!("{}, walk {leg}", turn.text()),
            _ => format!("{}, then walk {leg}", turn.text()),
        };
        instructions.push(Instruction::new(turn.kind(), text, index));
    }
    instructions.push(Instruction::new(Turn::Arrive.kind(), Turn::Arrive.text(), last));

    instructions
}

/// Turn at `b` when arriving from `a` and leaving toward `c`.
fn compute_turn(a: &Point, b: &Point, c: &Point) -> Turn {
    // Signed change of heading in (-180, 180]; positive turns right
    let delta = 180.0 - (bearing(a, b) - bearing(b, c) + 180.0).rem_euclid(360.0);
    classify_turn(delta)
}

fn classify_turn(delta: f64) -> Turn {
    let right = delta > 0.0;
    match delta.abs() {
        x if x > 170.0 => Turn::UTurn,
        x if x > 120.0 => if right { Turn::SharpRight } else { Turn::SharpLeft },
        x if x > 60.0 => if right { Turn::Right } else { Turn::Left },
        x if x > 20.0 => if right { Turn::SlightRight } else { Turn::SlightLeft },
        _ => Turn::Straight,
    }
}

/// Spoken distance, rounded to 10 m below a kilometer.
pub(crate) fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} kilometers", meters / 1000.0)
    } else {
        format!("{} meters", (meters / 10.0).round() as i64 * 10)
    }
}
