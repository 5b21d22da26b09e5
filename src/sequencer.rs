//! Instruction sequencer.
//!
//! Walks the route's instruction list one turn at a time. Two bands around
//! each upcoming turn point drive it: entering the outer (approach) band
//! fires a single direction warning, entering the inner (advance) band
//! commits the turn and moves the cursor on. The warning is keyed by
//! `(kind, cursor)` so re-evaluating every tick, or jitter across the band
//! edge, never repeats it.
//!
//! ```text
//! Approaching(i) --d < approach--> warned(i) --d < advance--> Approaching(i+1)
//!        \___________________________d < advance___________________/
//! ```

use log::debug;

use crate::error::Result;
use crate::geo::{distance_m, Point};
use crate::route::{InstructionKind, RouteModel, TurnDirection};

/// Identifies the last approach warning spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnounceKey {
    pub kind: InstructionKind,
    pub index: usize,
}

/// Per-route guidance progress, owned by the tick driver.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencerState {
    /// Cursor into the instruction list; only moves forward.
    pub current_index: usize,
    pub last_announced: Option<AnnounceKey>,
    /// Milestone watermark, non-increasing while guiding.
    pub last_announced_distance_m: f64,
}

impl Default for SequencerState {
    fn default() -> Self {
        Self {
            current_index: 0,
            last_announced: None,
            last_announced_distance_m: f64::INFINITY,
        }
    }
}

/// What the sequencer decided this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Reached the turn point; the cursor moved and the text should be spoken.
    Advanced { text: String },
    /// First entry into the approach band for this instruction.
    Approaching {
        direction: TurnDirection,
        distance_m: f64,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct InstructionSequencer {
    advance_radius_m: f64,
    approach_radius_m: f64,
}

impl InstructionSequencer {
    pub fn new(advance_radius_m: f64, approach_radius_m: f64) -> Self {
        Self {
            advance_radius_m,
            approach_radius_m,
        }
    }

    /// Evaluate one tick.
    ///
    /// Returns `Ok(None)` when nothing should be said, including when no turn
    /// instructions remain. A missing turn point yields `MalformedRoute` and
    /// leaves the state untouched.
    pub fn step(
        &self,
        state: &mut SequencerState,
        position: &Point,
        route: &RouteModel,
    ) -> Result<Option<Step>> {
        let instructions = route.instructions();
        let next_index = state.current_index + 1;
        if next_index >= instructions.len() {
            return Ok(None);
        }

        let next = &instructions[next_index];
        let turn_point = route.turn_point(next_index)?;
        let d = distance_m(position, &turn_point);

        if d < self.advance_radius_m {
            state.current_index = next_index;
            state.last_announced = None;
            let text = if next.text.trim().is_empty() {
                "Continue.".to_string()
            } else {
                next.text.clone()
            };
            debug!("advanced to instruction {next_index} at {d:.1} m");
            return Ok(Some(Step::Advanced { text }));
        }

        if d < self.approach_radius_m {
            let key = AnnounceKey {
                kind: next.kind,
                index: state.current_index,
            };
            if state.last_announced == Some(key) {
                return Ok(None);
            }
            state.last_announced = Some(key);
            return Ok(Some(Step::Approaching {
                direction: next.direction(),
                distance_m: d,
            }));
        }

        Ok(None)
    }
}

impl Default for InstructionSequencer {
    fn default() -> Self {
        Self::new(8.0, 35.0)
    }
}
