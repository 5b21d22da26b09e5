//! Directives and their rendering.
//!
//! A `Directive` is one discrete guidance event. Rendering turns it into
//! what the two output channels consume: a symbolic command from the
//! wearable's fixed alphabet and a phrase for speech or display. Either
//! half may be absent; a milestone is spoken only, a forward nudge is felt
//! only.

use serde::Serialize;

use crate::route::TurnDirection;

/// Discrete guidance output event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    /// Approach warning. Left/right carry the rounded distance to the turn.
    Turn {
        direction: TurnDirection,
        #[serde(skip_serializing_if = "Option::is_none")]
        distance_m: Option<u32>,
    },
    /// The walker reached the turn point; speaks the instruction text.
    Continue { text: String },
    OffRoute,
    DistanceMilestone { meters: u32 },
    Arrived,
    Stopped,
    /// Session status spoken to the user.
    Notice { text: String },
}

/// Symbolic command for the haptic wearable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HapticCommand {
    Left,
    Right,
    Forward,
    Arrived,
    OffRoute,
    Stop,
}

impl HapticCommand {
    /// One-byte code written to the wearable's characteristic.
    pub fn wire_code(self) -> u8 {
        match self {
            HapticCommand::Left => b'L',
            HapticCommand::Right => b'R',
            HapticCommand::Forward => b'F',
            HapticCommand::Arrived => b'A',
            HapticCommand::OffRoute => b'W',
            HapticCommand::Stop => b'S',
        }
    }

    /// Phone vibration pattern (on/off milliseconds) used when no wearable
    /// is paired.
    pub fn vibration_pattern(self) -> &'static [u64] {
        match self {
            HapticCommand::Left => &[200, 100, 200],
            HapticCommand::Right => &[300],
            HapticCommand::Forward => &[100],
            HapticCommand::Arrived => &[200, 100, 200, 100, 500],
            HapticCommand::OffRoute => &[100, 50, 100, 50, 100],
            HapticCommand::Stop => &[50],
        }
    }
}

/// Output-channel view of a directive. `wire` and `vibration_ms` are set
/// whenever `haptic` is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    pub haptic: Option<HapticCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wire: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vibration_ms: Option<&'static [u64]>,
    pub phrase: Option<String>,
}

impl Directive {
    pub fn notice(text: impl Into<String>) -> Self {
        Directive::Notice { text: text.into() }
    }

    pub fn haptic(&self) -> Option<HapticCommand> {
        match self {
            Directive::Turn { direction, .. } => Some(match direction {
                TurnDirection::Left => HapticCommand::Left,
                TurnDirection::Right => HapticCommand::Right,
                TurnDirection::Forward => HapticCommand::Forward,
            }),
            Directive::OffRoute => Some(HapticCommand::OffRoute),
            Directive::Arrived => Some(HapticCommand::Arrived),
            Directive::Stopped => Some(HapticCommand::Stop),
            Directive::Continue { .. }
            | Directive::DistanceMilestone { .. }
            | Directive::Notice { .. } => None,
        }
    }

    pub fn phrase(&self) -> Option<String> {
        match self {
            Directive::Turn { direction: TurnDirection::Right, distance_m } => {
                Some(format!("Turn right in {} meters.", distance_m.unwrap_or(0)))
            }
            Directive::Turn { direction: TurnDirection::Left, distance_m } => {
                Some(format!("Turn left in {} meters.", distance_m.unwrap_or(0)))
            }
            Directive::Turn { direction: TurnDirection::Forward, .. } => None,
            Directive::Continue { text } | Directive::Notice { text } => Some(text.clone()),
            Directive::OffRoute => Some("Off route. Recalculating.".to_string()),
            Directive::DistanceMilestone { meters } => {
                Some(format!("{meters} meters to destination."))
            }
            Directive::Arrived => Some("You have arrived at your destination.".to_string()),
            Directive::Stopped => Some("Navigation stopped.".to_string()),
        }
    }

    pub fn render(&self) -> Rendered {
        let haptic = self.haptic();
        Rendered {
            haptic,
            wire: haptic.map(|h| char::from(h.wire_code())),
            vibration_ms: haptic.map(HapticCommand::vibration_pattern),
            phrase: self.phrase(),
        }
    }
}
