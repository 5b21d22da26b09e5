//! Error types for the guidance engine.

use thiserror::Error;

use crate::session::SessionState;

/// Errors produced by guidance operations.
///
/// None of these are fatal to the host process. The worst outcome of any
/// of them is a skipped tick or a spoken notice.
#[derive(Debug, Error)]
pub enum GuidanceError {
    /// An instruction references a polyline index the route does not have.
    #[error("malformed route: instruction {instruction} references point {polyline_index}, route has {coordinates}")]
    MalformedRoute {
        instruction: usize,
        polyline_index: usize,
        coordinates: usize,
    },

    /// The routing provider could not produce a route.
    #[error("routing failure: {0}")]
    RoutingFailure(String),

    /// No position sample has been observed yet.
    #[error("position unavailable")]
    PositionUnavailable,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A session control call that does not apply in the current state.
    #[error("cannot {action} while session is {state:?}")]
    InvalidTransition {
        state: SessionState,
        action: &'static str,
    },

    /// The async driver was created outside a tokio runtime.
    #[error("no tokio runtime available")]
    NoRuntime,

    #[error("GPX error: {0}")]
    Gpx(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A haptic or speech sink rejected a directive.
    #[error("{channel} output failed: {reason}")]
    Output {
        channel: &'static str,
        reason: String,
    },
}

impl GuidanceError {
    pub fn routing(reason: impl Into<String>) -> Self {
        Self::RoutingFailure(reason.into())
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    pub fn output(channel: &'static str, reason: impl Into<String>) -> Self {
        Self::Output {
            channel,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GuidanceError>;
