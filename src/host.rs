//! JSON bridge for foreign hosts.
//!
//! A `HostSession` pairs a position smoother with a guidance session and
//! speaks JSON, so a host on the other side of an FFI boundary can drive it
//! with plain strings. The host owns the tick timer and the routing
//! provider: it sends `tick` on its schedule, forwards any `route_request`
//! in a reply to its provider, and answers with `route_ready` or
//! `route_failed`.
//!
//! ```json
//! {"op": "start", "destination": {"lat": 48.21, "lon": 16.37}}
//! {"op": "route_ready", "request": 1, "route": { ... }}
//! {"op": "tick"}
//! ```

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::GuidanceConfig;
use crate::directive::Rendered;
use crate::error::{GuidanceError, Result};
use crate::geo::Point;
use crate::route::RouteModel;
use crate::session::{GuidanceSession, Outcome, RequestId, RouteRequest, SessionState};
use crate::smoother::{PositionSmoother, RawSample, SmoothedPosition};

/// Commands accepted by `HostSession::handle_json`.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostCommand {
    Start { destination: Point },
    Reroute { origin: Point, destination: Point },
    RouteReady { request: RequestId, route: RouteModel },
    RouteFailed { request: RequestId, reason: String },
    Confirm,
    Stop,
    Tick,
    SetOrientation { degrees: f64 },
}

#[derive(Debug, Serialize)]
pub struct HostReply {
    pub state: SessionState,
    pub directives: Vec<Rendered>,
    /// Latest smoothed fix, for the host's map and heading display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<SmoothedPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_request: Option<RouteRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct HostSession {
    smoother: PositionSmoother,
    session: GuidanceSession,
}

impl HostSession {
    pub fn new(config: &GuidanceConfig) -> Self {
        Self {
            smoother: PositionSmoother::new(config.smoothing_window),
            session: GuidanceSession::new(config),
        }
    }

    /// Build from a JSON configuration; an empty string means defaults.
    pub fn from_config_json(json: &str) -> Result<Self> {
        let config = if json.trim().is_empty() {
            GuidanceConfig::default()
        } else {
            GuidanceConfig::from_json(json)?
        };
        Ok(Self::new(&config))
    }

    pub fn observe(&mut self, sample: RawSample) -> SmoothedPosition {
        self.smoother.observe(sample)
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn handle(&mut self, command: HostCommand) -> Result<Outcome> {
        let outcome = match command {
            HostCommand::Start { destination } => {
                let origin = self.smoother.current().ok_or(GuidanceError::PositionUnavailable)?;
                self.session.start(origin.point, destination)
            }
            HostCommand::Reroute { origin, destination } => self.session.on_reroute(origin, destination),
            HostCommand::RouteReady { request, route } => Outcome {
                directives: self.session.complete_route(request, Ok(route)).into_directives(),
                route_request: None,
            },
            HostCommand::RouteFailed { request, reason } => Outcome {
                directives: self
                    .session
                    .complete_route(request, Err(GuidanceError::RoutingFailure(reason)))
                    .into_directives(),
                route_request: None,
            },
            HostCommand::Confirm => self.session.confirm()?,
            HostCommand::Stop => self.session.stop(),
            HostCommand::Tick => self.session.tick(self.smoother.current().as_ref()),
            HostCommand::SetOrientation { degrees } => {
                self.smoother.set_orientation(degrees);
                Outcome::default()
            }
        };
        Ok(outcome)
    }

    /// Handle one JSON command and return a JSON reply. Errors are reported
    /// in the reply's `error` field rather than failing the call.
    pub fn handle_json(&mut self, json: &str) -> String {
        let result = serde_json::from_str::<HostCommand>(json)
            .map_err(GuidanceError::from)
            .and_then(|command| self.handle(command));

        let reply = match result {
            Ok(outcome) => HostReply {
                state: self.session.state(),
                directives: outcome.directives.iter().map(|d| d.render()).collect(),
                position: self.smoother.current(),
                route_request: outcome.route_request,
                error: None,
            },
            Err(e) => {
                warn!("host command failed: {e}");
                HostReply {
                    state: self.session.state(),
                    directives: Vec::new(),
                    position: self.smoother.current(),
                    route_request: None,
                    error: Some(e.to_string()),
                }
            }
        };

        serde_json::to_string(&reply).unwrap_or_else(|e| {
            format!(r#"{{"error":"reply serialization failed: {e}"}}"#)
        })
    }
}
