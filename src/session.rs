//! Guidance session.
//!
//! `GuidanceSession` is the single aggregate for one navigation session:
//! session state, the active route, sequencer progress and the outstanding
//! route request. It does no I/O and keeps no clock. Callers feed it
//! positions on each tick and deliver routing results back; it answers with
//! directives to dispatch and route requests to issue.
//!
//! Session states:
//!
//! ```text
//! Idle --start--> RouteRequested --route--> AwaitingStart --confirm--> Active --arrive--> Arrived
//!                       |  failure: back to prior state                   |  off route: re-plan, stays Active
//!                       +--------------------- stop ----------------------+--> Cancelled
//! ```

use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::GuidanceConfig;
use crate::directive::Directive;
use crate::error::{GuidanceError, Result};
use crate::geo::Point;
use crate::milestone::{Announcement, MilestoneAnnouncer};
use crate::offroute::OffRouteDetector;
use crate::route::{RouteModel, TurnDirection};
use crate::sequencer::{InstructionSequencer, SequencerState, Step};
use crate::smoother::SmoothedPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    RouteRequested,
    AwaitingStart,
    Active,
    Arrived,
    Cancelled,
}

/// Identifies one route request. Only the most recent one is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

/// A route the caller should ask the routing provider for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteRequest {
    pub id: RequestId,
    pub origin: Point,
    pub destination: Point,
}

/// Result of a session operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outcome {
    pub directives: Vec<Directive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_request: Option<RouteRequest>,
}

impl Outcome {
    fn say(directive: Directive) -> Self {
        Self {
            directives: vec![directive],
            route_request: None,
        }
    }
}

/// What happened to a routing result.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteCompletion {
    Installed(Vec<Directive>),
    /// Provider failed; the session is back in its prior state.
    Failed(Vec<Directive>),
    /// Superseded by a newer request or by cancellation.
    Discarded,
}

impl RouteCompletion {
    pub fn into_directives(self) -> Vec<Directive> {
        match self {
            RouteCompletion::Installed(d) | RouteCompletion::Failed(d) => d,
            RouteCompletion::Discarded => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Initial,
    Replan,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    request: RouteRequest,
    purpose: Purpose,
    /// State to return to if the provider fails.
    resume: SessionState,
}

pub struct GuidanceSession {
    state: SessionState,
    route: Option<Arc<RouteModel>>,
    progress: SequencerState,
    pending: Option<Pending>,
    next_request_id: u64,
    off_route_latched: bool,
    detector: OffRouteDetector,
    sequencer: InstructionSequencer,
    announcer: MilestoneAnnouncer,
}

impl GuidanceSession {
    pub fn new(config: &GuidanceConfig) -> Self {
        Self {
            state: SessionState::Idle,
            route: None,
            progress: SequencerState::default(),
            pending: None,
            next_request_id: 0,
            off_route_latched: false,
            detector: OffRouteDetector::new(config.off_route_tolerance_m),
            sequencer: InstructionSequencer::new(config.advance_radius_m, config.approach_radius_m),
            announcer: MilestoneAnnouncer::new(
                config.milestones_m.clone(),
                config.milestone_margin_m,
                config.arrival_radius_m,
            ),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn route(&self) -> Option<&Arc<RouteModel>> {
        self.route.as_ref()
    }

    pub fn progress(&self) -> &SequencerState {
        &self.progress
    }

    pub fn pending_request(&self) -> Option<RouteRequest> {
        self.pending.map(|p| p.request)
    }

    /// Plan a route to a new destination. Supersedes any pending request and
    /// pauses guidance until the route is confirmed.
    pub fn start(&mut self, origin: Point, destination: Point) -> Outcome {
        let resume = self.pending.map_or(self.state, |p| p.resume);
        let request = self.issue(origin, destination, Purpose::Initial, resume);
        info!("route requested ({:?}) from {:?}", request.id, self.state);
        self.state = SessionState::RouteRequested;

        Outcome {
            directives: vec![Directive::notice("Calculating route. Please wait.")],
            route_request: Some(request),
        }
    }

    /// Re-plan between two points. While guiding this replaces the route in
    /// place; otherwise it behaves like `start`.
    pub fn on_reroute(&mut self, origin: Point, destination: Point) -> Outcome {
        if self.state != SessionState::Active {
            return self.start(origin, destination);
        }
        let request = self.issue(origin, destination, Purpose::Replan, SessionState::Active);
        info!("re-plan requested ({:?})", request.id);

        Outcome {
            directives: vec![Directive::notice("Recalculating route.")],
            route_request: Some(request),
        }
    }

    /// Apply a routing result. Results for anything but the latest request
    /// are dropped without touching the session.
    pub fn complete_route(&mut self, id: RequestId, result: Result<RouteModel>) -> RouteCompletion {
        let pending = match self.pending.take() {
            Some(p) if p.request.id == id => p,
            other => {
                self.pending = other;
                debug!("discarding stale route result {id:?}");
                return RouteCompletion::Discarded;
            }
        };

        let result = result.and_then(|route| {
            if route.coordinates().is_empty() {
                Err(GuidanceError::routing("provider returned an empty route"))
            } else {
                Ok(route)
            }
        });

        match result {
            Ok(route) => {
                let summary = route.summary();
                self.install(route);
                match pending.purpose {
                    Purpose::Initial => {
                        self.state = SessionState::AwaitingStart;
                        info!("route {id:?} ready: {summary}");
                        RouteCompletion::Installed(vec![Directive::notice(format!(
                            "Route found. {summary}. Press Start to begin."
                        ))])
                    }
                    Purpose::Replan => {
                        self.state = SessionState::Active;
                        info!("re-planned route {id:?} installed: {summary}");
                        RouteCompletion::Installed(vec![Directive::notice("Route updated.")])
                    }
                }
            }
            Err(e) => {
                warn!("route request {id:?} failed: {e}");
                self.state = pending.resume;
                RouteCompletion::Failed(vec![Directive::notice(
                    "Route not found. Try a different destination.",
                )])
            }
        }
    }

    /// Begin guiding along the route that was just planned.
    pub fn confirm(&mut self) -> Result<Outcome> {
        if self.state != SessionState::AwaitingStart {
            return Err(GuidanceError::InvalidTransition {
                state: self.state,
                action: "confirm",
            });
        }
        self.state = SessionState::Active;
        info!("guidance active");
        Ok(Outcome::say(Directive::notice("Navigation started. Walk forward.")))
    }

    /// Cancel the session. Any in-flight request is forgotten.
    pub fn stop(&mut self) -> Outcome {
        match self.state {
            SessionState::RouteRequested | SessionState::AwaitingStart | SessionState::Active => {
                info!("session cancelled from {:?}", self.state);
                self.state = SessionState::Cancelled;
                self.pending = None;
                self.off_route_latched = false;
                Outcome::say(Directive::Stopped)
            }
            SessionState::Idle | SessionState::Arrived | SessionState::Cancelled => {
                Outcome::default()
            }
        }
    }

    /// One guidance tick: off-route check, then the sequencer, then
    /// arrival and milestones.
    pub fn tick(&mut self, position: Option<&SmoothedPosition>) -> Outcome {
        if self.state != SessionState::Active {
            return Outcome::default();
        }
        let Some(position) = position else {
            debug!("no position fix yet, deferring tick");
            return Outcome::default();
        };
        let Some(route) = self.route.clone() else {
            return Outcome::default();
        };
        if matches!(self.pending, Some(Pending { purpose: Purpose::Replan, .. })) {
            return Outcome::default();
        }

        let here = position.point;
        let mut outcome = Outcome::default();

        if self.detector.check(&here, &route) {
            // One directive and one re-plan per excursion
            if !self.off_route_latched {
                self.off_route_latched = true;
                info!(
                    "off route by {:.0} m",
                    self.detector.deviation_m(&here, &route)
                );
                outcome.directives.push(Directive::OffRoute);
                outcome.route_request = Some(self.issue(
                    here,
                    route.destination(),
                    Purpose::Replan,
                    SessionState::Active,
                ));
            }
            return outcome;
        }
        self.off_route_latched = false;

        match self.sequencer.step(&mut self.progress, &here, &route) {
            Ok(Some(Step::Advanced { text })) => {
                outcome.directives.push(Directive::Continue { text });
                return outcome;
            }
            Ok(Some(Step::Approaching { direction, distance_m })) => {
                let distance_m = match direction {
                    TurnDirection::Forward => None,
                    TurnDirection::Left | TurnDirection::Right => Some(distance_m.round() as u32),
                };
                outcome.directives.push(Directive::Turn { direction, distance_m });
            }
            Ok(None) => {}
            Err(e) => warn!("skipping turn guidance this tick: {e}"),
        }

        let destination = route.destination();
        let announcement = if outcome.directives.is_empty() {
            self.announcer.evaluate(&mut self.progress, &here, &destination)
        } else {
            // A milestone now would cut off the turn warning; it waits a tick
            self.announcer
                .arrived(&here, &destination)
                .then_some(Announcement::Arrived)
        };
        match announcement {
            Some(Announcement::Arrived) => {
                info!("arrived");
                self.state = SessionState::Arrived;
                self.pending = None;
                outcome.directives.push(Directive::Arrived);
            }
            Some(Announcement::Milestone(meters)) => {
                outcome.directives.push(Directive::DistanceMilestone { meters });
            }
            None => {}
        }

        outcome
    }

    fn issue(
        &mut self,
        origin: Point,
        destination: Point,
        purpose: Purpose,
        resume: SessionState,
    ) -> RouteRequest {
        self.next_request_id += 1;
        let request = RouteRequest {
            id: RequestId(self.next_request_id),
            origin,
            destination,
        };
        let superseded = self.pending.replace(Pending {
            request,
            purpose,
            resume,
        });
        if let Some(old) = superseded {
            debug!("request {:?} superseded by {:?}", old.request.id, request.id);
        }
        request
    }

    /// Swap in a new route. Progress is reset unconditionally: the cursor
    /// and dedup key index the old instruction list and would alias.
    fn install(&mut self, route: RouteModel) {
        self.route = Some(Arc::new(route));
        self.progress = SequencerState::default();
        self.off_route_latched = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{destination_point, distance_m};
    use crate::route::{Instruction, InstructionKind};

    const START: Point = Point::new(48.2, 16.37);

    fn fix(point: Point) -> SmoothedPosition {
        SmoothedPosition { point, heading_deg: None }
    }

    /// Polyline with a vertex every 20 m along each (bearing, length) leg.
    /// One instruction per leg start plus arrival.
    fn dense_route(legs: &[(f64, f64, InstructionKind, &str)]) -> RouteModel {
        let mut coordinates = vec![START];
        let mut instructions = Vec::new();
        for &(bearing, length, kind, text) in legs {
            instructions.push(Instruction::new(kind, text, coordinates.len() - 1));
            let from = *coordinates.last().unwrap();
            let steps = (length / 20.0).round() as usize;
            for s in 1..=steps {
                coordinates.push(destination_point(&from, bearing, 20.0 * s as f64));
            }
        }
        let destination = *coordinates.last().unwrap();
        instructions.push(Instruction::new(InstructionKind::Arrive, "Arrive", coordinates.len() - 1));
        let total: f64 = legs.iter().map(|l| l.1).sum();
        RouteModel::new(coordinates, instructions, destination, total, total / 1.4)
    }

    fn straight_route(length: f64) -> RouteModel {
        dense_route(&[(0.0, length, InstructionKind::Straight, "Head north")])
    }

    /// 200 m north, right turn, 600 m east.
    fn right_turn_route() -> RouteModel {
        dense_route(&[
            (0.0, 200.0, InstructionKind::Straight, "Head north"),
            (90.0, 600.0, InstructionKind::TurnRight, "Turn right onto Ring"),
        ])
    }

    fn active_session(route: RouteModel) -> GuidanceSession {
        let mut session = GuidanceSession::new(&GuidanceConfig::default());
        let outcome = session.start(START, route.destination());
        let id = outcome.route_request.unwrap().id;
        assert!(matches!(session.complete_route(id, Ok(route)), RouteCompletion::Installed(_)));
        session.confirm().unwrap();
        session
    }

    fn turns(outcome: &Outcome) -> Vec<&Directive> {
        outcome
            .directives
            .iter()
            .filter(|d| matches!(d, Directive::Turn { .. }))
            .collect()
    }

    #[test]
    fn start_plan_confirm() {
        let route = straight_route(400.0);
        let mut session = GuidanceSession::new(&GuidanceConfig::default());
        assert_eq!(session.state(), SessionState::Idle);

        let outcome = session.start(START, route.destination());
        assert_eq!(session.state(), SessionState::RouteRequested);
        let request = outcome.route_request.unwrap();
        assert_eq!(request.origin, START);
        assert_eq!(outcome.directives.len(), 1);

        match session.complete_route(request.id, Ok(route)) {
            RouteCompletion::Installed(directives) => {
                let phrase = directives[0].phrase().unwrap();
                assert!(phrase.starts_with("Route found. 0.4 kilometers"), "got {phrase}");
            }
            other => panic!("expected install, got {other:?}"),
        }
        assert_eq!(session.state(), SessionState::AwaitingStart);

        session.confirm().unwrap();
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn confirm_requires_planned_route() {
        let mut session = GuidanceSession::new(&GuidanceConfig::default());
        let err = session.confirm().unwrap_err();
        assert!(matches!(err, GuidanceError::InvalidTransition { state: SessionState::Idle, .. }));
    }

    #[test]
    fn routing_failure_restores_state() {
        let mut session = GuidanceSession::new(&GuidanceConfig::default());
        let id = session.start(START, START).route_request.unwrap().id;

        let completion = session.complete_route(id, Err(GuidanceError::routing("no path")));
        match completion {
            RouteCompletion::Failed(directives) => assert_eq!(directives.len(), 1),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.pending_request(), None);
    }

    #[test]
    fn empty_route_counts_as_failure() {
        let mut session = GuidanceSession::new(&GuidanceConfig::default());
        let id = session.start(START, START).route_request.unwrap().id;
        let empty = RouteModel::new(Vec::new(), Vec::new(), START, 0.0, 0.0);
        assert!(matches!(session.complete_route(id, Ok(empty)), RouteCompletion::Failed(_)));
    }

    #[test]
    fn superseded_result_is_discarded() {
        let route = straight_route(400.0);
        let mut session = GuidanceSession::new(&GuidanceConfig::default());
        let first = session.start(START, route.destination()).route_request.unwrap().id;
        let second = session.start(START, route.destination()).route_request.unwrap().id;
        assert_ne!(first, second);

        assert_eq!(session.complete_route(first, Ok(route.clone())), RouteCompletion::Discarded);
        assert_eq!(session.state(), SessionState::RouteRequested);
        assert!(session.route().is_none());

        assert!(matches!(session.complete_route(second, Ok(route)), RouteCompletion::Installed(_)));
    }

    #[test]
    fn superseding_keeps_first_resume_state() {
        let mut session = active_session(straight_route(400.0));
        let first = session.start(START, START).route_request.unwrap().id;
        let second = session.start(START, START).route_request.unwrap().id;

        assert_eq!(session.complete_route(first, Err(GuidanceError::routing("x"))), RouteCompletion::Discarded);
        session.complete_route(second, Err(GuidanceError::routing("x")));
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn stop_discards_in_flight_request() {
        let route = straight_route(400.0);
        let mut session = GuidanceSession::new(&GuidanceConfig::default());
        let id = session.start(START, route.destination()).route_request.unwrap().id;

        assert_eq!(session.stop().directives, vec![Directive::Stopped]);
        assert_eq!(session.state(), SessionState::Cancelled);
        assert_eq!(session.complete_route(id, Ok(route)), RouteCompletion::Discarded);
        assert_eq!(session.state(), SessionState::Cancelled);

        // Stopping again says nothing
        assert_eq!(session.stop(), Outcome::default());
    }

    #[test]
    fn no_directives_after_stop() {
        let route = straight_route(400.0);
        let near_end = destination_point(&route.destination(), 180.0, 5.0);
        let mut session = active_session(route);
        session.stop();
        assert_eq!(session.tick(Some(&fix(near_end))), Outcome::default());
    }

    #[test]
    fn sensor_gap_defers_tick() {
        let mut session = active_session(straight_route(400.0));
        assert_eq!(session.tick(None), Outcome::default());
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn ticks_ignored_until_confirmed() {
        let route = straight_route(400.0);
        let destination = route.destination();
        let mut session = GuidanceSession::new(&GuidanceConfig::default());
        let id = session.start(START, destination).route_request.unwrap().id;
        session.complete_route(id, Ok(route));
        assert_eq!(session.tick(Some(&fix(destination))), Outcome::default());
    }

    #[test]
    fn milestone_at_fixed_distance_fires_once() {
        let route = straight_route(400.0);
        let destination = route.destination();
        let position = fix(destination_point(&destination, 180.0, 100.0));
        let mut session = active_session(route);

        let outcome = session.tick(Some(&position));
        assert_eq!(outcome.directives, vec![Directive::DistanceMilestone { meters: 100 }]);
        for _ in 0..10 {
            assert_eq!(session.tick(Some(&position)), Outcome::default());
        }

        let closer = fix(destination_point(&destination, 180.0, 45.0));
        assert_eq!(session.tick(Some(&closer)).directives, vec![Directive::DistanceMilestone { meters: 50 }]);
    }

    #[test]
    fn off_route_requests_replan_once() {
        let route = straight_route(400.0);
        let destination = route.destination();
        // 45 m east of the third vertex, farther from all others
        let position = fix(destination_point(&route.coordinates()[2], 90.0, 45.0));
        let mut session = active_session(route);

        let outcome = session.tick(Some(&position));
        assert_eq!(outcome.directives, vec![Directive::OffRoute]);
        let request = outcome.route_request.unwrap();
        assert_eq!(request.origin, position.point);
        assert_eq!(request.destination, destination);

        // Pending re-plan pauses guidance
        assert_eq!(session.tick(Some(&position)), Outcome::default());
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn failed_replan_is_not_retried_automatically() {
        let route = straight_route(400.0);
        let position = fix(destination_point(&route.coordinates()[2], 90.0, 45.0));
        let mut session = active_session(route);

        let id = session.tick(Some(&position)).route_request.unwrap().id;
        session.complete_route(id, Err(GuidanceError::routing("offline")));
        assert_eq!(session.state(), SessionState::Active);

        let outcome = session.tick(Some(&position));
        assert_eq!(outcome.route_request, None);
        assert!(outcome.directives.is_empty());
    }

    #[test]
    fn replan_installs_fresh_progress() {
        let route = right_turn_route();
        let corner = route.coordinates()[10];
        let mut session = active_session(route.clone());

        // Warn and pass the corner on the first route
        session.tick(Some(&fix(destination_point(&corner, 180.0, 30.0))));
        session.tick(Some(&fix(corner)));
        assert_eq!(session.progress().current_index, 1);

        let id = session.on_reroute(corner, route.destination()).route_request.unwrap().id;
        assert_eq!(session.state(), SessionState::Active);
        assert!(matches!(session.complete_route(id, Ok(route)), RouteCompletion::Installed(_)));
        assert_eq!(*session.progress(), SequencerState::default());
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn approach_then_advance_scenario() {
        let route = right_turn_route();
        let corner = route.coordinates()[10];
        let mut session = active_session(route);
        let south = |m: f64| fix(destination_point(&corner, 180.0, m));

        assert!(session.tick(Some(&south(50.0))).directives.is_empty());

        let outcome = session.tick(Some(&south(30.0)));
        assert_eq!(turns(&outcome), vec![&Directive::Turn {
            direction: TurnDirection::Right,
            distance_m: Some(30),
        }]);
        assert_eq!(outcome.directives[0].phrase().as_deref(), Some("Turn right in 30 meters."));

        assert!(turns(&session.tick(Some(&south(20.0)))).is_empty());

        let outcome = session.tick(Some(&south(5.0)));
        assert_eq!(outcome.directives, vec![Directive::Continue { text: "Turn right onto Ring".into() }]);
        assert_eq!(session.progress().current_index, 1);

        let outcome = session.tick(Some(&south(7.0)));
        assert!(turns(&outcome).is_empty(), "re-fired after advance: {outcome:?}");
        assert_eq!(session.progress().current_index, 1);
    }

    #[test]
    fn turn_warning_holds_back_milestone() {
        // Right turn 100 m before the destination
        let route = dense_route(&[
            (0.0, 200.0, InstructionKind::Straight, "Head north"),
            (90.0, 100.0, InstructionKind::TurnRight, "Turn right"),
        ]);
        let corner = route.coordinates()[10];
        let mut session = active_session(route);
        let south = |m: f64| fix(destination_point(&corner, 180.0, m));

        let spoken: Vec<_> = [120.0, 90.0, 60.0]
            .into_iter()
            .flat_map(|m| session.tick(Some(&south(m))).directives)
            .collect();
        assert_eq!(spoken, vec![Directive::DistanceMilestone { meters: 200 }]);

        // 104 m from the destination: 100 m milestone and turn warning both due
        let outcome = session.tick(Some(&south(30.0)));
        assert_eq!(outcome.directives, vec![Directive::Turn {
            direction: TurnDirection::Right,
            distance_m: Some(30),
        }]);

        let outcome = session.tick(Some(&south(30.0)));
        assert_eq!(outcome.directives, vec![Directive::DistanceMilestone { meters: 100 }]);
    }

    #[test]
    fn arrival_still_checked_alongside_turn_warning() {
        // Left turn 20 m short of the destination
        let route = dense_route(&[
            (0.0, 200.0, InstructionKind::Straight, "Head north"),
            (270.0, 20.0, InstructionKind::TurnLeft, "Turn left"),
        ]);
        let corner = route.coordinates()[10];
        let mut session = active_session(route);

        // 12 m past the corner, 8 m from the end
        let outcome = session.tick(Some(&fix(destination_point(&corner, 270.0, 12.0))));
        assert_eq!(turns(&outcome).len(), 1);
        assert_eq!(outcome.directives.last(), Some(&Directive::Arrived));
        assert_eq!(session.state(), SessionState::Arrived);
    }

    #[test]
    fn arrival_is_announced_exactly_once() {
        let route = straight_route(400.0);
        let destination = route.destination();
        let mut session = active_session(route);
        let at = fix(destination_point(&destination, 180.0, 10.0));

        let outcome = session.tick(Some(&at));
        assert_eq!(outcome.directives.last(), Some(&Directive::Arrived));
        assert_eq!(session.state(), SessionState::Arrived);

        for _ in 0..5 {
            assert_eq!(session.tick(Some(&at)), Outcome::default());
        }
        assert_eq!(session.stop(), Outcome::default());
    }

    #[test]
    fn malformed_instruction_skips_only_turn_guidance() {
        let coordinates: Vec<Point> = (0..=20)
            .map(|i| destination_point(&START, 0.0, 20.0 * i as f64))
            .collect();
        let destination = *coordinates.last().unwrap();
        let route = RouteModel::new(
            coordinates,
            vec![
                Instruction::new(InstructionKind::Straight, "Head north", 0),
                Instruction::new(InstructionKind::TurnLeft, "Turn left", 99),
            ],
            destination,
            400.0,
            285.0,
        );
        let mut session = active_session(route);
        let position = fix(destination_point(&destination, 180.0, 95.0));
        assert!(distance_m(&position.point, &destination) < 110.0);

        let outcome = session.tick(Some(&position));
        assert_eq!(outcome.directives, vec![Directive::DistanceMilestone { meters: 100 }]);
        assert_eq!(session.progress().current_index, 0);
    }

    #[test]
    fn reroute_when_idle_behaves_like_start() {
        let mut session = GuidanceSession::new(&GuidanceConfig::default());
        let outcome = session.on_reroute(START, START);
        assert!(outcome.route_request.is_some());
        assert_eq!(session.state(), SessionState::RouteRequested);
    }
}
