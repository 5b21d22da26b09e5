//! Async guidance driver.
//!
//! Wires a `GuidanceSession` to the outside world on a tokio runtime:
//!
//! - position samples are smoothed on the caller's thread and published
//!   through a `watch` channel, so the tick reads the latest fix without
//!   ever touching smoother state;
//! - guidance ticks run in one spawned task on a fixed interval, guarded by
//!   a `CancellationToken`; ticks never overlap;
//! - route requests run as spawned tasks and are applied to the session
//!   under its lock, so a tick sees either the old route or the new one;
//! - directives go through an unbounded channel to a dispatcher task, so a
//!   slow sink never delays a tick.
//!
//! Every session mutation and every directive send happens while holding
//! the session lock. Once `stop()` returns, no further directive can be
//! produced.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::GuidanceConfig;
use crate::directive::Directive;
use crate::dispatch::{DirectiveDispatcher, HapticSink, SpeechSink};
use crate::error::{GuidanceError, Result};
use crate::geo::Point;
use crate::provider::RoutingProvider;
use crate::session::{GuidanceSession, Outcome, RouteRequest, SessionState};
use crate::smoother::{PositionSmoother, RawSample, SmoothedPosition};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Shared<P> {
    config: GuidanceConfig,
    provider: P,
    session: Mutex<GuidanceSession>,
    smoother: Mutex<PositionSmoother>,
    positions: watch::Sender<Option<SmoothedPosition>>,
    directives: mpsc::UnboundedSender<Directive>,
    ticker: Mutex<Option<CancellationToken>>,
    /// Runtime the navigator was created on. Control calls may come from
    /// threads outside it.
    runtime: Handle,
}

impl<P: RoutingProvider> Shared<P> {
    /// Forward directives and launch any route request. Called with the
    /// session lock held.
    fn emit(self: &Arc<Self>, outcome: Outcome) {
        for directive in outcome.directives {
            // The receiver only goes away when the runtime shuts down
            let _ = self.directives.send(directive);
        }
        if let Some(request) = outcome.route_request {
            self.request_route(request);
        }
    }

    fn request_route(self: &Arc<Self>, request: RouteRequest) {
        let shared = Arc::clone(self);
        self.runtime.spawn(async move {
            debug!("planning route {:?}", request.id);
            let result = shared
                .provider
                .plan_route(request.origin, request.destination)
                .await;

            let mut session = lock(&shared.session);
            let directives = session.complete_route(request.id, result).into_directives();
            shared.emit(Outcome {
                directives,
                route_request: None,
            });
            if session.state() == SessionState::Active {
                shared.ensure_ticking();
            }
        });
    }

    fn ensure_ticking(self: &Arc<Self>) {
        let mut ticker = lock(&self.ticker);
        if ticker.as_ref().is_some_and(|t| !t.is_cancelled()) {
            return;
        }
        let token = CancellationToken::new();
        *ticker = Some(token.clone());
        self.runtime.spawn(run_ticks(Arc::clone(self), token));
    }

    fn cancel_ticking(&self) {
        if let Some(token) = lock(&self.ticker).take() {
            token.cancel();
        }
    }

    /// One tick. Returns false once the session no longer needs ticks.
    fn tick(self: &Arc<Self>, token: &CancellationToken) -> bool {
        let position = *self.positions.borrow();
        let mut session = lock(&self.session);
        if token.is_cancelled() {
            return false;
        }
        let outcome = session.tick(position.as_ref());
        self.emit(outcome);
        session.state() == SessionState::Active
    }
}

async fn run_ticks<P: RoutingProvider>(shared: Arc<Shared<P>>, token: CancellationToken) {
    let mut ticker = interval(shared.config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;
    info!("guidance ticks started");

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if !shared.tick(&token) {
            token.cancel();
            break;
        }
    }
    info!("guidance ticks stopped");
}

/// Runs one guidance session at a time on the current tokio runtime.
pub struct Navigator<P> {
    shared: Arc<Shared<P>>,
}

impl<P: RoutingProvider> Navigator<P> {
    /// Validate `config`, create the navigator and spawn its dispatcher
    /// task on the current tokio runtime. The other methods may then be
    /// called from any thread.
    pub fn spawn<H, S>(
        config: GuidanceConfig,
        provider: P,
        dispatcher: DirectiveDispatcher<H, S>,
    ) -> Result<Self>
    where
        H: HapticSink + Send + 'static,
        S: SpeechSink + Send + 'static,
    {
        let config = config.validate()?;
        let runtime = Handle::try_current().map_err(|_| GuidanceError::NoRuntime)?;
        let (directives, rx) = mpsc::unbounded_channel();
        runtime.spawn(dispatcher.run(rx));

        let (positions, _) = watch::channel(None);
        let shared = Shared {
            session: Mutex::new(GuidanceSession::new(&config)),
            smoother: Mutex::new(PositionSmoother::new(config.smoothing_window)),
            config,
            provider,
            positions,
            directives,
            ticker: Mutex::new(None),
            runtime,
        };
        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    /// Feed one raw position sample.
    pub fn observe(&self, sample: RawSample) -> SmoothedPosition {
        let smoothed = lock(&self.shared.smoother).observe(sample);
        self.shared.positions.send_replace(Some(smoothed));
        smoothed
    }

    pub fn set_orientation(&self, degrees: f64) {
        lock(&self.shared.smoother).set_orientation(degrees);
    }

    pub fn position(&self) -> Option<SmoothedPosition> {
        *self.shared.positions.borrow()
    }

    pub fn state(&self) -> SessionState {
        lock(&self.shared.session).state()
    }

    /// Plan a route from the current position to `destination`.
    pub fn start(&self, destination: Point) -> Result<()> {
        let origin = self.position().ok_or(GuidanceError::PositionUnavailable)?;
        self.shared.cancel_ticking();
        let mut session = lock(&self.shared.session);
        let outcome = session.start(origin.point, destination);
        self.shared.emit(outcome);
        Ok(())
    }

    /// Begin guiding along the planned route.
    pub fn confirm(&self) -> Result<()> {
        let mut session = lock(&self.shared.session);
        let outcome = session.confirm()?;
        self.shared.emit(outcome);
        self.shared.ensure_ticking();
        Ok(())
    }

    /// Explicit re-plan requested by the host.
    pub fn reroute(&self, origin: Point, destination: Point) {
        let mut session = lock(&self.shared.session);
        if session.state() != SessionState::Active {
            self.shared.cancel_ticking();
        }
        let outcome = session.on_reroute(origin, destination);
        self.shared.emit(outcome);
    }

    /// Stop guidance. The tick task is cancelled before this returns.
    pub fn stop(&self) {
        let mut session = lock(&self.shared.session);
        self.shared.cancel_ticking();
        let outcome = session.stop();
        self.shared.emit(outcome);
    }
}
