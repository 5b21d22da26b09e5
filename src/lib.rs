//! Turn-by-turn walking guidance.
//!
//! Raw GPS fixes are smoothed, compared against a planned route once per
//! tick, and turned into spoken phrases and haptic commands. The pure state
//! machine lives in `session`; `navigator` drives it on a tokio timer and
//! `host` exposes it to a foreign host over JSON.

pub mod android_jni;
pub mod config;
pub mod directive;
pub mod dispatch;
pub mod error;
pub mod geo;
pub mod gpx;
pub mod host;
pub mod logging;
pub mod milestone;
pub mod navigator;
pub mod offroute;
pub mod provider;
pub mod route;
pub mod route_nav;
pub mod sequencer;
pub mod session;
pub mod smoother;

pub use config::GuidanceConfig;
pub use directive::{Directive, HapticCommand};
pub use error::{GuidanceError, Result};
pub use geo::Point;
pub use navigator::Navigator;
pub use route::RouteModel;
pub use session::{GuidanceSession, SessionState};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
