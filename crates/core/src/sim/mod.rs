//! Request planning and replay.
//!
//! Requests are handled in two phases:
//! 1. **Plan:** [`RequestPlanner`] turns a request and a read-only snapshot into an
//!    immutable [`EventTrace`].
//! 2. **Replay:** [`Engine::step`] applies the trace one event at a time.

/// The stepping engine.
pub mod engine;
/// Event and trace types.
pub mod event;
/// Pure request planning.
pub mod planner;

pub use engine::{Engine, EngineState};
pub use event::{CacheEvent, EventKind, EventTrace, LineFill};
pub use planner::RequestPlanner;
