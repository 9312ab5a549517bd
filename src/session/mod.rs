//! Streaming session state and lifecycle.

pub mod aggregator;
pub mod controller;

pub use aggregator::{
    Applied, ProgressSnapshot, SessionOutcome, SessionPhase, SessionState, MAX_LOG_ENTRIES,
};
pub use controller::{SessionController, SessionUpdate, DEFAULT_SETTLE_DELAY};
