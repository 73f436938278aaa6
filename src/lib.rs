//! Gatehouse - Parental-Gate Coordinator
//!
//! Gatehouse serializes parental-gate confirmation challenges so that at
//! most one is visible at a time. Callers enqueue approval requests
//! (purchases, external links, settings changes); the coordinator presents
//! arithmetic challenges in strict FIFO order, fires each request's
//! approve/cancel callback exactly once, and paces consecutive gates with a
//! short cooldown.
//!
//! The coordinator is a plain owned value with no global state: construct
//! one per app (or per test) and drive it from the thread that owns it.

pub mod config;
pub mod core;
pub mod error;

pub use config::{ChallengeConfig, Config, GateConfig};
pub use core::{
    arithmetic_challenges, arithmetic_pool, Challenge, ChallengePool, ChallengeSource,
    GateCallback, GateCoordinator, GateKind, GateOutcome, GatePhase, GatePresentation,
    GateRequest,
};
pub use error::{GateError, Result};
