//! Core types and logic for Gatehouse.
//!
//! This module contains the gate coordinator state machine, the request
//! queue types, and the challenge pool.

pub mod challenge;
pub mod coordinator;
pub mod request;
pub mod state;

pub use challenge::{
    arithmetic_challenges, arithmetic_pool, Challenge, ChallengePool, ChallengeSource,
};
pub use coordinator::GateCoordinator;
pub use request::{GateCallback, GateKind, GateOutcome, GateRequest};
pub use state::{GatePhase, GatePresentation};
