//! Gate coordinator: FIFO serialization of confirmation challenges.
//!
//! The coordinator guarantees that at most one gate is visible at a time,
//! that requests resolve in arrival order, and that each request's terminal
//! callback fires exactly once. The active request stays at the queue front
//! until it resolves; it is removed at resolution time, not when shown, so
//! an interrupted presentation can never silently drop a request.
//!
//! All calls must come from the single thread that owns the coordinator
//! (the type is `!Send` by construction). Callers on other threads must
//! marshal onto that thread first.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use crate::config::Config;
use crate::core::challenge::{arithmetic_pool, Challenge, ChallengeSource};
use crate::core::request::{GateOutcome, GateRequest};
use crate::core::state::{GatePhase, GatePresentation};
use crate::error::Result;

/// Serializes presentation of parental-gate challenges.
pub struct GateCoordinator {
    /// Pending requests, FIFO. The active request is always the front.
    queue: VecDeque<GateRequest>,
    /// Current phase of the state machine.
    phase: GatePhase,
    /// Challenge bound to the active request, if any.
    current_challenge: Option<Challenge>,
    /// Deadline after which the next queued request may be shown.
    cooldown_until: Option<DateTime<Utc>>,
    /// Guard against concurrent queue drains; true from first show until
    /// the queue empties.
    is_processing: bool,
    /// Delay between resolving one gate and showing the next.
    cooldown: Duration,
    /// Where challenges come from.
    source: Box<dyn ChallengeSource>,
}

impl GateCoordinator {
    /// Create a coordinator with the default arithmetic pool from config.
    ///
    /// Fails only on misconfiguration (empty operand range, bad option
    /// count); a constructed coordinator never errors at runtime.
    pub fn new(config: &Config) -> Result<Self> {
        let pool = arithmetic_pool(&config.challenges)?;
        // Config fields are public, so the value may bypass the load-time
        // guards; clamp rather than wrap on the cast.
        let cooldown_ms = config
            .gate
            .cooldown_ms
            .clamp(crate::config::MIN_COOLDOWN_MS, crate::config::MAX_COOLDOWN_MS);
        Ok(Self::with_source(
            Box::new(pool),
            Duration::milliseconds(cooldown_ms as i64),
        ))
    }

    /// Create a coordinator with an explicit challenge source and cooldown.
    pub fn with_source(source: Box<dyn ChallengeSource>, cooldown: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            phase: GatePhase::Idle,
            current_challenge: None,
            cooldown_until: None,
            is_processing: false,
            cooldown,
            source,
        }
    }

    // =========================================================================
    // Caller entry point
    // =========================================================================

    /// Append a request to the queue; start processing if not already.
    ///
    /// Never fails. Exactly one of the request's callbacks will eventually
    /// fire, unless the coordinator is dropped first (app teardown).
    pub fn request_approval(&mut self, request: GateRequest) {
        tracing::debug!(kind = ?request.kind(), queued = self.queue.len(), "gate request enqueued");
        self.queue.push_back(request);
        if !self.is_processing {
            self.process_next();
        }
    }

    // =========================================================================
    // Presentation surface entry points
    // =========================================================================

    /// Resolve the active gate with the user's selected option.
    ///
    /// Correct answer approves, wrong answer cancels. No-op when no gate is
    /// active.
    pub fn submit_answer(&mut self, selected: u32) {
        let Some(challenge) = self.current_challenge.as_ref() else {
            tracing::debug!("submit_answer with no active gate; ignoring");
            return;
        };

        let outcome = if challenge.is_correct(selected) {
            GateOutcome::Approved
        } else {
            GateOutcome::Cancelled
        };
        self.finalize(outcome);
    }

    /// Resolve the active gate as if the user dismissed it.
    ///
    /// Queued-but-not-active requests are unaffected. No-op when no gate is
    /// active.
    pub fn cancel_active(&mut self) {
        if self.current_challenge.is_none() {
            tracing::debug!("cancel_active with no active gate; ignoring");
            return;
        }
        self.finalize(GateOutcome::Cancelled);
    }

    // =========================================================================
    // Host timer entry point
    // =========================================================================

    /// Advance out of cooldown if its deadline has passed.
    ///
    /// The host's timer facility calls this (one-shot timer set for
    /// [`cooldown_remaining`](Self::cooldown_remaining), or a frame tick).
    pub fn tick(&mut self) {
        self.tick_at(Utc::now());
    }

    /// [`tick`](Self::tick) against an explicit clock reading.
    pub fn tick_at(&mut self, now: DateTime<Utc>) {
        if self.phase != GatePhase::Cooldown {
            return;
        }
        match self.cooldown_until {
            Some(until) if now >= until => self.process_next(),
            _ => {}
        }
    }

    // =========================================================================
    // Observable state
    // =========================================================================

    /// Current phase of the state machine.
    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// Whether a gate is currently visible.
    pub fn is_visible(&self) -> bool {
        self.phase.is_visible()
    }

    /// Whether a queue drain is in progress.
    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// Number of unresolved requests, the active one included.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The challenge bound to the active request, if any.
    pub fn challenge(&self) -> Option<&Challenge> {
        self.current_challenge.as_ref()
    }

    /// Render-ready snapshot of the visible gate, or `None` when hidden.
    pub fn presentation(&self) -> Option<GatePresentation> {
        let challenge = self.current_challenge.as_ref()?;
        let front = self.queue.front()?;
        Some(GatePresentation::new(front.kind(), challenge))
    }

    /// Time left until the next gate may be shown, while in cooldown.
    pub fn cooldown_remaining(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        if self.phase != GatePhase::Cooldown {
            return None;
        }
        let until = self.cooldown_until?;
        (until - now).to_std().ok()
    }

    // =========================================================================
    // Internal steps
    // =========================================================================

    /// Resolve the active request and schedule or stop the drain.
    ///
    /// Coordinator state is fully updated before the terminal callback runs:
    /// a panicking callback unwinds through a consistent coordinator.
    fn finalize(&mut self, outcome: GateOutcome) {
        // The active request is still the queue front; it was never removed
        // on activation, only here at resolution.
        let Some(mut request) = self.queue.pop_front() else {
            return;
        };

        self.current_challenge = None;
        if self.queue.is_empty() {
            self.phase = GatePhase::Idle;
            self.cooldown_until = None;
            self.is_processing = false;
        } else {
            self.phase = GatePhase::Cooldown;
            self.cooldown_until = Some(Utc::now() + self.cooldown);
        }
        tracing::debug!(
            kind = ?request.kind(),
            ?outcome,
            remaining = self.queue.len(),
            "gate resolved"
        );

        if let Some(callback) = request.take_callback(outcome) {
            callback();
        }
    }

    /// Show the request at the queue front, if any.
    fn process_next(&mut self) {
        self.cooldown_until = None;
        let Some(front) = self.queue.front() else {
            self.phase = GatePhase::Idle;
            self.is_processing = false;
            return;
        };

        self.is_processing = true;
        // Fresh independent draw for every presentation.
        let challenge = self.source.draw();
        tracing::debug!(kind = ?front.kind(), prompt = %challenge.prompt, "gate shown");
        self.current_challenge = Some(challenge);
        self.phase = GatePhase::Showing;
    }
}

impl std::fmt::Debug for GateCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateCoordinator")
            .field("phase", &self.phase)
            .field("queue_len", &self.queue.len())
            .field("is_processing", &self.is_processing)
            .field("cooldown_until", &self.cooldown_until)
            .finish()
    }
}
