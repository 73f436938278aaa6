//! Observable coordinator state.

use serde::{Deserialize, Serialize};

use crate::core::challenge::Challenge;
use crate::core::request::GateKind;

/// Phase of the gate coordinator's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GatePhase {
    /// Queue empty, nothing shown.
    #[default]
    Idle,
    /// A request is active and its challenge is displayed.
    Showing,
    /// One request just resolved; brief delay before showing the next.
    Cooldown,
}

impl GatePhase {
    /// Whether a challenge is currently presented to the user.
    pub fn is_visible(&self) -> bool {
        matches!(self, GatePhase::Showing)
    }
}

/// Snapshot handed to the presentation surface while a gate is visible.
///
/// Everything the UI needs to render one gate: the per-kind dialog copy plus
/// the challenge prompt and its candidate answers. The correct answer is
/// deliberately absent; the UI reports the selection back through
/// `submit_answer`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatePresentation {
    /// Category of the active request.
    pub kind: GateKind,
    /// Dialog title for the kind.
    pub title: String,
    /// Dialog message for the kind.
    pub message: String,
    /// Challenge question text.
    pub prompt: String,
    /// Candidate answers, in display order.
    pub options: Vec<u32>,
}

impl GatePresentation {
    /// Build a presentation for an active request and its drawn challenge.
    pub(crate) fn new(kind: GateKind, challenge: &Challenge) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            message: kind.message().to_string(),
            prompt: challenge.prompt.clone(),
            options: challenge.options.clone(),
        }
    }
}
