//! Gate request types.
//!
//! A [`GateRequest`] represents one pending confirmation need. It owns its
//! terminal callbacks; the coordinator owns the request until it resolves,
//! so ownership flows one way and callbacks never need to reference the
//! coordinator back.

use serde::{Deserialize, Serialize};

/// Terminal callback for a resolved request.
pub type GateCallback = Box<dyn FnOnce()>;

/// Category of action being gated.
///
/// Purely descriptive; selects the title/message copy shown alongside the
/// challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    /// An in-app purchase attempt.
    Purchase,
    /// Following a link out of the app.
    ExternalLink,
    /// Changing a protected setting.
    SettingsChange,
    /// Caller-defined category without dedicated copy.
    Other,
}

impl GateKind {
    /// Dialog title for this kind.
    pub fn title(&self) -> &'static str {
        match self {
            GateKind::Purchase => "Ask a grown-up",
            GateKind::ExternalLink => "Leaving the app",
            GateKind::SettingsChange => "Grown-ups only",
            GateKind::Other => "Just checking",
        }
    }

    /// Dialog message for this kind.
    pub fn message(&self) -> &'static str {
        match self {
            GateKind::Purchase => "A grown-up needs to approve this purchase.",
            GateKind::ExternalLink => "This link leaves the app. Ask a grown-up first.",
            GateKind::SettingsChange => "Solve the puzzle to change this setting.",
            GateKind::Other => "Solve the puzzle to continue.",
        }
    }
}

/// How a request resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOutcome {
    /// Correct answer; the gated action may proceed.
    Approved,
    /// Wrong answer or dismissal; the gated action is refused.
    Cancelled,
}

/// One pending confirmation need.
///
/// Each callback fires at most once: `resolve` takes it out of the request,
/// and a request is dropped right after its terminal callback runs.
pub struct GateRequest {
    kind: GateKind,
    on_approve: Option<GateCallback>,
    on_cancel: Option<GateCallback>,
}

impl GateRequest {
    /// Create a request with an approval callback.
    pub fn new(kind: GateKind, on_approve: impl FnOnce() + 'static) -> Self {
        Self {
            kind,
            on_approve: Some(Box::new(on_approve)),
            on_cancel: None,
        }
    }

    /// Attach a cancellation callback.
    pub fn with_cancel(mut self, on_cancel: impl FnOnce() + 'static) -> Self {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }

    /// The request's category.
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Take the terminal callback for the given outcome, if one remains.
    ///
    /// Called by the coordinator after it has already updated its own state,
    /// so a panicking callback cannot leave the queue inconsistent.
    pub(crate) fn take_callback(&mut self, outcome: GateOutcome) -> Option<GateCallback> {
        match outcome {
            GateOutcome::Approved => self.on_approve.take(),
            GateOutcome::Cancelled => self.on_cancel.take(),
        }
    }
}

impl std::fmt::Debug for GateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateRequest")
            .field("kind", &self.kind)
            .field("has_on_approve", &self.on_approve.is_some())
            .field("has_on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_kind_copy() {
        assert!(GateKind::Purchase.title().contains("grown-up"));
        assert!(GateKind::ExternalLink.message().contains("link"));
        assert!(!GateKind::SettingsChange.title().is_empty());
        assert!(!GateKind::Other.message().is_empty());
    }

    #[test]
    fn test_take_approve_callback_fires_once() {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let mut request = GateRequest::new(GateKind::Purchase, move || {
            counter.set(counter.get() + 1);
        });

        request.take_callback(GateOutcome::Approved).unwrap()();
        assert_eq!(fired.get(), 1);

        // Second take yields nothing
        assert!(request.take_callback(GateOutcome::Approved).is_none());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_cancel_callback_is_optional() {
        let mut request = GateRequest::new(GateKind::Other, || {});
        assert!(request.take_callback(GateOutcome::Cancelled).is_none());
    }

    #[test]
    fn test_with_cancel() {
        let cancelled = Rc::new(Cell::new(false));
        let flag = Rc::clone(&cancelled);
        let mut request =
            GateRequest::new(GateKind::ExternalLink, || {}).with_cancel(move || flag.set(true));

        request.take_callback(GateOutcome::Cancelled).unwrap()();
        assert!(cancelled.get());
        // The approve callback is still present but will be dropped unfired.
        assert_eq!(request.kind(), GateKind::ExternalLink);
    }

    #[test]
    fn test_kind_serialization() {
        for kind in [
            GateKind::Purchase,
            GateKind::ExternalLink,
            GateKind::SettingsChange,
            GateKind::Other,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            let deserialized: GateKind = serde_json::from_str(&json).unwrap();
            assert_eq!(kind, deserialized);
        }
    }

    #[test]
    fn test_outcome_serialization() {
        for outcome in [GateOutcome::Approved, GateOutcome::Cancelled] {
            let json = serde_json::to_string(&outcome).unwrap();
            let deserialized: GateOutcome = serde_json::from_str(&json).unwrap();
            assert_eq!(outcome, deserialized);
        }
    }
}
