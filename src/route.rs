//! Routing request state machine
//!
//! Every routing request moves through a fixed set of phases:
//! `Idle → Lookup → {Matched, Unmatched}`, then `Matched →
//! StageExecuting(0) → StageExecuting(1) → ... → {Completed, Aborted}` and
//! `Unmatched → Reported`. Transitions are validated so an out-of-order
//! phase is impossible to record, and the trace of phases a request passed
//! through is kept for observability.

use serde::{Deserialize, Serialize};

/// Phase of a single routing request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoutePhase {
    /// Request created, nothing looked up yet
    Idle,

    /// Scanning the registry for a pipeline with the requested tag
    Lookup,

    /// A pipeline matched the tag; execution is about to start
    Matched,

    /// No registered pipeline matched the tag
    Unmatched,

    /// Stage at this index is executing
    StageExecuting(usize),

    /// All stages ran; final output rendered
    Completed,

    /// A stage failed or the request was cancelled; remaining stages skipped
    Aborted,

    /// The routing failure was reported to the caller
    Reported,
}

impl RoutePhase {
    /// Whether this phase can legally follow `self`
    pub fn can_transition_to(&self, next: RoutePhase) -> bool {
        use RoutePhase::*;
        match (*self, next) {
            (Idle, Lookup) => true,
            (Lookup, Matched) | (Lookup, Unmatched) => true,
            (Matched, StageExecuting(0)) | (Matched, Completed) | (Matched, Aborted) => true,
            (StageExecuting(i), StageExecuting(j)) => j == i + 1,
            (StageExecuting(_), Completed) | (StageExecuting(_), Aborted) => true,
            (Unmatched, Reported) => true,
            _ => false,
        }
    }

    /// Whether the request is finished in this phase
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RoutePhase::Completed | RoutePhase::Aborted | RoutePhase::Reported
        )
    }
}

/// Ordered trace of the phases one routing request passed through
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteTrace {
    phases: Vec<RoutePhase>,
}

impl RouteTrace {
    /// Start a trace for a request entering the manager
    pub fn new() -> Self {
        Self {
            phases: vec![RoutePhase::Idle],
        }
    }

    /// Start a trace for a pipeline invoked directly, without routing
    pub(crate) fn matched() -> Self {
        Self {
            phases: vec![RoutePhase::Matched],
        }
    }

    /// Record the next phase
    ///
    /// Illegal transitions are a logic error in the executor, not a runtime
    /// condition, so they only trip a debug assertion.
    pub(crate) fn push(&mut self, phase: RoutePhase) {
        debug_assert!(
            self.last().can_transition_to(phase),
            "illegal route transition: {:?} -> {:?}",
            self.last(),
            phase
        );
        self.phases.push(phase);
    }

    /// The current (most recent) phase
    pub fn last(&self) -> RoutePhase {
        // The constructors guarantee at least one phase.
        *self.phases.last().unwrap()
    }

    /// All phases in order
    pub fn phases(&self) -> &[RoutePhase] {
        &self.phases
    }

    /// Whether the request reached a terminal phase
    pub fn is_terminal(&self) -> bool {
        self.last().is_terminal()
    }
}

impl Default for RouteTrace {
    fn default() -> Self {
        Self::new()
    }
}
