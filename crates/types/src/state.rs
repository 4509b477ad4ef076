use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle of one processing run, from upload to completion.
///
/// Transitions are only legal along the documented path:
///
/// ```text
/// Idle -> Processing -> Analyzing -> Completed -> Idle
///             |             |
///             +--> Error <--+          Error -> Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    #[default]
    Idle,
    Processing,
    Analyzing,
    Completed,
    Error,
}

/// Attempted transition outside the documented path.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid phase transition: {from} -> {to}")]
pub struct PhaseError {
    pub from: RunPhase,
    pub to: RunPhase,
}

impl RunPhase {
    /// Whether `next` is reachable from the current phase in one step.
    #[must_use]
    pub fn can_transition(self, next: RunPhase) -> bool {
        use RunPhase::{Analyzing, Completed, Error, Idle, Processing};
        matches!(
            (self, next),
            (Idle, Processing)
                | (Processing, Analyzing | Error)
                | (Analyzing, Completed | Error)
                | (Completed | Error, Idle)
        )
    }

    /// Move to `next`, rejecting transitions outside the documented path.
    pub fn advance_to(&mut self, next: RunPhase) -> Result<(), PhaseError> {
        if self.can_transition(next) {
            *self = next;
            Ok(())
        } else {
            Err(PhaseError {
                from: *self,
                to: next,
            })
        }
    }

    /// Whether a run is currently in flight.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, RunPhase::Processing | RunPhase::Analyzing)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunPhase::Idle => "idle",
            RunPhase::Processing => "processing",
            RunPhase::Analyzing => "analyzing",
            RunPhase::Completed => "completed",
            RunPhase::Error => "error",
        };
        write!(f, "{label}")
    }
}
