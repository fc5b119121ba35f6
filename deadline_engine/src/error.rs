//! Engine error taxonomy.
//!
//! Domain failures raised by the world model, the dispatcher and the event log.
//! Application plumbing (file IO, parsing, the REPL) wraps these in `anyhow::Error`;
//! the REPL downcasts where a failure is recoverable.

use thiserror::Error;

/// Failures the session engine can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Lookup of a location or item that doesn't exist (corrupt world description).
    #[error("no {kind} with id '{id}' exists in this world")]
    NotFound { kind: &'static str, id: String },
    /// An ownership transfer or command edit that contradicts current state (a logic bug).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// Input outside the legal command set for this turn.
    #[error("'{0}' is not a legal command here")]
    InvalidCommand(String),
    /// Attempt to undo past the start of the game.
    #[error("nothing to undo")]
    Underflow,
    /// The most recent turn can't be reversed safely.
    #[error("cannot undo: {0}")]
    Irreversible(String),
    /// The event log has never received an event.
    #[error("event log is empty")]
    EmptyLog,
}

impl EngineError {
    pub(crate) fn location_not_found(id: u32) -> Self {
        EngineError::NotFound {
            kind: "location",
            id: id.to_string(),
        }
    }

    pub(crate) fn item_not_found(name: &str) -> Self {
        EngineError::NotFound {
            kind: "item",
            id: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_offending_id() {
        let err = EngineError::location_not_found(42);
        assert_eq!(err.to_string(), "no location with id '42' exists in this world");
    }

    #[test]
    fn engine_errors_survive_anyhow_round_trip() {
        let wrapped: anyhow::Error = EngineError::Underflow.into();
        assert_eq!(wrapped.downcast_ref::<EngineError>(), Some(&EngineError::Underflow));
    }
}
