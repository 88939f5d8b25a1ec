//! Error taxonomy for the solver and storage backends.

use thiserror::Error;

use crate::core::{Diagnostics, Distance, EngineCursor, Outcome, Position, SearchState};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SolveError>;

/// A broken record invariant: a plug-in bug or a state graph the layered
/// algorithm cannot handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConsistencyViolation {
    /// Position reachable at two different minimum distances.
    #[error("reachable at both distance {stored} and {offered}")]
    DistanceMismatch {
        /// Distance already recorded.
        stored: Distance,
        /// Distance offered by the new registration.
        offered: Distance,
    },

    /// Lifecycle transition not permitted.
    #[error("cannot move from {from} to {to}")]
    InvalidTransition {
        /// Current lifecycle.
        from: SearchState,
        /// Requested lifecycle.
        to: SearchState,
    },

    /// Terminal repeated with a different winner.
    #[error("already ended with winner {stored}, not {offered}")]
    WinnerMismatch {
        /// Winner already recorded.
        stored: Outcome,
        /// Winner offered by the repeat.
        offered: Outcome,
    },

    /// Direct terminal without a decided outcome.
    #[error("cannot end without a decided outcome")]
    UndecidedEnd,
}

/// Coarse classification of a `SolveError`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Escalated solve-time diagnostics.
    Structural,
    /// Broken distance or lifecycle invariant.
    Consistency,
    /// Lookup of an unregistered state.
    NotFound,
    /// Plug-in contract or configured bound violated.
    Contract,
    /// Snapshot encoding or I/O failure.
    Io,
}

/// Errors produced by the solver and storage backends.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Solve-time diagnostics escalated by the storage policy.
    #[error("structural violation at {position}: {flags:?}")]
    Structural {
        /// Offending state.
        position: Position,
        /// Diagnostics raised while solving it.
        flags: Diagnostics,
    },

    /// Distance or lifecycle invariant broken.
    #[error("state {position} {violation}")]
    Consistency {
        /// Offending state.
        position: Position,
        /// What was violated.
        violation: ConsistencyViolation,
    },

    /// State was never registered.
    #[error("state {0} doesn't exist")]
    NotFound(Position),

    /// A successor would lie beyond the configured maximum depth.
    #[error("state {position} would be at distance {requested}, beyond the maximum depth {max}")]
    DepthExceeded {
        /// Successor being registered.
        position: Position,
        /// Distance it would have had (saturated).
        requested: u64,
        /// Configured bound.
        max: u32,
    },

    /// Move edge with a step cost of zero.
    #[error("move from {from} to {to} has step cost 0")]
    ZeroCostEdge {
        /// Parent state.
        from: Position,
        /// Successor state.
        to: Position,
    },

    /// Cursor update that contradicts the phase order.
    #[error("cursor cannot move from {from} to {to}")]
    InvalidCursor {
        /// Cursor currently stored.
        from: EngineCursor,
        /// Rejected cursor.
        to: EngineCursor,
    },

    /// The solve phase finished without resolving the initial position.
    #[error("initial state {position} is still {state} after the solve phase")]
    RootUnsolved {
        /// Initial position of the rules being solved.
        position: Position,
        /// Its lifecycle when the run ended.
        state: SearchState,
    },

    /// Snapshot written for a different game or variant.
    #[error("snapshot was written for {snapshot}, not {rules}")]
    GameMismatch {
        /// Game label stored in the snapshot.
        snapshot: String,
        /// Game label of the rules resuming it.
        rules: String,
    },

    /// Snapshot (de)serialization failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    /// Reading or writing a snapshot file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SolveError {
    /// Shorthand for a consistency violation.
    pub(crate) fn consistency(position: &Position, violation: ConsistencyViolation) -> Self {
        SolveError::Consistency {
            position: position.clone(),
            violation,
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            SolveError::Structural { .. } => ErrorCategory::Structural,
            SolveError::Consistency { .. } | SolveError::RootUnsolved { .. } => {
                ErrorCategory::Consistency
            }
            SolveError::NotFound(_) => ErrorCategory::NotFound,
            SolveError::DepthExceeded { .. }
            | SolveError::ZeroCostEdge { .. }
            | SolveError::InvalidCursor { .. }
            | SolveError::GameMismatch { .. } => ErrorCategory::Contract,
            SolveError::Snapshot(_) | SolveError::Io(_) => ErrorCategory::Io,
        }
    }
}
