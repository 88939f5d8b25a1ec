//! Storage and index contract used by the solver.
//!
//! ## Overview
//!
//! A backend keeps one `StateRecord` per position plus the `EngineCursor`,
//! and answers the compound query "all states at distance `d` with lifecycle
//! `s`". The solver only talks to storage through the `Storage` trait, so a
//! durable backend can replace the in-memory reference without touching the
//! algorithm.
//!
//! ## Policies
//!
//! Consistency violations and unknown states are always returned as errors.
//! What happens to solve-time diagnostics is up to the backend; the
//! reference backend makes it a `ViolationPolicy`.

pub mod memory;
pub mod snapshot;

use serde::{Deserialize, Serialize};

use crate::core::{Diagnostics, Distance, EngineCursor, Outcome, Position, SearchState, StateRecord, Tally};
use crate::error::Result;

pub use memory::{MemoryStore, MemoryStoreConfig};

/// What a backend does with diagnostics attached by the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationPolicy {
    /// Record the diagnostic, then stop the run with `SolveError::Structural`.
    ///
    /// The offending record has already been solved when the error is
    /// returned, so calling `Solver::run` again on the same store carries on
    /// past it and can complete. The flags stay on the record: check
    /// `MemoryStore::diagnosed` or `AuditReport::diagnosed` before trusting a
    /// resumed run.
    #[default]
    Abort,
    /// Record the diagnostic, log it, and keep going.
    Collect,
}

/// Record and cursor store driven by the solver.
///
/// Mutations must be atomic per record: no reader may observe a half-applied
/// update. All work for a `(distance, phase)` is committed before the solver
/// moves the cursor.
pub trait Storage {
    /// Register `state` at `distance`, or verify the stored distance matches.
    ///
    /// A different stored distance is a `ConsistencyViolation`; the stored
    /// value is kept.
    fn register_or_verify_distance(&mut self, state: &Position, distance: Distance) -> Result<()>;

    /// `Unsearched -> Searched`.
    fn mark_searched(&mut self, state: &Position) -> Result<()>;

    /// `Unsearched -> End` with a single-unit tally for `winner`.
    ///
    /// Repeating the call with the same winner is a no-op.
    fn mark_end(&mut self, state: &Position, winner: Outcome) -> Result<()>;

    /// `Searched -> End` with the given tally and winner.
    fn mark_solved(&mut self, state: &Position, tally: Tally, winner: Outcome) -> Result<()>;

    /// Stored distance and winner of `state`.
    fn distance_and_outcome(&self, state: &Position) -> Result<(Distance, Outcome)>;

    /// Attach solve-time diagnostics to `state`.
    fn attach_diagnostic(&mut self, state: &Position, flags: Diagnostics) -> Result<()>;

    /// Current engine cursor.
    fn cursor(&self) -> EngineCursor;

    /// Persist a new engine cursor.
    fn set_cursor(&mut self, cursor: EngineCursor) -> Result<()>;

    /// All states registered at `distance` whose lifecycle is `state`.
    ///
    /// Must reflect every committed record. Order is unspecified.
    fn states_at(&self, distance: Distance, state: SearchState) -> Result<Vec<Position>>;

    /// Full record of `state`.
    fn record(&self, state: &Position) -> Result<StateRecord>;

    /// Largest distance any state has been registered at.
    fn deepest_distance(&self) -> Option<Distance>;
}
