//! # retrograde
//!
//! Exhaustive solver for finite two-player games using layered forward
//! search followed by retrograde (backward-induction) analysis.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: Positions are opaque bytes. Games supply terminal
//!    detection, move enumeration and an aggregation rule via `RulesEngine`.
//!
//! 2. **Storage Behind a Trait**: The solver only touches state through
//!    `Storage`, so the in-memory reference backend can be swapped for a
//!    durable one.
//!
//! 3. **Checked Invariants**: Distances are set once, lifecycles only move
//!    forward, and every violation surfaces as a `SolveError` or a
//!    diagnostic on the offending record.
//!
//! ## Architecture
//!
//! - **Layers**: A state's distance is the sum of step costs from the start.
//!   The search phase expands layers shallow to deep; the solve phase
//!   resolves them deep to shallow, so every successor is final before its
//!   parent is solved.
//!
//! - **Resumable**: The engine cursor is persisted at every layer boundary.
//!
//! ## Modules
//!
//! - `core`: Positions, outcomes, distances, records
//! - `rules`: RulesEngine trait for game implementations
//! - `storage`: Storage contract and the in-memory reference backend
//! - `solver`: The two-phase engine, audit and statistics
//! - `games`: Reference games

pub mod core;
pub mod error;
pub mod games;
pub mod rules;
pub mod solver;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{
    Diagnostics, Distance, EngineCursor, Outcome, Position, SearchState, StateRecord, Tally,
};

pub use crate::error::{ConsistencyViolation, ErrorCategory, Result, SolveError};

pub use crate::rules::{mover_best, MoveEdge, RulesEngine, Successors};

pub use crate::storage::{MemoryStore, MemoryStoreConfig, Storage, ViolationPolicy};

pub use crate::solver::{audit, AuditReport, RunStatus, SolveStats, Solver, SolverConfig, StopSignal};
