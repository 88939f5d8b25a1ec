//! Rules engine trait for game implementations.
//!
//! Games implement `RulesEngine` to define:
//! - Terminal positions and their outcomes
//! - Successor positions, step costs and perspective swaps
//! - How child outcomes combine into a winner
//!
//! The solver calls into `RulesEngine` but never interprets
//! game-specific concepts directly.

pub mod engine;

pub use engine::{mover_best, MoveEdge, RulesEngine, Successors};
