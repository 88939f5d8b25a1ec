//! Core solver types: positions, outcomes, layers, records.
//!
//! These are game-agnostic. Games only produce `Position` bytes and
//! `Outcome` values; everything else is owned by the solver and storage.

pub mod layer;
pub mod outcome;
pub mod position;
pub mod record;

pub use layer::{Distance, EngineCursor};
pub use outcome::{Outcome, Tally};
pub use position::Position;
pub use record::{Diagnostics, SearchState, StateRecord};
