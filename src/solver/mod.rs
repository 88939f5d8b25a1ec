//! Layered retrograde solver.
//!
//! ## Overview
//!
//! Solving runs in two phases over the layers of the state space, where a
//! layer is the set of states at the same minimum distance from the start:
//!
//! - **Search**: layers `0, 1, 2, ...` are expanded in order. Terminal states
//!   end immediately; the rest register their successors one step-cost deeper.
//! - **Solve**: layers are revisited deepest first. Every searched state
//!   tallies its (already final) successors and asks the rules engine for the
//!   winner.
//!
//! The cursor `(distance, exiting)` lives in storage and is advanced only at
//! layer boundaries, so a stopped run resumes by calling `run` again.
//!
//! ## Usage
//!
//! ```rust
//! use retrograde::games::Nim;
//! use retrograde::solver::{RunStatus, Solver, SolverConfig, StopSignal};
//! use retrograde::storage::{MemoryStore, Storage};
//! use retrograde::Outcome;
//!
//! let mut solver = Solver::new(Nim::new(21, 3), SolverConfig::default());
//! let mut store = MemoryStore::new();
//! let root = solver.prepare(&mut store).unwrap();
//!
//! let status = solver.run(&mut store, &StopSignal::new()).unwrap();
//! assert_eq!(status, RunStatus::Completed);
//!
//! let (_, winner) = store.distance_and_outcome(&root).unwrap();
//! assert_eq!(winner, Outcome::Player1);
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod stats;
pub mod stop;

pub use audit::{audit, AuditReport};
pub use config::SolverConfig;
pub use engine::{RunStatus, Solver};
pub use stats::SolveStats;
pub use stop::StopSignal;
