//! Solver statistics for diagnostics and progress reporting.

use serde::{Deserialize, Serialize};

use crate::core::Diagnostics;

/// Statistics collected during a run.
///
/// Counts only what this process did; a resumed run starts from zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Non-terminal states expanded in the search phase.
    pub states_searched: u64,

    /// States found terminal in the search phase.
    pub terminal_states: u64,

    /// States solved in the solve phase.
    pub states_solved: u64,

    /// Successor registrations (including repeats of known states).
    pub edges_registered: u64,

    /// Non-empty layers processed in the search phase.
    pub layers_searched: u32,

    /// Non-empty layers processed in the solve phase.
    pub layers_solved: u32,

    /// Deepest layer the search phase reached.
    pub deepest_layer: u32,

    /// States flagged NON_LINEAR.
    pub non_linear: u64,

    /// States flagged NO_PLAYER_CHILDREN.
    pub no_player_children: u64,

    /// States flagged NO_ENDSTATE.
    pub no_endstate: u64,

    /// Time spent in `run` (microseconds).
    pub time_us: u64,
}

impl SolveStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// States handled in either phase.
    #[must_use]
    pub fn states_processed(&self) -> u64 {
        self.states_searched + self.terminal_states + self.states_solved
    }

    /// Total diagnostics raised.
    #[must_use]
    pub fn diagnostics(&self) -> u64 {
        self.non_linear + self.no_player_children + self.no_endstate
    }

    /// Count the flags of one diagnosed state.
    pub fn record_diagnostics(&mut self, flags: Diagnostics) {
        if flags.contains(Diagnostics::NON_LINEAR) {
            self.non_linear += 1;
        }
        if flags.contains(Diagnostics::NO_PLAYER_CHILDREN) {
            self.no_player_children += 1;
        }
        if flags.contains(Diagnostics::NO_ENDSTATE) {
            self.no_endstate += 1;
        }
    }

    /// Calculate states processed per second.
    #[must_use]
    pub fn states_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.states_processed() as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}
