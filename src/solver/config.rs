//! Solver configuration parameters.

use serde::{Deserialize, Serialize};

/// Solver configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Deepest distance a state may be registered at.
    /// Registering beyond it fails with `SolveError::DepthExceeded`.
    pub max_depth: u32,

    /// Log progress every this many processed states (0 = never).
    pub progress_interval: u64,

    /// Fire the stop signal once a run has processed this many states
    /// (0 = no limit). The run then returns `RunStatus::Stopped` and can be
    /// resumed like any other stopped run.
    pub state_budget: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: 4096,
            progress_interval: 0,
            state_budget: 0,
        }
    }
}

impl SolverConfig {
    /// Create a new config with a custom maximum depth.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Create a new config with a custom progress interval.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Create a new config with a per-run state budget.
    pub fn with_state_budget(mut self, budget: u64) -> Self {
        self.state_budget = budget;
        self
    }
}
