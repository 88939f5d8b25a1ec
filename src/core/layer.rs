//! Layer distances and the persisted engine cursor.

use serde::{Deserialize, Serialize};

/// Minimum distance (sum of step costs) from the initial position.
///
/// Also used as the layer index the engine processes. The width is generous;
/// the usable depth is bounded by `SolverConfig::max_depth` and every
/// increment is checked against it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Distance(pub u32);

impl Distance {
    /// Distance of the initial position.
    pub const ZERO: Distance = Distance(0);

    /// Create a new distance.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Distance after a step of `cost`, or `None` if it would exceed `max`.
    #[must_use]
    pub fn checked_step(self, cost: u32, max: u32) -> Option<Distance> {
        self.0
            .checked_add(cost)
            .filter(|&d| d <= max)
            .map(Distance)
    }

    /// The previous layer, or `None` at zero.
    #[must_use]
    pub fn prev(self) -> Option<Distance> {
        self.0.checked_sub(1).map(Distance)
    }
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted position of the engine: the current layer and phase.
///
/// `exiting == false` is the forward search phase, `exiting == true` the
/// backward solve phase. Persisting the cursor at every layer boundary is what
/// lets a run stop and resume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineCursor {
    /// Layer currently being processed.
    pub distance: Distance,
    /// Whether the engine has entered the solve phase.
    pub exiting: bool,
}

impl EngineCursor {
    /// Create a new cursor.
    #[must_use]
    pub const fn new(distance: Distance, exiting: bool) -> Self {
        Self { distance, exiting }
    }

    /// Check whether moving from `self` to `next` respects the phase order.
    ///
    /// Searching may move to a deeper layer or flip to exiting at the same
    /// layer. Solving may only move to a shallower layer. Rewriting the same
    /// cursor is always allowed.
    #[must_use]
    pub fn allows(&self, next: &EngineCursor) -> bool {
        if self == next {
            return true;
        }
        match (self.exiting, next.exiting) {
            (false, false) => next.distance > self.distance,
            (false, true) => next.distance == self.distance,
            (true, true) => next.distance < self.distance,
            (true, false) => false,
        }
    }
}

impl std::fmt::Display for EngineCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let phase = if self.exiting { "solve" } else { "search" };
        write!(f, "{} @ {}", phase, self.distance)
    }
}
