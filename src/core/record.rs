//! Per-state records kept by a storage backend.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::layer::Distance;
use super::outcome::{Outcome, Tally};
use super::position::Position;

/// Lifecycle of a state record.
///
/// `Unsearched -> Searched -> End` or `Unsearched -> End`. `End` is final.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchState {
    /// Registered, not yet expanded.
    #[default]
    Unsearched,
    /// Expanded, children registered, waiting to be solved.
    Searched,
    /// Direct terminal or solved.
    End,
}

impl SearchState {
    /// Check whether a record may move from `self` to `next`.
    #[must_use]
    pub const fn can_advance_to(self, next: SearchState) -> bool {
        matches!(
            (self, next),
            (SearchState::Unsearched, SearchState::Searched)
                | (SearchState::Unsearched, SearchState::End)
                | (SearchState::Searched, SearchState::End)
        )
    }
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchState::Unsearched => write!(f, "unsearched"),
            SearchState::Searched => write!(f, "searched"),
            SearchState::End => write!(f, "end"),
        }
    }
}

bitflags! {
    /// Structural anomalies observed while solving a state.
    ///
    /// Informational unless the storage backend escalates them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Diagnostics: u8 {
        /// A successor was not strictly deeper than the state.
        const NON_LINEAR = 1 << 0;
        /// A successor had no outcome at solve time.
        const NO_PLAYER_CHILDREN = 1 << 1;
        /// No successor contributed an outcome; a draw was forced.
        const NO_ENDSTATE = 1 << 2;
    }
}

/// Everything the solver knows about one position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    /// Position identity.
    pub position: Position,

    /// Minimum distance from the initial position. Never changes once set.
    pub distance: Distance,

    /// Outcomes of the children (or a single unit for a direct terminal).
    pub tally: Tally,

    /// Resolved winner. `Outcome::None` until the record reaches `End`.
    pub winner: Outcome,

    /// Lifecycle tag.
    pub state: SearchState,

    /// Accumulated diagnostics.
    pub diagnostics: Diagnostics,
}

impl StateRecord {
    /// Fresh, unsearched record at the given distance.
    #[must_use]
    pub fn new(position: Position, distance: Distance) -> Self {
        Self {
            position,
            distance,
            tally: Tally::default(),
            winner: Outcome::None,
            state: SearchState::Unsearched,
            diagnostics: Diagnostics::empty(),
        }
    }

    /// Check if the record has reached `End`.
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.state == SearchState::End
    }
}
