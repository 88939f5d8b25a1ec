//! Game outcomes and child-outcome tallies.

use serde::{Deserialize, Serialize};

/// Game-theoretic outcome of a position.
///
/// `Both` is a decided draw and is distinct from `None`, which means the
/// position has not been resolved (or, from a terminal check, that the game
/// continues).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Undecided.
    #[default]
    None,
    /// Player 1 wins.
    Player1,
    /// Player 2 wins.
    Player2,
    /// Draw.
    Both,
}

impl Outcome {
    /// Check if this outcome is decided (a win for either player or a draw).
    #[inline]
    #[must_use]
    pub const fn is_decisive(self) -> bool {
        !matches!(self, Outcome::None)
    }

    /// Exchange Player1 and Player2. Draws and `None` are unchanged.
    #[must_use]
    pub const fn swapped(self) -> Self {
        match self {
            Outcome::Player1 => Outcome::Player2,
            Outcome::Player2 => Outcome::Player1,
            other => other,
        }
    }

    /// Apply `swapped` only when `swap` is set.
    #[inline]
    #[must_use]
    pub const fn swapped_if(self, swap: bool) -> Self {
        if swap {
            self.swapped()
        } else {
            self
        }
    }

    /// The opposing player. Only meaningful for `Player1` / `Player2`.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        self.swapped()
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::None => write!(f, "undecided"),
            Outcome::Player1 => write!(f, "player 1"),
            Outcome::Player2 => write!(f, "player 2"),
            Outcome::Both => write!(f, "draw"),
        }
    }
}

/// Count of children resolving to each decided outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tally {
    /// Children won by player 1.
    pub p1: u32,
    /// Children won by player 2.
    pub p2: u32,
    /// Drawn children.
    pub draw: u32,
}

impl Tally {
    /// Create a tally from raw counts.
    #[must_use]
    pub const fn new(p1: u32, p2: u32, draw: u32) -> Self {
        Self { p1, p2, draw }
    }

    /// Single-unit tally for a direct terminal outcome.
    ///
    /// Returns an empty tally for `Outcome::None`.
    #[must_use]
    pub fn single(outcome: Outcome) -> Self {
        let mut tally = Self::default();
        tally.record(outcome);
        tally
    }

    /// Count one child outcome.
    ///
    /// Returns `false` (and counts nothing) for `Outcome::None`.
    pub fn record(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Player1 => self.p1 += 1,
            Outcome::Player2 => self.p2 += 1,
            Outcome::Both => self.draw += 1,
            Outcome::None => return false,
        }
        true
    }

    /// Count for one outcome.
    #[must_use]
    pub const fn count(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Player1 => self.p1,
            Outcome::Player2 => self.p2,
            Outcome::Both => self.draw,
            Outcome::None => 0,
        }
    }

    /// Total decided children.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.p1 + self.p2 + self.draw
    }

    /// Check if nothing has been counted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_swap() {
        assert_eq!(Outcome::Player1.swapped(), Outcome::Player2);
        assert_eq!(Outcome::Player2.swapped(), Outcome::Player1);
        assert_eq!(Outcome::Both.swapped(), Outcome::Both);
        assert_eq!(Outcome::None.swapped(), Outcome::None);

        assert_eq!(Outcome::Player1.swapped_if(false), Outcome::Player1);
        assert_eq!(Outcome::Player1.swapped_if(true), Outcome::Player2);
    }

    #[test]
    fn test_outcome_decisive() {
        assert!(!Outcome::None.is_decisive());
        assert!(Outcome::Player1.is_decisive());
        assert!(Outcome::Player2.is_decisive());
        assert!(Outcome::Both.is_decisive());
    }

    #[test]
    fn test_tally_record() {
        let mut tally = Tally::default();
        assert!(tally.is_empty());

        assert!(tally.record(Outcome::Player1));
        assert!(tally.record(Outcome::Player1));
        assert!(tally.record(Outcome::Both));
        assert!(!tally.record(Outcome::None));

        assert_eq!(tally, Tally::new(2, 0, 1));
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.count(Outcome::Player1), 2);
        assert_eq!(tally.count(Outcome::None), 0);
    }

    #[test]
    fn test_tally_single() {
        assert_eq!(Tally::single(Outcome::Player2), Tally::new(0, 1, 0));
        assert_eq!(Tally::single(Outcome::Both), Tally::new(0, 0, 1));
        assert!(Tally::single(Outcome::None).is_empty());
    }
}
