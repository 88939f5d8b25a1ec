//! Single-heap subtraction game.
//!
//! Players alternately take between 1 and `max_take` objects from one heap;
//! whoever takes the last object wins.
//!
//! Outcomes are recorded relative to the player about to move: `Player1`
//! means "the mover wins". Every move therefore swaps perspective. Taking `n`
//! objects costs `n` steps, so a heap of size `v` always sits at distance
//! `start - v` no matter how it was reached.

use crate::core::{Outcome, Position, Tally};
use crate::rules::{mover_best, MoveEdge, RulesEngine, Successors};

/// Subtraction game rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nim {
    start: u8,
    max_take: u8,
}

impl Nim {
    /// Create a game starting from `start` objects, taking 1..=`max_take` per move.
    pub fn new(start: u8, max_take: u8) -> Self {
        assert!(max_take > 0, "Must be able to take at least 1 object");
        Self { start, max_take }
    }

    /// Starting heap size.
    #[must_use]
    pub fn start(&self) -> u8 {
        self.start
    }

    /// Largest number of objects a move may take.
    #[must_use]
    pub fn max_take(&self) -> u8 {
        self.max_take
    }

    /// Position for a heap of `value` objects.
    #[must_use]
    pub fn position(value: u8) -> Position {
        Position::new(&[value])
    }

    fn heap(position: &Position) -> u8 {
        position.as_bytes().first().copied().unwrap_or(0)
    }
}

impl RulesEngine for Nim {
    fn name(&self) -> &str {
        "nim"
    }

    fn variant(&self) -> String {
        format!("{} take 1-{}", self.start, self.max_take)
    }

    fn initial_position(&self) -> Position {
        Self::position(self.start)
    }

    fn check_terminal(&self, position: &Position) -> Outcome {
        if Self::heap(position) > 0 {
            return Outcome::None;
        }
        // The mover faces an empty heap: the previous player took the last object.
        Outcome::Player2
    }

    fn aggregate_outcome(&self, _position: &Position, tally: Tally) -> Outcome {
        mover_best(Outcome::Player1, tally)
    }

    fn enumerate_successors(&self, position: &Position) -> Successors {
        let value = Self::heap(position);
        (1..=self.max_take.min(value))
            .map(|take| {
                MoveEdge::new(Self::position(value - take))
                    .with_cost(u32::from(take))
                    .with_swap(true)
            })
            .collect()
    }
}
