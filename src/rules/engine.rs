//! Rules engine trait for game implementations.
//!
//! Games implement `RulesEngine` to define their rules:
//! - The initial position
//! - Terminal detection
//! - Move enumeration, with step costs and perspective swaps
//! - The backward-induction rule that turns child outcomes into a winner

use smallvec::SmallVec;

use crate::core::{Outcome, Position, Tally};

/// A move from one position to a successor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveEdge {
    /// Successor position.
    pub target: Position,

    /// Step cost, at least 1. The successor's distance is the parent's plus this.
    pub cost: u32,

    /// Exchange player 1 and player 2 in the successor's outcome before
    /// tallying it for the parent.
    ///
    /// Lets a game record outcomes relative to the player about to move
    /// rather than to a fixed global player.
    pub swap: bool,
}

impl MoveEdge {
    /// Unit-cost edge without perspective swap.
    #[must_use]
    pub fn new(target: Position) -> Self {
        Self {
            target,
            cost: 1,
            swap: false,
        }
    }

    /// Set the step cost.
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Set the perspective swap flag.
    #[must_use]
    pub fn with_swap(mut self, swap: bool) -> Self {
        self.swap = swap;
        self
    }
}

/// Ordered successors of a position.
///
/// SmallVec optimizes for branching factors up to 8 without heap allocation.
pub type Successors = SmallVec<[MoveEdge; 8]>;

/// Rules engine trait.
///
/// The solver is generic over this trait and never branches on game identity.
///
/// ## Implementation Notes
///
/// - Every method must be pure: the same position always yields the same result.
/// - `enumerate_successors` must be referentially stable. The solver calls it
///   once while searching and again while solving, and relies on both calls
///   returning the same edges.
/// - `check_terminal` returns `Outcome::None` if the game continues.
pub trait RulesEngine {
    /// Name of the game (display only).
    fn name(&self) -> &str;

    /// Variant label, e.g. board size (display only).
    fn variant(&self) -> String;

    /// Root of the state space, registered at distance zero.
    fn initial_position(&self) -> Position;

    /// Decided outcome if the position is terminal, `Outcome::None` otherwise.
    fn check_terminal(&self, position: &Position) -> Outcome;

    /// Winner of a non-terminal position given its children's tallied outcomes.
    ///
    /// May consult the position itself, e.g. to find out whose turn it is.
    fn aggregate_outcome(&self, position: &Position, tally: Tally) -> Outcome;

    /// Successor edges of a non-terminal position.
    fn enumerate_successors(&self, position: &Position) -> Successors;
}

/// The usual backward-induction rule for a position where `mover` is to play.
///
/// The mover wins if any child is a win for them, otherwise it is a draw if
/// any child draws, otherwise the opponent wins.
#[must_use]
pub fn mover_best(mover: Outcome, tally: Tally) -> Outcome {
    if tally.count(mover) > 0 {
        mover
    } else if tally.draw > 0 {
        Outcome::Both
    } else {
        mover.opponent()
    }
}
