//! 3x3 tic-tac-toe.
//!
//! Outcomes are absolute (`Player1` always means the first player), so no
//! move swaps perspective. Every move costs one step; the number of marks on
//! the board equals the distance and tells whose turn it is.
//!
//! Positions pack two bits per cell into three bytes.

use crate::core::{Outcome, Position, Tally};
use crate::rules::{mover_best, MoveEdge, RulesEngine, Successors};

/// Contents of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cell {
    /// No mark.
    #[default]
    Empty,
    /// First player's mark.
    X,
    /// Second player's mark.
    O,
}

impl Cell {
    const fn bits(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => 2,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            1 => Cell::X,
            2 => Cell::O,
            _ => Cell::Empty,
        }
    }
}

/// A 3x3 board, cells in row-major order.
pub type Board = [Cell; 9];

/// All eight winning triples.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Tic-tac-toe rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TicTacToe;

impl TicTacToe {
    /// Create the rules.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Encode a board.
    #[must_use]
    pub fn encode(board: &Board) -> Position {
        let mut bytes = [0u8; 3];
        for (i, cell) in board.iter().enumerate() {
            bytes[i / 4] |= cell.bits() << ((i % 4) * 2);
        }
        Position::from(bytes)
    }

    /// Decode a board produced by `encode`.
    #[must_use]
    pub fn decode(position: &Position) -> Board {
        let bytes = position.as_bytes();
        let mut board = [Cell::Empty; 9];
        for (i, cell) in board.iter_mut().enumerate() {
            let byte = bytes.get(i / 4).copied().unwrap_or(0);
            *cell = Cell::from_bits(byte >> ((i % 4) * 2));
        }
        board
    }

    fn marks(board: &Board) -> usize {
        board.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Whose turn it is, as an outcome.
    fn mover(board: &Board) -> Outcome {
        if Self::marks(board) % 2 == 0 {
            Outcome::Player1
        } else {
            Outcome::Player2
        }
    }
}

impl RulesEngine for TicTacToe {
    fn name(&self) -> &str {
        "tic-tac-toe"
    }

    fn variant(&self) -> String {
        "3x3".to_string()
    }

    fn initial_position(&self) -> Position {
        Self::encode(&[Cell::Empty; 9])
    }

    fn check_terminal(&self, position: &Position) -> Outcome {
        let board = Self::decode(position);
        let marks = Self::marks(&board);
        if marks < 5 {
            return Outcome::None;
        }

        for [a, b, c] in LINES {
            let cell = board[a];
            if cell != Cell::Empty && board[b] == cell && board[c] == cell {
                return if cell == Cell::X {
                    Outcome::Player1
                } else {
                    Outcome::Player2
                };
            }
        }

        if marks == 9 {
            Outcome::Both
        } else {
            Outcome::None
        }
    }

    fn aggregate_outcome(&self, position: &Position, tally: Tally) -> Outcome {
        mover_best(Self::mover(&Self::decode(position)), tally)
    }

    fn enumerate_successors(&self, position: &Position) -> Successors {
        let board = Self::decode(position);
        let mark = if Self::mover(&board) == Outcome::Player1 {
            Cell::X
        } else {
            Cell::O
        };

        (0..9)
            .filter(|&i| board[i] == Cell::Empty)
            .map(|i| {
                let mut next = board;
                next[i] = mark;
                MoveEdge::new(Self::encode(&next))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        let mut b = [Cell::Empty; 9];
        for (i, ch) in s.chars().filter(|c| !c.is_whitespace()).enumerate() {
            b[i] = match ch {
                'X' => Cell::X,
                'O' => Cell::O,
                _ => Cell::Empty,
            };
        }
        b
    }

    #[test]
    fn test_encoding_is_three_bytes() {
        let b = board("XO. .X. ..O");
        let p = TicTacToe::encode(&b);
        assert_eq!(p.len(), 3);
        assert_eq!(TicTacToe::decode(&p), b);
    }

    #[test]
    fn test_terminal_detection() {
        let game = TicTacToe::new();
        let enc = |s| TicTacToe::encode(&board(s));

        assert_eq!(game.check_terminal(&enc("XXX OO. ...")), Outcome::Player1);
        assert_eq!(game.check_terminal(&enc("X.X OOO X..")), Outcome::Player2);
        assert_eq!(game.check_terminal(&enc("XOX XOO OXX")), Outcome::Both);
        assert_eq!(game.check_terminal(&enc("XO. .X. ..O")), Outcome::None);
    }

    #[test]
    fn test_successors_alternate_marks() {
        let game = TicTacToe::new();
        let root = game.initial_position();

        let first = game.enumerate_successors(&root);
        assert_eq!(first.len(), 9);
        let after_x = TicTacToe::decode(&first[4].target);
        assert_eq!(after_x[4], Cell::X);

        let second = game.enumerate_successors(&first[4].target);
        assert_eq!(second.len(), 8);
        let after_o = TicTacToe::decode(&second[0].target);
        assert_eq!(after_o[0], Cell::O);
        assert!(second.iter().all(|e| e.cost == 1 && !e.swap));
    }

    #[test]
    fn test_aggregate_uses_parity() {
        let game = TicTacToe::new();
        let x_to_move = TicTacToe::encode(&board("XO. ... ..."));
        let o_to_move = TicTacToe::encode(&board("X.. ... ..."));

        assert_eq!(game.aggregate_outcome(&x_to_move, Tally::new(1, 3, 0)), Outcome::Player1);
        assert_eq!(game.aggregate_outcome(&o_to_move, Tally::new(1, 3, 0)), Outcome::Player2);
        assert_eq!(game.aggregate_outcome(&o_to_move, Tally::new(4, 0, 1)), Outcome::Both);
        assert_eq!(game.aggregate_outcome(&o_to_move, Tally::new(4, 0, 0)), Outcome::Player1);
    }
}
