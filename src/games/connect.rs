//! Connect-N on small boards.
//!
//! Pieces drop to the lowest empty row of a column; the first player with
//! `connect` pieces in a row (vertically, horizontally or diagonally) wins.
//! Outcomes are absolute and every move costs one step.
//!
//! Positions pack two bits per cell, column by column, followed by one byte
//! holding the winner. Each position is reduced to the smaller encoding of
//! the board and its mirror image, which roughly halves the state space.

use crate::core::{Outcome, Position, Tally};
use crate::rules::{mover_best, MoveEdge, RulesEngine, Successors};

const EMPTY: u8 = 0;
const FIRST: u8 = 1;
const SECOND: u8 = 2;

/// Connect-N rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectN {
    width: usize,
    height: usize,
    connect: usize,
}

/// Decoded board: `cells[col * height + row]`, row 0 at the bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Grid {
    cells: Vec<u8>,
    winner: Outcome,
}

impl ConnectN {
    /// Create rules for a `width` x `height` board needing `connect` in a row.
    pub fn new(width: usize, height: usize, connect: usize) -> Self {
        assert!((1..=8).contains(&width), "Width must be 1-8");
        assert!((1..=8).contains(&height), "Height must be 1-8");
        assert!(connect >= 2, "Must connect at least 2");
        Self {
            width,
            height,
            connect,
        }
    }

    /// Board width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Board height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pieces in a row needed to win.
    #[must_use]
    pub fn connect(&self) -> usize {
        self.connect
    }

    fn cell_count(&self) -> usize {
        self.width * self.height
    }

    fn encode(&self, grid: &Grid) -> Vec<u8> {
        let mut bytes = vec![0u8; self.cell_count().div_ceil(4) + 1];
        for (i, &cell) in grid.cells.iter().enumerate() {
            bytes[i / 4] |= cell << ((i % 4) * 2);
        }
        let last = bytes.len() - 1;
        bytes[last] = match grid.winner {
            Outcome::Player1 => FIRST,
            Outcome::Player2 => SECOND,
            _ => EMPTY,
        };
        bytes
    }

    fn decode(&self, position: &Position) -> Grid {
        let bytes = position.as_bytes();
        let cells = (0..self.cell_count())
            .map(|i| {
                let byte = bytes.get(i / 4).copied().unwrap_or(0);
                (byte >> ((i % 4) * 2)) & 3
            })
            .collect();
        let winner = match bytes.last().copied() {
            Some(FIRST) => Outcome::Player1,
            Some(SECOND) => Outcome::Player2,
            _ => Outcome::None,
        };
        Grid { cells, winner }
    }

    fn mirrored(&self, grid: &Grid) -> Grid {
        let mut cells = vec![EMPTY; self.cell_count()];
        for col in 0..self.width {
            let src = col * self.height;
            let dst = (self.width - 1 - col) * self.height;
            cells[dst..dst + self.height].copy_from_slice(&grid.cells[src..src + self.height]);
        }
        Grid {
            cells,
            winner: grid.winner,
        }
    }

    /// Smaller encoding of the grid and its mirror image.
    fn canonical(&self, grid: &Grid) -> Position {
        let plain = self.encode(grid);
        let mirror = self.encode(&self.mirrored(grid));
        Position::from(plain.min(mirror))
    }

    fn pieces(grid: &Grid) -> usize {
        grid.cells.iter().filter(|&&c| c != EMPTY).count()
    }

    fn mover(grid: &Grid) -> Outcome {
        if Self::pieces(grid) % 2 == 0 {
            Outcome::Player1
        } else {
            Outcome::Player2
        }
    }

    fn get(&self, grid: &Grid, col: i64, row: i64) -> Option<u8> {
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(grid.cells[col as usize * self.height + row as usize])
    }

    /// Check whether the piece at (`col`, `row`) completes a line.
    fn completes_line(&self, grid: &Grid, col: usize, row: usize) -> bool {
        let piece = grid.cells[col * self.height + row];
        let (col, row) = (col as i64, row as i64);

        [(1, 0), (0, 1), (1, 1), (1, -1)].iter().any(|&(dc, dr)| {
            let run = |sign: i64| {
                (1..)
                    .take_while(|&k| self.get(grid, col + sign * k * dc, row + sign * k * dr) == Some(piece))
                    .count()
            };
            1 + run(1) + run(-1) >= self.connect
        })
    }
}

impl RulesEngine for ConnectN {
    fn name(&self) -> &str {
        "connect-n"
    }

    fn variant(&self) -> String {
        format!("{}x{} connect {}", self.width, self.height, self.connect)
    }

    fn initial_position(&self) -> Position {
        self.canonical(&Grid {
            cells: vec![EMPTY; self.cell_count()],
            winner: Outcome::None,
        })
    }

    fn check_terminal(&self, position: &Position) -> Outcome {
        let grid = self.decode(position);
        if grid.winner.is_decisive() {
            return grid.winner;
        }
        if Self::pieces(&grid) == self.cell_count() {
            return Outcome::Both;
        }
        Outcome::None
    }

    fn aggregate_outcome(&self, position: &Position, tally: Tally) -> Outcome {
        mover_best(Self::mover(&self.decode(position)), tally)
    }

    fn enumerate_successors(&self, position: &Position) -> Successors {
        let grid = self.decode(position);
        let mover = Self::mover(&grid);
        let piece = if mover == Outcome::Player1 { FIRST } else { SECOND };

        let mut successors = Successors::new();
        for col in 0..self.width {
            let column = &grid.cells[col * self.height..(col + 1) * self.height];
            let Some(row) = column.iter().position(|&c| c == EMPTY) else {
                continue;
            };

            let mut next = grid.clone();
            next.cells[col * self.height + row] = piece;
            if self.completes_line(&next, col, row) {
                next.winner = mover;
            }
            successors.push(MoveEdge::new(self.canonical(&next)));
        }
        successors
    }
}
