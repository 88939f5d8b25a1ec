//! Reference games.
//!
//! - `Nim`: single-heap subtraction game, outcomes relative to the mover
//! - `TicTacToe`: 3x3 noughts and crosses, absolute outcomes
//! - `ConnectN`: gravity connect-N on small boards with mirror reduction
//! - `GraphGame`: explicit graphs for targeted solver tests

mod connect;
mod graph;
mod nim;
mod tictactoe;

pub use connect::ConnectN;
pub use graph::{GraphGame, GraphGameBuilder};
pub use nim::Nim;
pub use tictactoe::{Board, Cell, TicTacToe, LINES};
