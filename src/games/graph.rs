//! Explicit, hand-built game graphs.
//!
//! Useful for exercising the solver on specific shapes (diamonds, uneven
//! step costs, perspective swaps) without writing a full game. Nodes are
//! named; each gets a two-byte position in order of first mention.

use rustc_hash::FxHashMap;

use crate::core::{Outcome, Position, Tally};
use crate::rules::{mover_best, MoveEdge, RulesEngine, Successors};

#[derive(Clone, Debug)]
struct Node {
    name: String,
    edges: Vec<(usize, u32, bool)>,
    terminal: Outcome,
    mover: Outcome,
}

/// Rules engine over an explicit graph.
///
/// Non-terminal nodes are aggregated with `mover_best` for their mover
/// (player 1 unless set otherwise).
#[derive(Clone, Debug)]
pub struct GraphGame {
    nodes: Vec<Node>,
    index: FxHashMap<String, usize>,
}

/// Builder for creating a GraphGame.
#[derive(Clone, Debug)]
pub struct GraphGameBuilder {
    game: GraphGame,
}

impl GraphGame {
    /// Start building a graph whose initial position is `root`.
    pub fn builder(root: &str) -> GraphGameBuilder {
        let mut builder = GraphGameBuilder {
            game: GraphGame {
                nodes: Vec::new(),
                index: FxHashMap::default(),
            },
        };
        builder.node(root);
        builder
    }

    /// Position of a named node.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<Position> {
        self.index.get(name).map(|&i| Self::encode(i))
    }

    /// Name of the node at `position`.
    #[must_use]
    pub fn name_of(&self, position: &Position) -> Option<&str> {
        self.lookup(position).map(|n| n.name.as_str())
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn encode(index: usize) -> Position {
        Position::from((index as u16).to_be_bytes())
    }

    fn lookup(&self, position: &Position) -> Option<&Node> {
        match position.as_bytes() {
            [hi, lo] => self.nodes.get(usize::from(u16::from_be_bytes([*hi, *lo]))),
            _ => None,
        }
    }
}

impl GraphGameBuilder {
    fn node(&mut self, name: &str) -> usize {
        if let Some(&i) = self.game.index.get(name) {
            return i;
        }
        assert!(self.game.nodes.len() < usize::from(u16::MAX), "Too many nodes");

        let i = self.game.nodes.len();
        self.game.nodes.push(Node {
            name: name.to_string(),
            edges: Vec::new(),
            terminal: Outcome::None,
            mover: Outcome::Player1,
        });
        self.game.index.insert(name.to_string(), i);
        i
    }

    fn add_edge(mut self, from: &str, to: &str, cost: u32, swap: bool) -> Self {
        let from = self.node(from);
        let to = self.node(to);
        self.game.nodes[from].edges.push((to, cost, swap));
        self
    }

    /// Add an edge with the given step cost.
    pub fn edge(self, from: &str, to: &str, cost: u32) -> Self {
        self.add_edge(from, to, cost, false)
    }

    /// Add an edge that swaps perspective.
    pub fn swap_edge(self, from: &str, to: &str, cost: u32) -> Self {
        self.add_edge(from, to, cost, true)
    }

    /// Make a node terminal with the given outcome.
    pub fn terminal(mut self, name: &str, outcome: Outcome) -> Self {
        let i = self.node(name);
        self.game.nodes[i].terminal = outcome;
        self
    }

    /// Set which player moves at a node.
    pub fn mover(mut self, name: &str, mover: Outcome) -> Self {
        let i = self.node(name);
        self.game.nodes[i].mover = mover;
        self
    }

    /// Build the game.
    pub fn build(self) -> GraphGame {
        self.game
    }
}

impl RulesEngine for GraphGame {
    fn name(&self) -> &str {
        "graph"
    }

    fn variant(&self) -> String {
        format!("{} nodes", self.nodes.len())
    }

    fn initial_position(&self) -> Position {
        Self::encode(0)
    }

    fn check_terminal(&self, position: &Position) -> Outcome {
        self.lookup(position).map_or(Outcome::None, |n| n.terminal)
    }

    fn aggregate_outcome(&self, position: &Position, tally: Tally) -> Outcome {
        let mover = self.lookup(position).map_or(Outcome::Player1, |n| n.mover);
        mover_best(mover, tally)
    }

    fn enumerate_successors(&self, position: &Position) -> Successors {
        let Some(node) = self.lookup(position) else {
            return Successors::new();
        };
        node.edges
            .iter()
            .map(|&(to, cost, swap)| {
                MoveEdge::new(Self::encode(to))
                    .with_cost(cost)
                    .with_swap(swap)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_assigns_positions_in_order() {
        let game = GraphGame::builder("root")
            .edge("root", "a", 1)
            .edge("a", "b", 2)
            .build();

        assert_eq!(game.len(), 3);
        assert_eq!(game.initial_position(), game.position("root").unwrap());
        assert_eq!(game.position("b").unwrap(), Position::new(&[0, 2]));
        assert_eq!(game.name_of(&Position::new(&[0, 1])), Some("a"));
        assert!(game.position("missing").is_none());
    }

    #[test]
    fn test_edges_and_terminals() {
        let game = GraphGame::builder("root")
            .edge("root", "a", 1)
            .swap_edge("root", "b", 3)
            .terminal("a", Outcome::Both)
            .build();

        let edges = game.enumerate_successors(&game.initial_position());
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].cost, 3);
        assert!(edges[1].swap);

        assert_eq!(game.check_terminal(&game.position("a").unwrap()), Outcome::Both);
        assert_eq!(game.check_terminal(&game.position("b").unwrap()), Outcome::None);
    }

    #[test]
    fn test_mover_controls_aggregation() {
        let game = GraphGame::builder("root").mover("root", Outcome::Player2).build();
        let root = game.initial_position();
        assert_eq!(game.aggregate_outcome(&root, Tally::new(2, 1, 0)), Outcome::Player2);
        assert_eq!(game.aggregate_outcome(&root, Tally::new(2, 0, 0)), Outcome::Player1);
    }

    #[test]
    fn test_unknown_position_is_inert() {
        let game = GraphGame::builder("root").build();
        let stray = Position::new(&[9, 9, 9]);
        assert_eq!(game.check_terminal(&stray), Outcome::None);
        assert!(game.enumerate_successors(&stray).is_empty());
    }
}
