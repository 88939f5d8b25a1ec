//! Reference in-memory storage backend.
//!
//! One map from position to record, plus an append-only index from distance
//! to the positions first registered there. The compound query filters a
//! layer on lifecycle at read time, which is a linear scan of the layer; a
//! production backend should serve it from a real index instead.
//!
//! Nothing here survives a process restart unless it is written out with
//! `save_snapshot` (see `storage::snapshot`).

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{Storage, ViolationPolicy};
use crate::core::{Diagnostics, Distance, EngineCursor, Outcome, Position, SearchState, StateRecord, Tally};
use crate::error::{ConsistencyViolation, Result, SolveError};

/// Configuration for `MemoryStore`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryStoreConfig {
    /// Response to solve-time diagnostics.
    pub policy: ViolationPolicy,

    /// Log every mutation at trace level.
    pub trace_mutations: bool,

    /// Return query batches in a seeded pseudo-random order.
    /// `None` keeps registration order.
    pub shuffle_seed: Option<u64>,
}

impl MemoryStoreConfig {
    /// Set the violation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ViolationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable per-mutation trace logging.
    #[must_use]
    pub fn with_trace_mutations(mut self, trace: bool) -> Self {
        self.trace_mutations = trace;
        self
    }

    /// Shuffle query batches with the given seed.
    #[must_use]
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }
}

/// In-memory `Storage` implementation.
///
/// Mutations are synchronous. Every invariant violation is returned as an
/// error, and with `ViolationPolicy::Abort` so are solve-time diagnostics.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    config: MemoryStoreConfig,

    cursor: EngineCursor,

    /// Records by position.
    records: FxHashMap<Position, StateRecord>,

    /// Positions by the distance they were first registered at. Append-only.
    layers: FxHashMap<Distance, Vec<Position>>,

    deepest: Option<Distance>,
}

impl MemoryStore {
    /// Create an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a custom configuration.
    #[must_use]
    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MemoryStoreConfig {
        &self.config
    }

    /// Number of registered states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no state has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record without going through the `Storage` error path.
    #[must_use]
    pub fn get(&self, state: &Position) -> Option<&StateRecord> {
        self.records.get(state)
    }

    /// Iterate over all records, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &StateRecord> {
        self.records.values()
    }

    /// Records carrying at least one diagnostic.
    #[must_use]
    pub fn diagnosed(&self) -> Vec<&StateRecord> {
        self.records
            .values()
            .filter(|r| !r.diagnostics.is_empty())
            .collect()
    }

    /// Number of states registered at each distance, shallowest first.
    #[must_use]
    pub fn layer_sizes(&self) -> Vec<(Distance, usize)> {
        let mut sizes: Vec<_> = self
            .layers
            .iter()
            .map(|(d, positions)| (*d, positions.len()))
            .collect();
        sizes.sort_unstable_by_key(|(d, _)| *d);
        sizes
    }

    /// Positions of one layer in registration order.
    pub(crate) fn layer(&self, distance: Distance) -> &[Position] {
        self.layers.get(&distance).map_or(&[], Vec::as_slice)
    }

    /// Insert records as-is, indexing each under its distance.
    ///
    /// Used when restoring a snapshot. A position listed twice is rejected.
    pub(crate) fn restore(&mut self, cursor: EngineCursor, records: Vec<StateRecord>) -> Result<()> {
        self.cursor = cursor;
        for record in records {
            if self.records.contains_key(&record.position) {
                return Err(bincode::Error::new(bincode::ErrorKind::Custom(format!(
                    "state {} appears more than once",
                    record.position
                )))
                .into());
            }
            self.index(record);
        }
        Ok(())
    }

    fn index(&mut self, record: StateRecord) {
        let distance = record.distance;
        self.layers
            .entry(distance)
            .or_default()
            .push(record.position.clone());
        self.deepest = Some(self.deepest.map_or(distance, |d| d.max(distance)));
        self.records.insert(record.position.clone(), record);
    }

    fn get_mut(&mut self, state: &Position) -> Result<&mut StateRecord> {
        self.records
            .get_mut(state)
            .ok_or_else(|| SolveError::NotFound(state.clone()))
    }
}

impl Storage for MemoryStore {
    fn register_or_verify_distance(&mut self, state: &Position, distance: Distance) -> Result<()> {
        if let Some(record) = self.records.get(state) {
            if record.distance != distance {
                return Err(SolveError::consistency(
                    state,
                    ConsistencyViolation::DistanceMismatch {
                        stored: record.distance,
                        offered: distance,
                    },
                ));
            }
            return Ok(());
        }

        self.index(StateRecord::new(state.clone(), distance));

        if self.config.trace_mutations {
            log::trace!("State {} has distance {}", state, distance);
        }
        Ok(())
    }

    fn mark_searched(&mut self, state: &Position) -> Result<()> {
        let record = self.get_mut(state)?;
        if !record.state.can_advance_to(SearchState::Searched) {
            return Err(SolveError::consistency(
                state,
                ConsistencyViolation::InvalidTransition {
                    from: record.state,
                    to: SearchState::Searched,
                },
            ));
        }
        record.state = SearchState::Searched;

        if self.config.trace_mutations {
            log::trace!("State {} was searched", state);
        }
        Ok(())
    }

    fn mark_end(&mut self, state: &Position, winner: Outcome) -> Result<()> {
        if !winner.is_decisive() {
            return Err(SolveError::consistency(state, ConsistencyViolation::UndecidedEnd));
        }

        let record = self.get_mut(state)?;
        match record.state {
            SearchState::Unsearched => {}
            SearchState::End if record.winner == winner => return Ok(()),
            SearchState::End => {
                return Err(SolveError::consistency(
                    state,
                    ConsistencyViolation::WinnerMismatch {
                        stored: record.winner,
                        offered: winner,
                    },
                ));
            }
            SearchState::Searched => {
                return Err(SolveError::consistency(
                    state,
                    ConsistencyViolation::InvalidTransition {
                        from: record.state,
                        to: SearchState::End,
                    },
                ));
            }
        }

        record.tally = Tally::single(winner);
        record.winner = winner;
        record.state = SearchState::End;

        if self.config.trace_mutations {
            log::trace!("State {} ends with winner {}", state, winner);
        }
        Ok(())
    }

    fn mark_solved(&mut self, state: &Position, tally: Tally, winner: Outcome) -> Result<()> {
        if !winner.is_decisive() {
            return Err(SolveError::consistency(state, ConsistencyViolation::UndecidedEnd));
        }

        let record = self.get_mut(state)?;
        if record.state != SearchState::Searched {
            return Err(SolveError::consistency(
                state,
                ConsistencyViolation::InvalidTransition {
                    from: record.state,
                    to: SearchState::End,
                },
            ));
        }

        record.tally = tally;
        record.winner = winner;
        record.state = SearchState::End;

        if self.config.trace_mutations {
            log::trace!(
                "State {} was solved with winner {} ({}, {}, {})",
                state,
                winner,
                tally.p1,
                tally.p2,
                tally.draw
            );
        }
        Ok(())
    }

    fn distance_and_outcome(&self, state: &Position) -> Result<(Distance, Outcome)> {
        self.records
            .get(state)
            .map(|r| (r.distance, r.winner))
            .ok_or_else(|| SolveError::NotFound(state.clone()))
    }

    fn attach_diagnostic(&mut self, state: &Position, flags: Diagnostics) -> Result<()> {
        if flags.is_empty() {
            return Ok(());
        }

        let policy = self.config.policy;
        let record = self.get_mut(state)?;
        record.diagnostics |= flags;

        match policy {
            ViolationPolicy::Abort => Err(SolveError::Structural {
                position: state.clone(),
                flags,
            }),
            ViolationPolicy::Collect => {
                log::warn!("State {} has diagnostics {:?}", state, flags);
                Ok(())
            }
        }
    }

    fn cursor(&self) -> EngineCursor {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: EngineCursor) -> Result<()> {
        if !self.cursor.allows(&cursor) {
            return Err(SolveError::InvalidCursor {
                from: self.cursor,
                to: cursor,
            });
        }
        self.cursor = cursor;

        if self.config.trace_mutations {
            log::trace!("Updated cursor to {}", cursor);
        }
        Ok(())
    }

    fn states_at(&self, distance: Distance, state: SearchState) -> Result<Vec<Position>> {
        let mut found: Vec<Position> = self
            .layer(distance)
            .iter()
            .filter(|p| self.records.get(*p).is_some_and(|r| r.state == state))
            .cloned()
            .collect();

        if let Some(seed) = self.config.shuffle_seed {
            let stream = seed ^ (u64::from(distance.get()) << 8) ^ state as u64;
            let mut rng = ChaCha8Rng::seed_from_u64(stream);
            found.shuffle(&mut rng);
        }

        if self.config.trace_mutations {
            log::trace!(
                "Getting {} states with distance {} and state {}",
                found.len(),
                distance,
                state
            );
        }
        Ok(found)
    }

    fn record(&self, state: &Position) -> Result<StateRecord> {
        self.records
            .get(state)
            .cloned()
            .ok_or_else(|| SolveError::NotFound(state.clone()))
    }

    fn deepest_distance(&self) -> Option<Distance> {
        self.deepest
    }
}
