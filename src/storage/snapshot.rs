//! Snapshots of the in-memory store.
//!
//! A snapshot carries the game label, the cursor and every record, layer by
//! layer, so a stopped run can be written out, loaded into a fresh process and
//! resumed with the same rules. The encoding is bincode and is not meant as a
//! stable interchange format.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::memory::{MemoryStore, MemoryStoreConfig};
use super::Storage;
use crate::core::{EngineCursor, StateRecord};
use crate::error::{Result, SolveError};
use crate::rules::RulesEngine;

const SNAPSHOT_VERSION: u32 = 2;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    /// `name (variant)` of the rules that produced the records.
    game: String,
    cursor: EngineCursor,
    /// Records ordered by distance, then by registration order.
    records: Vec<StateRecord>,
}

fn game_label<E: RulesEngine>(rules: &E) -> String {
    format!("{} ({})", rules.name(), rules.variant())
}

impl MemoryStore {
    /// Write the cursor and all records to `writer`, tagged with the game of `rules`.
    pub fn save_snapshot<W: Write, E: RulesEngine>(&self, writer: W, rules: &E) -> Result<()> {
        let mut records = Vec::with_capacity(self.len());
        for (distance, _) in self.layer_sizes() {
            records.extend(
                self.layer(distance)
                    .iter()
                    .filter_map(|p| self.get(p))
                    .cloned(),
            );
        }

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            game: game_label(rules),
            cursor: self.cursor(),
            records,
        };
        bincode::serialize_into(writer, &snapshot)?;

        log::debug!(
            "Saved snapshot of {} with {} states at {}",
            snapshot.game,
            self.len(),
            snapshot.cursor
        );
        Ok(())
    }

    /// Rebuild a store from a snapshot written by `save_snapshot`.
    ///
    /// Fails with `SolveError::GameMismatch` unless the snapshot was written
    /// for the same game and variant as `rules`.
    pub fn load_snapshot<R: Read, E: RulesEngine>(
        reader: R,
        config: MemoryStoreConfig,
        rules: &E,
    ) -> Result<Self> {
        let snapshot: Snapshot = bincode::deserialize_from(reader)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(bincode::Error::new(bincode::ErrorKind::Custom(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )))
            .into());
        }

        let expected = game_label(rules);
        if snapshot.game != expected {
            return Err(SolveError::GameMismatch {
                snapshot: snapshot.game,
                rules: expected,
            });
        }

        let mut store = MemoryStore::with_config(config);
        let count = snapshot.records.len();
        store.restore(snapshot.cursor, snapshot.records)?;

        log::debug!(
            "Loaded snapshot of {} with {} states at {}",
            snapshot.game,
            count,
            snapshot.cursor
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Distance, Outcome, Position, SearchState};
    use crate::error::ErrorCategory;
    use crate::games::{Nim, TicTacToe};

    #[test]
    fn test_snapshot_roundtrip() {
        let rules = Nim::new(1, 1);
        let mut store = MemoryStore::new();
        let root = Nim::position(1);
        let leaf = Nim::position(0);
        store.register_or_verify_distance(&root, Distance::ZERO).unwrap();
        store.register_or_verify_distance(&leaf, Distance::new(1)).unwrap();
        store.mark_searched(&root).unwrap();
        store.mark_end(&leaf, Outcome::Player2).unwrap();
        store.set_cursor(EngineCursor::new(Distance::new(1), true)).unwrap();

        let mut bytes = Vec::new();
        store.save_snapshot(&mut bytes, &rules).unwrap();
        let loaded =
            MemoryStore::load_snapshot(bytes.as_slice(), MemoryStoreConfig::default(), &rules)
                .unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.cursor(), EngineCursor::new(Distance::new(1), true));
        assert_eq!(loaded.get(&root), store.get(&root));
        assert_eq!(loaded.get(&leaf).unwrap().winner, Outcome::Player2);
        assert_eq!(
            loaded.states_at(Distance::ZERO, SearchState::Searched).unwrap(),
            vec![root]
        );
        assert_eq!(loaded.deepest_distance(), Some(Distance::new(1)));
    }

    #[test]
    fn test_snapshot_rejects_other_game() {
        let mut store = MemoryStore::new();
        store
            .register_or_verify_distance(&TicTacToe::new().initial_position(), Distance::ZERO)
            .unwrap();
        let mut bytes = Vec::new();
        store.save_snapshot(&mut bytes, &TicTacToe::new()).unwrap();

        let err = MemoryStore::load_snapshot(
            bytes.as_slice(),
            MemoryStoreConfig::default(),
            &Nim::new(21, 3),
        )
        .unwrap_err();
        assert!(matches!(err, SolveError::GameMismatch { .. }));

        // Same game, different variant.
        let mut bytes = Vec::new();
        MemoryStore::new()
            .save_snapshot(&mut bytes, &Nim::new(20, 3))
            .unwrap();
        let err = MemoryStore::load_snapshot(
            bytes.as_slice(),
            MemoryStoreConfig::default(),
            &Nim::new(21, 3),
        )
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Contract);
    }

    #[test]
    fn test_snapshot_rejects_duplicate_records() {
        let rules = Nim::new(3, 1);
        let record = StateRecord::new(Nim::position(3), Distance::ZERO);
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            game: game_label(&rules),
            cursor: EngineCursor::default(),
            records: vec![record.clone(), record],
        };
        let bytes = bincode::serialize(&snapshot).unwrap();

        let err = MemoryStore::load_snapshot(bytes.as_slice(), MemoryStoreConfig::default(), &rules)
            .unwrap_err();
        assert!(matches!(err, SolveError::Snapshot(_)));
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        let garbage = [0xffu8; 3];
        assert!(
            MemoryStore::load_snapshot(&garbage[..], MemoryStoreConfig::default(), &Nim::new(1, 1))
                .is_err()
        );
    }

    #[test]
    fn test_snapshot_positions_survive() {
        let rules = TicTacToe::new();
        let mut store = MemoryStore::new();
        let root = rules.initial_position();
        store.register_or_verify_distance(&root, Distance::ZERO).unwrap();
        store
            .register_or_verify_distance(&Position::new(&[1, 0, 0]), Distance::new(1))
            .unwrap();

        let mut bytes = Vec::new();
        store.save_snapshot(&mut bytes, &rules).unwrap();
        let loaded =
            MemoryStore::load_snapshot(bytes.as_slice(), MemoryStoreConfig::default(), &rules)
                .unwrap();
        assert_eq!(loaded.layer_sizes(), store.layer_sizes());
    }
}
