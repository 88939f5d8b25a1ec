//! Two-phase layered solver.
//!
//! The forward phase walks layers `0, 1, 2, ...`, expanding every unsearched
//! state and registering its successors one step-cost deeper. When a layer
//! comes back empty the search is complete and the cursor flips to exiting.
//! The backward phase then walks the layers in reverse, solving every
//! searched state from its already-final successors.

use std::time::Instant;

use crate::core::{Diagnostics, Distance, EngineCursor, Outcome, Position, SearchState, Tally};
use crate::error::{Result, SolveError};
use crate::rules::RulesEngine;
use crate::storage::Storage;

use super::config::SolverConfig;
use super::stats::SolveStats;
use super::stop::StopSignal;

/// How a call to `Solver::run` ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Both phases exhausted; every reachable state is solved.
    Completed,
    /// The stop signal fired. Calling `run` again resumes from the stored cursor.
    Stopped,
}

/// Layered retrograde solver.
///
/// Generic over the rules engine. Owns the rules, configuration and run
/// statistics; all state-space data lives in the `Storage` passed to `run`.
pub struct Solver<E: RulesEngine> {
    /// The game rules.
    rules: E,

    /// Solver configuration.
    config: SolverConfig,

    /// Statistics of the latest run.
    stats: SolveStats,
}

impl<E: RulesEngine> Solver<E> {
    /// Create a new solver.
    pub fn new(rules: E, config: SolverConfig) -> Self {
        Self {
            rules,
            config,
            stats: SolveStats::default(),
        }
    }

    /// Get the rules engine.
    pub fn rules(&self) -> &E {
        &self.rules
    }

    /// Get the configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Get the statistics of the latest run.
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Register the initial position at distance zero.
    ///
    /// Idempotent, so it is safe to call before resuming a run.
    pub fn prepare<S: Storage>(&self, storage: &mut S) -> Result<Position> {
        let root = self.rules.initial_position();
        storage.register_or_verify_distance(&root, Distance::ZERO)?;
        Ok(root)
    }

    /// Drive both phases until they are exhausted or `stop` fires.
    ///
    /// Starts from whatever cursor the storage holds, so a stopped run
    /// resumes where it left off. With a `state_budget` configured, the run
    /// fires `stop` itself once the budget is spent. Completion requires the
    /// initial position to be resolved; otherwise the run fails with
    /// `SolveError::RootUnsolved`.
    pub fn run<S: Storage>(&mut self, storage: &mut S, stop: &StopSignal) -> Result<RunStatus> {
        let start = Instant::now();
        self.stats.reset();

        log::info!(
            "Solving {} ({}) from {}",
            self.rules.name(),
            self.rules.variant(),
            storage.cursor()
        );
        let status = self.run_layers(storage, stop);

        self.stats.time_us = start.elapsed().as_micros() as u64;
        match &status {
            Ok(RunStatus::Completed) => log::info!(
                "Solved {} states in {} us",
                self.stats.states_processed(),
                self.stats.time_us
            ),
            Ok(RunStatus::Stopped) => log::info!("Stopped at {}", storage.cursor()),
            Err(err) => log::error!("Run aborted at {}: {}", storage.cursor(), err),
        }
        status
    }

    fn run_layers<S: Storage>(&mut self, storage: &mut S, stop: &StopSignal) -> Result<RunStatus> {
        loop {
            if stop.is_stopped() {
                return Ok(RunStatus::Stopped);
            }

            let mut cursor = storage.cursor();
            let wanted = if cursor.exiting {
                SearchState::Searched
            } else {
                SearchState::Unsearched
            };
            let batch = storage.states_at(cursor.distance, wanted)?;

            if batch.is_empty() {
                if !cursor.exiting {
                    // An edge of cost > 1 can leave an empty layer in front of deeper ones.
                    let gap = storage
                        .deepest_distance()
                        .is_some_and(|deepest| deepest > cursor.distance);
                    if gap {
                        self.advance_search(&mut cursor);
                    } else {
                        log::info!("Search complete, deepest layer {}", cursor.distance);
                        cursor.exiting = true;
                    }
                } else if !self.retreat_solve(&mut cursor) {
                    return self.finish(storage);
                }
                storage.set_cursor(cursor)?;
                continue;
            }

            log::debug!(
                "Layer {}: {} {} states",
                cursor.distance,
                batch.len(),
                wanted
            );

            for state in &batch {
                if stop.is_stopped() {
                    return Ok(RunStatus::Stopped);
                }

                if cursor.exiting {
                    self.solve(storage, state, cursor.distance)?;
                } else {
                    self.search(storage, state, cursor.distance)?;
                }
                self.report_progress(&cursor);

                let budget = self.config.state_budget;
                if budget > 0 && self.stats.states_processed() >= budget {
                    log::info!("State budget of {} reached at {}", budget, cursor);
                    stop.stop();
                }
            }

            if cursor.exiting {
                self.stats.layers_solved += 1;
                if !self.retreat_solve(&mut cursor) {
                    log::info!("Solve complete");
                    return self.finish(storage);
                }
            } else {
                self.stats.layers_searched += 1;
                self.stats.deepest_layer = self.stats.deepest_layer.max(cursor.distance.get());
                self.advance_search(&mut cursor);
            }
            storage.set_cursor(cursor)?;
        }
    }

    /// Confirm the initial position was resolved before reporting completion.
    ///
    /// A store whose cursor already passed layer zero (for example one
    /// restored for other rules) would otherwise end without ever searching it.
    fn finish<S: Storage>(&self, storage: &S) -> Result<RunStatus> {
        let root = self.rules.initial_position();
        let record = storage.record(&root)?;
        if !record.is_end() {
            return Err(SolveError::RootUnsolved {
                position: root,
                state: record.state,
            });
        }
        Ok(RunStatus::Completed)
    }

    /// Move a search cursor one layer deeper, or flip it to exiting at the depth bound.
    fn advance_search(&self, cursor: &mut EngineCursor) {
        match cursor.distance.checked_step(1, self.config.max_depth) {
            Some(next) => cursor.distance = next,
            None => cursor.exiting = true,
        }
    }

    /// Move a solve cursor one layer shallower. Returns `false` at layer zero.
    fn retreat_solve(&self, cursor: &mut EngineCursor) -> bool {
        match cursor.distance.prev() {
            Some(prev) => {
                cursor.distance = prev;
                true
            }
            None => false,
        }
    }

    fn report_progress(&self, cursor: &EngineCursor) {
        let interval = self.config.progress_interval;
        let processed = self.stats.states_processed();
        if interval > 0 && processed % interval == 0 {
            log::info!("{} states processed, at {}", processed, cursor);
        }
    }

    /// Expand one unsearched state at `distance`.
    ///
    /// Terminal states end immediately with a single-unit tally. Otherwise
    /// every successor is registered at `distance + cost` and the state is
    /// marked searched.
    pub fn search<S: Storage>(
        &mut self,
        storage: &mut S,
        state: &Position,
        distance: Distance,
    ) -> Result<()> {
        let terminal = self.rules.check_terminal(state);
        if terminal.is_decisive() {
            storage.mark_end(state, terminal)?;
            self.stats.terminal_states += 1;
            return Ok(());
        }

        for edge in self.rules.enumerate_successors(state) {
            if edge.cost == 0 {
                return Err(SolveError::ZeroCostEdge {
                    from: state.clone(),
                    to: edge.target,
                });
            }
            let next = distance
                .checked_step(edge.cost, self.config.max_depth)
                .ok_or_else(|| SolveError::DepthExceeded {
                    position: edge.target.clone(),
                    requested: u64::from(distance.get()) + u64::from(edge.cost),
                    max: self.config.max_depth,
                })?;
            storage.register_or_verify_distance(&edge.target, next)?;
            self.stats.edges_registered += 1;
        }

        storage.mark_searched(state)?;
        self.stats.states_searched += 1;
        Ok(())
    }

    /// Solve one searched state at `distance` from its successors.
    ///
    /// Successors that are not strictly deeper are skipped (NON_LINEAR),
    /// undecided successors are skipped (NO_PLAYER_CHILDREN), and an empty
    /// tally becomes a forced draw (NO_ENDSTATE). Diagnostics are attached to
    /// the record after it is solved. Returns the winner.
    pub fn solve<S: Storage>(
        &mut self,
        storage: &mut S,
        state: &Position,
        distance: Distance,
    ) -> Result<Outcome> {
        let mut tally = Tally::default();
        let mut flags = Diagnostics::empty();

        for edge in self.rules.enumerate_successors(state) {
            let (child_distance, child_outcome) = storage.distance_and_outcome(&edge.target)?;
            if child_distance <= distance {
                flags |= Diagnostics::NON_LINEAR;
                continue;
            }
            if !tally.record(child_outcome.swapped_if(edge.swap)) {
                flags |= Diagnostics::NO_PLAYER_CHILDREN;
            }
        }

        if tally.is_empty() {
            flags |= Diagnostics::NO_ENDSTATE;
            tally.draw = 1;
        }

        let winner = self.rules.aggregate_outcome(state, tally);
        storage.mark_solved(state, tally, winner)?;
        self.stats.states_solved += 1;

        if !flags.is_empty() {
            self.stats.record_diagnostics(flags);
            storage.attach_diagnostic(state, flags)?;
        }
        Ok(winner)
    }
}
