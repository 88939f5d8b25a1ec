//! Interrupted runs, snapshots and query order.

use std::cell::Cell;

use retrograde::games::{Nim, TicTacToe};
use retrograde::{
    Distance, EngineCursor, ErrorCategory, MemoryStore, MemoryStoreConfig, Outcome, Position,
    RulesEngine, RunStatus, SearchState, SolveError, Solver, SolverConfig, StopSignal, Storage,
    Successors, Tally,
};

/// Wraps a game and fires a stop signal on the `after`-th successor enumeration.
struct Interrupting<E> {
    inner: E,
    stop: StopSignal,
    after: usize,
    calls: Cell<usize>,
}

impl<E: RulesEngine> Interrupting<E> {
    fn new(inner: E, stop: StopSignal, after: usize) -> Self {
        Self {
            inner,
            stop,
            after,
            calls: Cell::new(0),
        }
    }
}

impl<E: RulesEngine> RulesEngine for Interrupting<E> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn variant(&self) -> String {
        self.inner.variant()
    }

    fn initial_position(&self) -> Position {
        self.inner.initial_position()
    }

    fn check_terminal(&self, position: &Position) -> Outcome {
        self.inner.check_terminal(position)
    }

    fn aggregate_outcome(&self, position: &Position, tally: Tally) -> Outcome {
        self.inner.aggregate_outcome(position, tally)
    }

    fn enumerate_successors(&self, position: &Position) -> Successors {
        let calls = self.calls.get() + 1;
        self.calls.set(calls);
        if calls == self.after {
            self.stop.stop();
        }
        self.inner.enumerate_successors(position)
    }
}

type Verdict = (Position, Distance, Outcome, Tally);

fn verdicts(store: &MemoryStore) -> Vec<Verdict> {
    let mut all: Vec<Verdict> = store
        .records()
        .map(|r| (r.position.clone(), r.distance, r.winner, r.tally))
        .collect();
    all.sort_by(|a, b| a.0.cmp(&b.0));
    all
}

fn baseline<E: RulesEngine>(rules: E, config: MemoryStoreConfig) -> MemoryStore {
    let mut solver = Solver::new(rules, SolverConfig::default());
    let mut store = MemoryStore::with_config(config);
    solver.prepare(&mut store).unwrap();
    assert_eq!(
        solver.run(&mut store, &StopSignal::new()).unwrap(),
        RunStatus::Completed
    );
    store
}

/// Run until the interruption fires, returning the partially solved store.
fn interrupted<E: RulesEngine>(
    rules: E,
    after: usize,
) -> (Solver<Interrupting<E>>, MemoryStore, StopSignal) {
    let stop = StopSignal::new();
    let mut solver = Solver::new(
        Interrupting::new(rules, stop.clone(), after),
        SolverConfig::default(),
    );
    let mut store = MemoryStore::new();
    solver.prepare(&mut store).unwrap();
    assert_eq!(solver.run(&mut store, &stop).unwrap(), RunStatus::Stopped);
    (solver, store, stop)
}

// =============================================================================
// Stop and Resume
// =============================================================================

#[test_log::test]
fn test_resume_matches_uninterrupted_run() {
    let expected = verdicts(&baseline(TicTacToe::new(), MemoryStoreConfig::default()));

    // Early search, late search, early solve and late solve.
    for after in [1, 500, 4600, 8000] {
        let (mut solver, mut store, stop) = interrupted(TicTacToe::new(), after);

        stop.reset();
        assert_eq!(solver.run(&mut store, &stop).unwrap(), RunStatus::Completed);
        assert_eq!(verdicts(&store), expected, "interrupted after {}", after);
    }
}

#[test]
fn test_stop_before_run_changes_nothing() {
    let mut solver = Solver::new(Nim::new(5, 2), SolverConfig::default());
    let mut store = MemoryStore::new();
    let root = solver.prepare(&mut store).unwrap();

    let stop = StopSignal::new();
    stop.stop();
    assert_eq!(solver.run(&mut store, &stop).unwrap(), RunStatus::Stopped);
    assert_eq!(store.cursor(), EngineCursor::default());
    assert_eq!(store.len(), 1);
    assert_eq!(store.distance_and_outcome(&root).unwrap().1, Outcome::None);
}

#[test]
fn test_resume_after_completion_is_a_no_op() {
    let mut solver = Solver::new(Nim::new(9, 3), SolverConfig::default());
    let mut store = MemoryStore::new();
    solver.prepare(&mut store).unwrap();
    solver.run(&mut store, &StopSignal::new()).unwrap();
    let before = verdicts(&store);

    solver.prepare(&mut store).unwrap();
    assert_eq!(
        solver.run(&mut store, &StopSignal::new()).unwrap(),
        RunStatus::Completed
    );
    assert_eq!(solver.stats().states_processed(), 0);
    assert_eq!(verdicts(&store), before);
}

#[test]
fn test_resume_does_not_repeat_work() {
    let (mut solver, mut store, stop) = interrupted(TicTacToe::new(), 3000);
    assert!(!store.cursor().exiting);
    let first = solver.stats().clone();

    stop.reset();
    solver.run(&mut store, &stop).unwrap();
    let second = solver.stats();

    assert_eq!(
        first.states_searched + first.terminal_states + second.states_searched + second.terminal_states,
        5478
    );
    assert_eq!(first.states_solved, 0);
    assert_eq!(second.states_solved, first.states_searched + second.states_searched);
    assert_eq!(store.cursor(), EngineCursor::new(Distance::ZERO, true));
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn test_snapshot_resume_in_new_store() {
    let expected = verdicts(&baseline(TicTacToe::new(), MemoryStoreConfig::default()));
    let (_, store, _) = interrupted(TicTacToe::new(), 6000);

    let mut bytes = Vec::new();
    store.save_snapshot(&mut bytes, &TicTacToe::new()).unwrap();

    let mut restored = MemoryStore::load_snapshot(
        bytes.as_slice(),
        MemoryStoreConfig::default(),
        &TicTacToe::new(),
    )
    .unwrap();
    assert_eq!(restored.cursor(), store.cursor());
    assert_eq!(restored.len(), store.len());
    assert_eq!(restored.layer_sizes(), store.layer_sizes());

    let mut solver = Solver::new(TicTacToe::new(), SolverConfig::default());
    solver.prepare(&mut restored).unwrap();
    assert_eq!(
        solver.run(&mut restored, &StopSignal::new()).unwrap(),
        RunStatus::Completed
    );
    assert_eq!(verdicts(&restored), expected);
}

#[test]
fn test_snapshot_of_other_game_is_rejected() {
    let solved = baseline(TicTacToe::new(), MemoryStoreConfig::default());
    let mut bytes = Vec::new();
    solved.save_snapshot(&mut bytes, &TicTacToe::new()).unwrap();

    let err = MemoryStore::load_snapshot(
        bytes.as_slice(),
        MemoryStoreConfig::default(),
        &Nim::new(21, 3),
    )
    .unwrap_err();
    assert!(matches!(err, SolveError::GameMismatch { .. }));
    assert_eq!(err.category(), ErrorCategory::Contract);
}

#[test]
fn test_finished_store_cannot_complete_other_rules() {
    // A tic-tac-toe store resumed with Nim rules: the cursor is already done
    // with layer zero, so the Nim root would never be searched.
    let mut store = baseline(TicTacToe::new(), MemoryStoreConfig::default());
    let mut solver = Solver::new(Nim::new(21, 3), SolverConfig::default());
    let root = solver.prepare(&mut store).unwrap();

    let err = solver.run(&mut store, &StopSignal::new()).unwrap_err();
    assert!(matches!(
        err,
        SolveError::RootUnsolved {
            state: SearchState::Unsearched,
            ..
        }
    ));
    assert_eq!(store.distance_and_outcome(&root).unwrap().1, Outcome::None);
}

#[test]
fn test_budget_pauses_into_snapshot() {
    let expected = verdicts(&baseline(TicTacToe::new(), MemoryStoreConfig::default()));

    let config = SolverConfig::default().with_state_budget(2000);
    let mut solver = Solver::new(TicTacToe::new(), config.clone());
    let mut store = MemoryStore::new();
    solver.prepare(&mut store).unwrap();
    assert_eq!(
        solver.run(&mut store, &StopSignal::new()).unwrap(),
        RunStatus::Stopped
    );

    // Each pause goes through a snapshot, as the CLI does with --save/--resume.
    let mut status = RunStatus::Stopped;
    let mut pauses = 0;
    while status == RunStatus::Stopped {
        let mut bytes = Vec::new();
        store.save_snapshot(&mut bytes, solver.rules()).unwrap();
        store = MemoryStore::load_snapshot(
            bytes.as_slice(),
            MemoryStoreConfig::default(),
            &TicTacToe::new(),
        )
        .unwrap();

        solver = Solver::new(TicTacToe::new(), config.clone());
        solver.prepare(&mut store).unwrap();
        status = solver.run(&mut store, &StopSignal::new()).unwrap();
        pauses += 1;
    }

    // 5478 searched or terminal plus 4520 solved: five runs of at most 2000.
    assert_eq!(pauses, 4);
    assert_eq!(verdicts(&store), expected);
}

// =============================================================================
// Query Order
// =============================================================================

#[test]
fn test_shuffled_layers_give_same_verdicts() {
    let expected = verdicts(&baseline(TicTacToe::new(), MemoryStoreConfig::default()));

    for seed in [1, 42, 0xDEAD_BEEF] {
        let store = baseline(
            TicTacToe::new(),
            MemoryStoreConfig::default().with_shuffle_seed(seed),
        );
        assert_eq!(verdicts(&store), expected, "seed {}", seed);
    }
}
