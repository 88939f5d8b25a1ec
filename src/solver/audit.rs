//! Post-run verification of a solved state space.
//!
//! Walks everything reachable from the initial position and recomputes each
//! verdict from the stored children, independently of the layer order the
//! solver used.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::core::{Position, Tally};
use crate::error::Result;
use crate::rules::RulesEngine;
use crate::storage::Storage;

/// Findings of `audit`.
#[derive(Clone, Debug, Default)]
pub struct AuditReport {
    /// Reachable states visited.
    pub checked: usize,

    /// States not yet in `End`.
    pub unresolved: Vec<Position>,

    /// States whose stored tally or winner disagrees with their children.
    pub mismatched: Vec<Position>,

    /// States carrying diagnostics.
    pub diagnosed: Vec<Position>,
}

impl AuditReport {
    /// Check if every reachable state is solved, consistent and undiagnosed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.mismatched.is_empty() && self.diagnosed.is_empty()
    }
}

/// Verify every state reachable from `rules.initial_position()`.
///
/// A terminal state must carry its terminal outcome. Any other state must
/// carry the tally of its children's (perspective-adjusted) winners and the
/// winner `aggregate_outcome` derives from that tally. Fails only when a
/// reachable state is missing from storage.
pub fn audit<E: RulesEngine, S: Storage>(rules: &E, storage: &S) -> Result<AuditReport> {
    let mut report = AuditReport::default();
    let root = rules.initial_position();

    let mut seen = FxHashSet::default();
    let mut queue = VecDeque::new();
    seen.insert(root.clone());
    queue.push_back(root);

    while let Some(position) = queue.pop_front() {
        let record = storage.record(&position)?;
        report.checked += 1;

        if !record.diagnostics.is_empty() {
            report.diagnosed.push(position.clone());
        }
        if !record.is_end() {
            report.unresolved.push(position.clone());
        }

        let terminal = rules.check_terminal(&position);
        if terminal.is_decisive() {
            if record.winner != terminal || record.tally != Tally::single(terminal) {
                report.mismatched.push(position);
            }
            continue;
        }

        let mut tally = Tally::default();
        for edge in rules.enumerate_successors(&position) {
            let child = storage.record(&edge.target)?;
            tally.record(child.winner.swapped_if(edge.swap));
            if seen.insert(edge.target.clone()) {
                queue.push_back(edge.target);
            }
        }
        if tally.is_empty() {
            tally.draw = 1;
        }

        if record.is_end()
            && (record.tally != tally || record.winner != rules.aggregate_outcome(&position, tally))
        {
            report.mismatched.push(position);
        }
    }

    log::debug!(
        "Audit checked {} states: {} unresolved, {} mismatched, {} diagnosed",
        report.checked,
        report.unresolved.len(),
        report.mismatched.len(),
        report.diagnosed.len()
    );
    Ok(report)
}
