//! Step instrumentation for the solver.
//!
//! The driver notifies a [`StepObserver`] after every state transition with
//! a read-only [`StepSnapshot`] of the grid, coverage flags, selected and
//! prepared zeros, and the alternating path when one is being built. The
//! observer is pure instrumentation: it never influences control flow, and
//! solving without one yields identical results.
//!
//! Three sinks ship with the crate:
//!
//! - [`TraceObserver`] emits a structured `tracing` event per step.
//! - [`StepRecorder`] keeps an owned copy of every snapshot, for tests and
//!   offline inspection.
//! - [`HtmlReportObserver`](crate::HtmlReportObserver) renders each step as
//!   an HTML table on disk.

use serde::Serialize;

use crate::path::AlternatingPath;

/// Solver state machine phases, as reported to observers and carried in
/// invariant-error snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Row and column minimum reduction of the fresh grid.
    Reduction,
    /// Greedy initial selection plus the first column cover.
    InitialSelection,
    /// An uncovered zero was found and marked prepared.
    Search,
    /// The prepared zero's row already held a selection; the row was
    /// re-covered and the selected column uncovered.
    RowHasSelection,
    /// An alternating path was built from the prepared zero (snapshot taken
    /// before the flip).
    BuildPath,
    /// The smallest uncovered value was shifted out of the uncovered
    /// region.
    AdjustPotentials,
    /// Every column is covered; the matching is a minimum-cost bijection.
    Optimal,
}

/// Borrowed read-only view of the solver state after one transition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StepSnapshot<'a> {
    pub phase: Phase,
    /// Grid side length.
    pub n: usize,
    /// Row-major cost grid as currently mutated.
    pub grid: &'a [f64],
    pub covered_rows: &'a [bool],
    pub covered_cols: &'a [bool],
    pub selected_in_row: &'a [Option<usize>],
    pub prepared_in_row: &'a [Option<usize>],
    /// Present only on [`Phase::BuildPath`] steps.
    pub path: Option<&'a AlternatingPath>,
}

impl StepSnapshot<'_> {
    #[inline]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.grid[i * self.n + j]
    }

    /// Deep-copy the snapshot so it outlives the solve.
    pub fn to_recorded(&self) -> RecordedStep {
        RecordedStep {
            phase: self.phase,
            n: self.n,
            grid: self.grid.to_vec(),
            covered_rows: self.covered_rows.to_vec(),
            covered_cols: self.covered_cols.to_vec(),
            selected_in_row: self.selected_in_row.to_vec(),
            prepared_in_row: self.prepared_in_row.to_vec(),
            path: self.path.cloned(),
        }
    }
}

/// Sink notified after every solver state transition.
///
/// Implementations must treat the snapshot as read-only; the solver's
/// behavior does not depend on what an observer does with it.
pub trait StepObserver {
    fn on_step(&mut self, step: &StepSnapshot<'_>);
}

/// Observer that ignores every step. [`solve`](crate::solve) runs with this
/// when no sink is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _step: &StepSnapshot<'_>) {}
}

/// Observer emitting one `tracing` debug event per step, with the phase and
/// the coverage/selection tallies as structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceObserver;

impl StepObserver for TraceObserver {
    fn on_step(&mut self, step: &StepSnapshot<'_>) {
        tracing::debug!(
            phase = ?step.phase,
            covered_rows = step.covered_rows.iter().filter(|&&c| c).count(),
            covered_cols = step.covered_cols.iter().filter(|&&c| c).count(),
            selected = step.selected_in_row.iter().flatten().count(),
            prepared = step.prepared_in_row.iter().flatten().count(),
            "solve_step"
        );
    }
}

/// Owned copy of one snapshot, produced by [`StepRecorder`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedStep {
    pub phase: Phase,
    pub n: usize,
    pub grid: Vec<f64>,
    pub covered_rows: Vec<bool>,
    pub covered_cols: Vec<bool>,
    pub selected_in_row: Vec<Option<usize>>,
    pub prepared_in_row: Vec<Option<usize>>,
    pub path: Option<AlternatingPath>,
}

impl RecordedStep {
    #[inline]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.grid[i * self.n + j]
    }
}

/// Observer that records every step for later inspection.
#[derive(Debug, Default)]
pub struct StepRecorder {
    steps: Vec<RecordedStep>,
}

impl StepRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[RecordedStep] {
        &self.steps
    }
}

impl StepObserver for StepRecorder {
    fn on_step(&mut self, step: &StepSnapshot<'_>) {
        self.steps.push(step.to_recorded());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_deep_copies_snapshots() {
        let grid = vec![0.0, 1.0, 2.0, 0.0];
        let covered = vec![false, false];
        let selected = vec![Some(0), None];
        let prepared = vec![None, None];
        let snapshot = StepSnapshot {
            phase: Phase::Search,
            n: 2,
            grid: &grid,
            covered_rows: &covered,
            covered_cols: &covered,
            selected_in_row: &selected,
            prepared_in_row: &prepared,
            path: None,
        };

        let mut recorder = StepRecorder::new();
        recorder.on_step(&snapshot);

        let step = &recorder.steps()[0];
        assert_eq!(step.phase, Phase::Search);
        assert_eq!(step.value(1, 0), 2.0);
        assert_eq!(step.selected_in_row, selected);
    }

    #[test]
    fn recorded_steps_serialize() {
        let step = RecordedStep {
            phase: Phase::AdjustPotentials,
            n: 1,
            grid: vec![0.0],
            covered_rows: vec![false],
            covered_cols: vec![true],
            selected_in_row: vec![Some(0)],
            prepared_in_row: vec![None],
            path: None,
        };
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"adjust_potentials\""));
    }
}
