//! The solver driver: a state machine over the cost matrix, matching, and
//! coverage.
//!
//! A solve runs reduction, then the greedy initial selection, then loops
//! search / re-cover / build-path / adjust-potentials until every column is
//! covered. The search scans uncovered rows × uncovered columns for a zero
//! and marks it prepared. If the zero's row already holds a selection, the
//! row is re-covered, the selected column uncovered, and the potentials
//! adjusted directly - the search is not resumed first. If the row holds no
//! selection, the alternating path from the prepared zero is built and
//! flipped, growing the matching by one.
//!
//! The whole solve is single-threaded and deterministic; the matrix,
//! matching, and coverage are exclusively owned for its duration.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn, Level};

use crate::error::{AssignError, SolveContext};
use crate::matrix::CostMatrix;
use crate::observer::{NoopObserver, Phase, StepObserver, StepSnapshot};
use crate::path::AlternatingPath;
use crate::state::{Coverage, Matching};

/// A minimum-cost row→column bijection, with the realized total computed
/// against the original (pre-reduction) costs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    targets: Vec<usize>,
    total_cost: f64,
}

impl Assignment {
    /// Column assigned to `row`.
    #[inline]
    pub fn column_of(&self, row: usize) -> usize {
        self.targets[row]
    }

    /// The full row→column map, indexed by row.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// (row, column) pairs in row order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets.iter().copied().enumerate()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Sum of the original costs along the assignment.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

/// Solve the square assignment problem for `grid`, minimizing total cost.
///
/// The grid must be square with finite entries. Returns the optimal
/// [`Assignment`] or a typed [`AssignError`]; shape errors are detected
/// before any work begins.
pub fn solve(grid: &[Vec<f64>]) -> Result<Assignment, AssignError> {
    solve_with_observer(grid, &mut NoopObserver)
}

/// [`solve`], notifying `observer` after every state transition.
///
/// The observer receives a read-only snapshot per transition and cannot
/// influence the result; solving with and without one is identical.
pub fn solve_with_observer(
    grid: &[Vec<f64>],
    observer: &mut dyn StepObserver,
) -> Result<Assignment, AssignError> {
    let start = Instant::now();
    let matrix = CostMatrix::from_rows(grid)?;
    let n = matrix.n();

    let span = tracing::span!(Level::DEBUG, "optassign.solve", n);
    let _guard = span.enter();

    let mut run = SolveRun {
        original: matrix.cells().to_vec(),
        matching: Matching::new(n),
        coverage: Coverage::new(n),
        matrix,
        observer,
    };

    match run.run() {
        Ok(assignment) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                n,
                total_cost = assignment.total_cost(),
                elapsed_micros,
                "solve_success"
            );
            Ok(assignment)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, elapsed_micros, "solve_failure");
            Err(err)
        }
    }
}

struct SolveRun<'a> {
    matrix: CostMatrix,
    /// Pre-reduction copy; the realized total is reported against it.
    original: Vec<f64>,
    matching: Matching,
    coverage: Coverage,
    observer: &'a mut dyn StepObserver,
}

impl SolveRun<'_> {
    fn run(&mut self) -> Result<Assignment, AssignError> {
        self.matrix.reduce();
        self.notify(Phase::Reduction, None);

        self.select_independent_zeros()?;
        self.coverage.reset_from(&self.matching);
        self.notify(Phase::InitialSelection, None);

        while !self.is_optimal() {
            let Some((row, col)) = self.find_uncovered_zero() else {
                self.adjust_potentials()?;
                continue;
            };
            self.notify(Phase::Search, None);

            match self.matching.selected_col(row) {
                Some(selected_col) => {
                    self.coverage.set_row(row, true);
                    self.coverage.set_col(selected_col, false);
                    self.notify(Phase::RowHasSelection, None);
                    self.adjust_potentials()?;
                }
                None => self.build_path(row, col),
            }
        }
        self.notify(Phase::Optimal, None);
        self.finish()
    }

    /// The matching is optimal iff every column is covered: covered columns
    /// are exactly those holding a selected zero, and selection is
    /// injective.
    fn is_optimal(&self) -> bool {
        self.coverage.covered_col_count() == self.matrix.n()
    }

    /// Greedy initial selection: repeatedly take the row with the fewest
    /// zeros in still-unselected columns, commit its first such zero, and
    /// discount that column from the remaining rows.
    fn select_independent_zeros(&mut self) -> Result<(), AssignError> {
        let n = self.matrix.n();
        let mut counts: Vec<Option<usize>> = (0..n)
            .map(|i| Some((0..n).filter(|&j| self.matrix.get(i, j) == 0.0).count()))
            .collect();

        while let Some((row, count)) = counts
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|c| (i, c)))
            .min_by_key(|&(i, c)| (c, i))
        {
            if count == 0 {
                return Err(self.unmatched_row(row, Phase::InitialSelection));
            }
            let col = (0..n)
                .find(|&j| self.matrix.get(row, j) == 0.0 && self.matching.selected_row(j).is_none())
                .ok_or_else(|| self.unmatched_row(row, Phase::InitialSelection))?;

            self.matching.select(row, col);
            counts[row] = None;
            for (r, slot) in counts.iter_mut().enumerate() {
                if let Some(c) = *slot {
                    if self.matrix.get(r, col) == 0.0 {
                        *slot = if c <= 1 { None } else { Some(c - 1) };
                    }
                }
            }
        }
        Ok(())
    }

    /// Scan uncovered rows × uncovered columns for a zero; mark it prepared.
    fn find_uncovered_zero(&mut self) -> Option<(usize, usize)> {
        let n = self.matrix.n();
        for i in (0..n).filter(|&i| !self.coverage.row(i)) {
            for j in (0..n).filter(|&j| !self.coverage.col(j)) {
                if self.matrix.get(i, j) == 0.0 {
                    self.matching.prepare(i, j);
                    return Some((i, j));
                }
            }
        }
        None
    }

    fn adjust_potentials(&mut self) -> Result<(), AssignError> {
        match self.matrix.adjust_potentials(&self.coverage) {
            Some(_) => {
                self.notify(Phase::AdjustPotentials, None);
                Ok(())
            }
            None => Err(AssignError::NoUncoveredCell {
                context: self.context(Phase::AdjustPotentials),
            }),
        }
    }

    /// Build the alternating path from the prepared zero at (row, col),
    /// snapshot it, then flip it and re-establish coverage.
    fn build_path(&mut self, row: usize, col: usize) {
        let path = AlternatingPath::build(row, col, &self.matching);
        self.notify(Phase::BuildPath, Some(&path));

        path.flip(&mut self.matching);
        self.matching.clear_prepared();
        self.coverage.reset_from(&self.matching);
    }

    fn finish(&self) -> Result<Assignment, AssignError> {
        let n = self.matrix.n();
        let mut targets = Vec::with_capacity(n);
        let mut total_cost = 0.0;
        for row in 0..n {
            let col = self
                .matching
                .selected_col(row)
                .ok_or_else(|| self.unmatched_row(row, Phase::Optimal))?;
            targets.push(col);
            total_cost += self.original[row * n + col];
        }
        Ok(Assignment {
            targets,
            total_cost,
        })
    }

    fn notify(&mut self, phase: Phase, path: Option<&AlternatingPath>) {
        let snapshot = StepSnapshot {
            phase,
            n: self.matrix.n(),
            grid: self.matrix.cells(),
            covered_rows: self.coverage.rows(),
            covered_cols: self.coverage.cols(),
            selected_in_row: self.matching.selected_in_row(),
            prepared_in_row: self.matching.prepared_in_row(),
            path,
        };
        self.observer.on_step(&snapshot);
    }

    fn unmatched_row(&self, row: usize, phase: Phase) -> AssignError {
        AssignError::UnmatchedRow {
            row,
            context: self.context(phase),
        }
    }

    fn context(&self, phase: Phase) -> Box<SolveContext> {
        Box::new(SolveContext {
            phase,
            n: self.matrix.n(),
            grid: self.matrix.cells().to_vec(),
            covered_rows: self.coverage.rows().to_vec(),
            covered_cols: self.coverage.cols().to_vec(),
            selected_in_row: self.matching.selected_in_row().to_vec(),
            prepared_in_row: self.matching.prepared_in_row().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cell_grid_assigns_trivially() {
        let assignment = solve(&[vec![5.0]]).unwrap();
        assert_eq!(assignment.targets(), &[0]);
        assert_eq!(assignment.total_cost(), 5.0);
    }

    #[test]
    fn two_by_two_picks_the_cheap_diagonal() {
        let assignment = solve(&[vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
        assert_eq!(assignment.targets(), &[0, 1]);
        assert_eq!(assignment.total_cost(), 2.0);
    }

    #[test]
    fn uniform_grid_yields_some_bijection() {
        let assignment = solve(&[vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let mut seen = [false; 2];
        for (_, col) in assignment.pairs() {
            assert!(!seen[col]);
            seen[col] = true;
        }
        assert_eq!(assignment.total_cost(), 2.0);
    }

    #[test]
    fn deficient_greedy_start_is_repaired() {
        // Duplicated rows leave the greedy selection incomplete; the
        // augmenting machinery has to finish the matching.
        let grid = vec![
            vec![6.0, 4.0, 5.0, 3.0],
            vec![6.0, 4.0, 3.0, 5.0],
            vec![6.0, 4.0, 5.0, 3.0],
            vec![6.0, 4.0, 5.0, 3.0],
        ];
        let assignment = solve(&grid).unwrap();
        assert_eq!(assignment.total_cost(), 16.0);

        let mut seen = [false; 4];
        for (_, col) in assignment.pairs() {
            assert!(!seen[col]);
            seen[col] = true;
        }
    }

    #[test]
    fn assignment_reports_original_costs_not_reduced_ones() {
        // After reduction the grid is mostly zeros; the reported total must
        // come from the caller's values.
        let grid = vec![vec![10.0, 20.0], vec![20.0, 10.0]];
        let assignment = solve(&grid).unwrap();
        assert_eq!(assignment.total_cost(), 20.0);
    }

    #[test]
    fn ragged_input_fails_before_solving() {
        let err = solve(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap_err();
        assert!(err.is_dimension_error());
    }
}
