//! The mutable n×n cost grid and its numeric operations.
//!
//! [`CostMatrix`] owns the grid for the duration of a solve. Two operations
//! mutate it: the initial row/column minimum reduction and the repeated
//! potential adjustment. Both preserve the optimal assignment (costs shift
//! by a constant per row/column) and re-establish the core invariant: every
//! entry non-negative, every row and column holding at least one exact zero.
//!
//! Adjustment targets are collected as (row, col) index pairs and resolved
//! against the owned buffer at application time; the grid never reallocates
//! during a solve.

use std::fmt;

use crate::error::AssignError;
use crate::state::Coverage;

/// Dense row-major n×n matrix of finite costs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CostMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl CostMatrix {
    /// Validates and copies a square grid. Shape errors come back before
    /// anything is allocated; non-finite entries are rejected as invariant
    /// errors per the crate taxonomy.
    pub(crate) fn from_rows(rows: &[Vec<f64>]) -> Result<Self, AssignError> {
        let n = rows.len();
        if n == 0 {
            return Err(AssignError::EmptyGrid);
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(AssignError::RaggedRow {
                    row: i,
                    len: row.len(),
                    expected: n,
                });
            }
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(AssignError::NonFiniteCost {
                        row: i,
                        col: j,
                        value,
                    });
                }
            }
        }

        let mut cells = Vec::with_capacity(n * n);
        for row in rows {
            cells.extend_from_slice(row);
        }
        Ok(Self { n, cells })
    }

    pub(crate) fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub(crate) fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.n + j]
    }

    /// Row-major view of the whole grid, for snapshots.
    pub(crate) fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Subtract each row's minimum from that row, then each column's
    /// minimum from that column. Afterwards every row and column holds at
    /// least one exact zero and no entry is negative.
    pub(crate) fn reduce(&mut self) {
        let n = self.n;
        for i in 0..n {
            let row = &mut self.cells[i * n..(i + 1) * n];
            let min = row.iter().copied().fold(f64::INFINITY, f64::min);
            for value in row {
                *value -= min;
            }
        }
        for j in 0..n {
            let mut min = f64::INFINITY;
            for i in 0..n {
                min = min.min(self.cells[i * n + j]);
            }
            for i in 0..n {
                self.cells[i * n + j] -= min;
            }
        }
    }

    /// Potential adjustment: find the minimum m over cells whose row and
    /// column are both uncovered, subtract m from every such cell, and add
    /// m to every cell whose row and column are both covered. Singly
    /// covered cells are untouched. Returns the applied m, or `None` when
    /// every cell is at least singly covered.
    pub(crate) fn adjust_potentials(&mut self, coverage: &Coverage) -> Option<f64> {
        let n = self.n;
        let mut to_decrement: Vec<(usize, usize)> = Vec::with_capacity(n * n);
        let mut to_increment: Vec<(usize, usize)> = Vec::with_capacity(n);
        for i in 0..n {
            let row_covered = coverage.row(i);
            for j in 0..n {
                let col_covered = coverage.col(j);
                if row_covered && col_covered {
                    to_increment.push((i, j));
                } else if !row_covered && !col_covered {
                    to_decrement.push((i, j));
                }
            }
        }

        if to_decrement.is_empty() {
            return None;
        }
        let min = to_decrement
            .iter()
            .map(|&(i, j)| self.get(i, j))
            .fold(f64::INFINITY, f64::min);

        for &(i, j) in &to_decrement {
            self.cells[i * n + j] -= min;
        }
        for &(i, j) in &to_increment {
            self.cells[i * n + j] += min;
        }
        Some(min)
    }
}

impl fmt::Display for CostMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.n {
            for j in 0..self.n {
                write!(f, "{}, ", self.get(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> CostMatrix {
        let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
        CostMatrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn empty_grid_is_a_dimension_error() {
        let err = CostMatrix::from_rows(&[]).unwrap_err();
        assert_eq!(err, AssignError::EmptyGrid);
    }

    #[test]
    fn ragged_grid_is_a_dimension_error() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0], vec![6.0, 7.0, 8.0]];
        let err = CostMatrix::from_rows(&rows).unwrap_err();
        assert_eq!(
            err,
            AssignError::RaggedRow {
                row: 1,
                len: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn non_finite_cost_is_rejected_up_front() {
        let rows = vec![vec![1.0, 2.0], vec![f64::NAN, 3.0]];
        let err = CostMatrix::from_rows(&rows).unwrap_err();
        assert!(matches!(
            err,
            AssignError::NonFiniteCost { row: 1, col: 0, .. }
        ));
        assert!(err.is_invariant_error());
    }

    #[test]
    fn reduction_leaves_a_zero_in_every_row_and_column() {
        let mut m = matrix(&[&[4.0, 2.0, 8.0], &[4.0, 3.0, 7.0], &[3.0, 1.0, 6.0]]);
        m.reduce();

        for i in 0..3 {
            assert!((0..3).any(|j| m.get(i, j) == 0.0), "row {i} has no zero");
            assert!((0..3).any(|j| m.get(j, i) == 0.0), "col {i} has no zero");
        }
        for i in 0..3 {
            for j in 0..3 {
                assert!(m.get(i, j) >= 0.0);
            }
        }
    }

    #[test]
    fn adjustment_shifts_uncovered_and_doubly_covered_cells() {
        let mut m = matrix(&[&[0.0, 2.0], &[3.0, 5.0]]);
        let mut coverage = Coverage::new(2);
        coverage.set_row(0, true);
        coverage.set_col(0, true);

        // Uncovered region is the single cell (1, 1) = 5; (0, 0) is doubly
        // covered and absorbs the shift.
        let m_applied = m.adjust_potentials(&coverage).unwrap();
        assert_eq!(m_applied, 5.0);
        assert_eq!(m.get(1, 1), 0.0);
        assert_eq!(m.get(0, 0), 5.0);
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.get(1, 0), 3.0);
    }

    #[test]
    fn display_dumps_rows_in_order() {
        let m = matrix(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(m.to_string(), "1, 2, \n3, 4, \n");
    }

    #[test]
    fn adjustment_with_everything_covered_reports_none() {
        let mut m = matrix(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let mut coverage = Coverage::new(2);
        for k in 0..2 {
            coverage.set_row(k, true);
            coverage.set_col(k, true);
        }
        assert_eq!(m.adjust_potentials(&coverage), None);
    }
}
