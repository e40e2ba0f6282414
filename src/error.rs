//! Error types produced by the assignment solver.
//!
//! All errors are typed so callers can handle specific cases precisely.
//! The surface splits into two categories:
//!
//! - **Dimension errors** - malformed input (empty or ragged grid), detected
//!   and returned before any mutation begins.
//! - **Internal-invariant errors** - an algorithmic precondition expected to
//!   hold was violated at runtime. These indicate either a defect or a
//!   pathological input (such as non-finite costs) and carry a
//!   [`SolveContext`] snapshot so the failure can be diagnosed. They are
//!   surfaced to the caller, never converted into silent incorrect output.
//!
//! No errors are retried internally: the solver is deterministic, and
//! retrying with the same input yields the same outcome.

use serde::Serialize;
use thiserror::Error;

use crate::observer::Phase;

/// Diagnostic snapshot attached to internal-invariant failures.
///
/// Captures the solver state at the moment the invariant broke: the phase
/// being executed, the (mutated) cost grid, coverage flags, and the
/// selected/prepared zero maps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveContext {
    /// Phase the solver was in when the invariant failed.
    pub phase: Phase,
    /// Grid side length.
    pub n: usize,
    /// Row-major copy of the cost grid at failure time.
    pub grid: Vec<f64>,
    pub covered_rows: Vec<bool>,
    pub covered_cols: Vec<bool>,
    pub selected_in_row: Vec<Option<usize>>,
    pub prepared_in_row: Vec<Option<usize>>,
}

/// Errors that can occur while solving an assignment problem.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AssignError {
    /// The cost grid has no rows.
    #[error("cost grid is empty")]
    EmptyGrid,

    /// A row's length differs from the number of rows.
    #[error("cost grid row {row} has {len} entries, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// A cost entry is NaN or infinite. Rejected up front: a non-finite
    /// value would corrupt every minimum search silently.
    #[error("cost at ({row}, {col}) is not finite: {value}")]
    NonFiniteCost { row: usize, col: usize, value: f64 },

    /// Potential adjustment found no cell with both row and column
    /// uncovered.
    #[error("potential adjustment found no uncovered cell (phase {:?})", .context.phase)]
    NoUncoveredCell { context: Box<SolveContext> },

    /// A row ended up with no assignable zero, either during the greedy
    /// initial selection or when extracting the final assignment.
    #[error("row {row} has no assignable zero (phase {:?})", .context.phase)]
    UnmatchedRow {
        row: usize,
        context: Box<SolveContext>,
    },
}

impl AssignError {
    /// Returns true if this error reports malformed input shape.
    ///
    /// Dimension errors are detected before the solver mutates anything, so
    /// the caller's grid is untouched when one is returned.
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, AssignError::EmptyGrid | AssignError::RaggedRow { .. })
    }

    /// Returns true if this error reports a violated algorithmic invariant.
    pub fn is_invariant_error(&self) -> bool {
        !self.is_dimension_error()
    }

    /// The diagnostic snapshot carried by invariant errors, if any.
    pub fn context(&self) -> Option<&SolveContext> {
        match self {
            AssignError::NoUncoveredCell { context } => Some(context),
            AssignError::UnmatchedRow { context, .. } => Some(context),
            _ => None,
        }
    }
}
