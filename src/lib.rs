//! optassign: exact minimum-cost assignment.
//!
//! An exact solver for the square assignment problem (Kuhn-Munkres, the
//! "Hungarian" method): given an n×n grid of real-valued costs, find the
//! permutation of rows to columns minimizing the total cost. The result is
//! optimal by construction, not a heuristic.
//!
//! ## What's inside
//!
//! - **Solver** - [`solve`] / [`solve_with_observer`] run the multi-phase
//!   state machine (reduction, greedy initial selection, repeated
//!   search / cover / augment / adjust cycles) and return an
//!   [`Assignment`]: the row→column bijection plus the realized total
//!   against the original costs.
//! - **Instrumentation** - a [`StepObserver`] is notified after every state
//!   transition with a read-only [`StepSnapshot`]. Shipped sinks:
//!   [`TraceObserver`] (structured logs), [`StepRecorder`] (owned step
//!   history), [`HtmlReportObserver`] (one HTML table per step on disk).
//!   Observers never influence the result.
//! - **Cost-grid construction** - [`build_cost_grid`] scores every
//!   (reference, slot) pair with a caller-supplied function, sequentially
//!   or one worker per row ([`CostsConfig::use_parallel`]).
//! - **Typed errors** - [`AssignError`] splits malformed input shape from
//!   violated internal invariants; invariant failures carry a
//!   [`SolveContext`] snapshot for diagnosis.
//!
//! The solve itself is single-threaded and fully deterministic: calling it
//! twice on the same input yields identical results.
//!
//! ## Example
//!
//! ```
//! use optassign::solve;
//!
//! let grid = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
//! let assignment = solve(&grid).unwrap();
//!
//! assert_eq!(assignment.targets(), &[0, 1]);
//! assert_eq!(assignment.total_cost(), 2.0);
//! ```
//!
//! Or build the grid from pairwise scores first:
//!
//! ```
//! use optassign::{assign_by_score, CostsConfig};
//!
//! let refs = vec![0.0_f64, 10.0];
//! let slots = vec![9.0_f64, 1.0];
//! let assignment =
//!     assign_by_score(&refs, &slots, |r, s| (r - s).abs(), &CostsConfig::default()).unwrap();
//!
//! // Reference 0 lands on the slot at 1.0, reference 10 on the slot at 9.0.
//! assert_eq!(assignment.targets(), &[1, 0]);
//! ```

mod costs;
mod error;
mod matrix;
mod observer;
mod path;
mod report;
mod solver;
mod state;

pub use crate::costs::{build_cost_grid, mean_rgb_distance, CostsConfig};
pub use crate::error::{AssignError, SolveContext};
pub use crate::observer::{
    NoopObserver, Phase, RecordedStep, StepObserver, StepRecorder, StepSnapshot, TraceObserver,
};
pub use crate::path::AlternatingPath;
pub use crate::report::HtmlReportObserver;
pub use crate::solver::{solve, solve_with_observer, Assignment};

/// Score every (reference, slot) pair and solve the resulting grid in one
/// call.
///
/// Requires equally many references and slots; the grid construction obeys
/// `cfg` (sequential or worker-per-row), the solve is always
/// single-threaded.
pub fn assign_by_score<R, S, F>(
    refs: &[R],
    slots: &[S],
    score: F,
    cfg: &CostsConfig,
) -> Result<Assignment, AssignError>
where
    R: Sync,
    S: Sync,
    F: Fn(&R, &S) -> f64 + Sync,
{
    let grid = build_cost_grid(refs, slots, score, cfg);
    solve(&grid)
}
