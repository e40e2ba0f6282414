//! Pairwise cost-grid construction.
//!
//! Upstream of the solver, a cost grid is scored cell by cell: entry
//! (i, j) is the score between reference `i` and slot `j`, the lower the
//! better. Rows are independent, so construction can fan out one worker
//! per row; the parallel path writes disjoint output rows and joins before
//! returning, so the grid handed to the solver is fully populated and
//! stable. Parallelism is a runtime flag, not a compile-time feature.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for cost-grid construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CostsConfig {
    /// Score rows in parallel with one rayon task per row (default false).
    pub use_parallel: bool,
}

impl Default for CostsConfig {
    fn default() -> Self {
        Self {
            use_parallel: false,
        }
    }
}

/// Score every (reference, slot) pair into a dense grid, row i holding
/// reference i against every slot.
///
/// The output has `refs.len()` rows of `slots.len()` entries; the solver
/// requires both to be equal, but that is enforced at solve time so this
/// builder can also feed non-square consumers.
pub fn build_cost_grid<R, S, F>(refs: &[R], slots: &[S], score: F, cfg: &CostsConfig) -> Vec<Vec<f64>>
where
    R: Sync,
    S: Sync,
    F: Fn(&R, &S) -> f64 + Sync,
{
    let score_row = |r: &R| -> Vec<f64> { slots.iter().map(|s| score(r, s)).collect() };

    if cfg.use_parallel {
        refs.par_iter().map(score_row).collect()
    } else {
        refs.iter().map(score_row).collect()
    }
}

/// Euclidean distance between two mean-channel triples, the reference
/// scorer for comparing image tiles by average color.
pub fn mean_rgb_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    (d0 * d0 + d1 * d1 + d2 * d2).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_shape_follows_refs_and_slots() {
        let refs = vec![1.0_f64, 2.0, 3.0];
        let slots = vec![10.0_f64, 20.0];
        let grid = build_cost_grid(
            &refs,
            &slots,
            |r, s| (r - s).abs(),
            &CostsConfig::default(),
        );
        assert_eq!(grid.len(), 3);
        assert!(grid.iter().all(|row| row.len() == 2));
        assert_eq!(grid[0], vec![9.0, 19.0]);
        assert_eq!(grid[2], vec![7.0, 17.0]);
    }

    #[test]
    fn parallel_and_sequential_grids_match() {
        let refs: Vec<f64> = (0..32).map(|i| i as f64).collect();
        let slots: Vec<f64> = (0..32).map(|i| (i * 3) as f64).collect();

        let sequential = build_cost_grid(
            &refs,
            &slots,
            |r, s| (r - s).abs(),
            &CostsConfig {
                use_parallel: false,
            },
        );
        let parallel = build_cost_grid(
            &refs,
            &slots,
            |r, s| (r - s).abs(),
            &CostsConfig { use_parallel: true },
        );
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn mean_rgb_distance_is_the_euclidean_norm() {
        let a = [10.0, 20.0, 30.0];
        let b = [10.0, 24.0, 33.0];
        assert_eq!(mean_rgb_distance(a, b), 5.0);
        assert_eq!(mean_rgb_distance(a, a), 0.0);
    }
}
