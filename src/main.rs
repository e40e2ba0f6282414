//! Demo binary: solves a handful of assignment grids with step logging
//! enabled and prints the resulting assignments.
//!
//! Run with `RUST_LOG=debug cargo run` to see one structured event per
//! solver state transition.

use std::error::Error;

use tracing_subscriber::EnvFilter;

use optassign::{solve_with_observer, TraceObserver};

/// 6×6 grid of shuffled {3..8} rows, deterministic across runs.
fn shuffled_grid(size: usize, mut seed: u64) -> Vec<Vec<f64>> {
    let mut grid = Vec::with_capacity(size);
    for _ in 0..size {
        let mut row: Vec<f64> = (0..size).map(|v| (v + 3) as f64).collect();
        // Fisher-Yates driven by splitmix64.
        for k in (1..row.len()).rev() {
            seed = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = seed;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^= z >> 31;
            row.swap(k, (z % (k as u64 + 1)) as usize);
        }
        grid.push(row);
    }
    grid
}

fn demo(name: &str, grid: &[Vec<f64>]) -> Result<(), Box<dyn Error>> {
    println!("== {name} ==");
    for row in grid {
        println!("  {row:?}");
    }

    let mut observer = TraceObserver;
    let assignment = solve_with_observer(grid, &mut observer)?;

    for (row, col) in assignment.pairs() {
        println!("  row {row} -> col {col} (cost {})", grid[row][col]);
    }
    println!("  total cost: {}\n", assignment.total_cost());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    demo("shuffled 6x6", &shuffled_grid(6, 0xF00D_BAAD))?;

    // Degenerate grids: duplicated rows defeat the greedy start and force
    // the augmenting machinery to finish the matching.
    demo(
        "duplicated rows 4x4",
        &[
            vec![6.0, 4.0, 5.0, 3.0],
            vec![6.0, 4.0, 3.0, 5.0],
            vec![6.0, 4.0, 5.0, 3.0],
            vec![6.0, 4.0, 5.0, 3.0],
        ],
    )?;
    demo(
        "permuted rows 4x4",
        &[
            vec![5.0, 4.0, 6.0, 3.0],
            vec![3.0, 4.0, 6.0, 5.0],
            vec![3.0, 4.0, 5.0, 6.0],
            vec![5.0, 4.0, 3.0, 6.0],
        ],
    )?;

    Ok(())
}
