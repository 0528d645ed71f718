use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::{Cell, Grid};

/// Picks food cells uniformly from the free part of the board.
///
/// Sampling goes straight over the complement of the occupied set, so every
/// call finishes in time proportional to the board size.
#[derive(Debug, Clone)]
pub struct FoodPlacer {
    grid: Grid,
    rng: StdRng,
}

impl FoodPlacer {
    /// Creates a placer seeded from OS entropy.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a deterministic placer for tests and reproducible runs.
    #[must_use]
    pub fn with_seed(grid: Grid, seed: u64) -> Self {
        Self {
            grid,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns a random cell not in `occupied`, or `None` when the board is full.
    pub fn place(&mut self, occupied: &HashSet<Cell>) -> Option<Cell> {
        free_cell(&mut self.rng, self.grid, occupied)
    }
}

/// Picks a uniformly random cell of `grid` outside `occupied`.
pub fn free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    grid: Grid,
    occupied: &HashSet<Cell>,
) -> Option<Cell> {
    let candidates: Vec<Cell> = grid
        .cells()
        .filter(|cell| !occupied.contains(cell))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}
