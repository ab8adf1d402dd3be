use alloc::vec::Vec;

use log::trace;
use rand_core::RngCore;

use crate::coord::Coord2;
use crate::grid::Grid;
use crate::observer::GenerationObserver;
use crate::random::roll_percent;
use crate::terrain::{TerrainCell, TerrainCost};

/// Cellular-automata rule applied during smoothing passes.
///
/// Both rules count neighbors outside the grid as walls, which pulls border cells
/// towards NotWalkable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ruleset {
    /// Majority vote between walls and floor; ties keep the current terrain.
    RandomFill,
    /// Grades open space into Easy, Medium and Hard bands by how enclosed a cell is.
    Rooms,
}

impl Ruleset {
    /// Next terrain for a cell with `present` in-bounds neighbors, `not_walkable` of
    /// which are NotWalkable.
    pub fn apply(self, current: TerrainCost, present: u32, not_walkable: u32) -> TerrainCost {
        let missing = 8u32.saturating_sub(present);
        match self {
            Ruleset::RandomFill => {
                let walls = not_walkable + missing;
                if walls > 4 {
                    TerrainCost::NotWalkable
                } else if walls < 4 {
                    TerrainCost::Easy
                } else {
                    current
                }
            }
            Ruleset::Rooms => {
                let score = 8u32.saturating_sub(not_walkable) + missing;
                if score >= 6 {
                    TerrainCost::Easy
                } else if score >= 4 {
                    TerrainCost::Medium
                } else if score >= 2 {
                    TerrainCost::Hard
                } else if score == 0 {
                    TerrainCost::NotWalkable
                } else {
                    current
                }
            }
        }
    }
}

/// Sets every cell NotWalkable with probability `fill_percent / 100`, Easy otherwise.
pub fn random_fill<T: TerrainCell>(grid: &mut Grid<T>, fill_percent: u32, rng: &mut impl RngCore) {
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let terrain = if roll_percent(rng, fill_percent) {
                TerrainCost::NotWalkable
            } else {
                TerrainCost::Easy
            };
            grid.set_terrain(Coord2::new(x, y), terrain);
        }
    }
}

/// Runs one smoothing pass. The whole next state is computed from the current grid
/// before any cell is written. Returns how many cells changed terrain.
pub fn smooth<T: TerrainCell>(grid: &mut Grid<T>, ruleset: Ruleset) -> usize {
    let next: Vec<TerrainCost> = (0..grid.len())
        .map(|index| {
            let coord = grid.index_to_coord(index);
            let neighbors = grid.neighbor_coords(coord);
            let not_walkable = neighbors
                .iter()
                .filter(|&&n| !grid.is_walkable(n))
                .count() as u32;
            let current = grid.cells()[index].terrain();
            ruleset.apply(current, neighbors.len() as u32, not_walkable)
        })
        .collect();

    let mut changed = 0usize;
    for (index, terrain) in next.into_iter().enumerate() {
        let coord = grid.index_to_coord(index);
        if grid.terrain(coord) != Some(terrain) {
            changed += 1;
        }
        grid.set_terrain(coord, terrain);
    }
    changed
}

pub fn run_smoothing<T: TerrainCell>(
    grid: &mut Grid<T>,
    ruleset: Ruleset,
    iterations: u32,
    observer: &mut dyn GenerationObserver,
) {
    for iteration in 0..iterations {
        let changed = smooth(grid, ruleset);
        trace!("smoothing pass {iteration} ({ruleset:?}) changed {changed} cells");
        observer.on_iteration(iteration);
    }
}
