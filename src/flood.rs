use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::coord::Coord2;
use crate::grid::Grid;
use crate::terrain::TerrainCell;

#[derive(Clone, Debug)]
pub struct FloodResult {
    /// Member cells in breadth-first discovery order, starting with the seed.
    pub cells: Vec<Coord2>,
    pub visited: Grid<bool>,
}

/// Breadth-first fill over the 8-neighborhood. Returns `None` when `start` lies
/// outside the grid; an empty result when `start` itself is not a member.
pub fn flood_fill<T, F>(grid: &Grid<T>, start: Coord2, mut is_member: F) -> Option<FloodResult>
where
    F: FnMut(Coord2) -> bool,
{
    if !grid.in_bounds(start) {
        return None;
    }

    let mut visited = Grid::new_filled(grid.width(), grid.height(), false);
    let mut cells = Vec::new();

    if !is_member(start) {
        return Some(FloodResult { cells, visited });
    }

    let mut open = VecDeque::new();
    open.push_back(start);
    visited.set(start, true);

    while let Some(current) = open.pop_front() {
        cells.push(current);
        for &next in grid.neighbor_coords(current) {
            if visited.get(next).copied().unwrap_or(true) {
                continue;
            }
            if !is_member(next) {
                continue;
            }
            visited.set(next, true);
            open.push_back(next);
        }
    }

    Some(FloodResult { cells, visited })
}

/// Maximal 8-connected set of cells sharing the terrain of `start`.
pub fn region_tiles<T: TerrainCell>(grid: &Grid<T>, start: Coord2) -> Option<Vec<Coord2>> {
    let terrain = grid.terrain(start)?;
    flood_fill(grid, start, |c| grid.terrain(c) == Some(terrain)).map(|region| region.cells)
}

/// True when every walkable cell can reach every other through walkable 8-neighbors.
pub fn is_connected<T: TerrainCell>(grid: &Grid<T>) -> bool {
    let walkable_total = grid.cells().iter().filter(|c| c.is_walkable()).count();
    if walkable_total <= 1 {
        return true;
    }
    let Some((start, _)) = grid.iter_coords().find(|(_, c)| c.is_walkable()) else {
        return true;
    };
    flood_fill(grid, start, |c| grid.is_walkable(c))
        .is_some_and(|region| region.cells.len() == walkable_total)
}
