use alloc::vec::Vec;
use core::cmp::Ordering;

use log::{debug, trace};

use crate::coord::Coord2;
use crate::grid::Grid;
use crate::observer::{NoOpPathfindObserver, PathfindObserver};
use crate::priority_queue::PriorityQueue;
use crate::terrain::{TerrainCell, TerrainCost};

/// Heuristic inflation. Scaling the octile estimate by `1 + EPSILON` makes the
/// search prefer nodes closer to the goal when f-scores tie, trading strict
/// admissibility for fewer expansions.
pub const HEURISTIC_EPSILON: f32 = 0.001;

/// Octile distance between two coordinates.
#[inline]
pub fn heuristic(from: Coord2, to: Coord2) -> f32 {
    from.octile_distance(to)
}

/// Result of a pathfinding search. Immutable once produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    steps: Vec<Coord2>,
    cost: u32,
    nodes_visited: usize,
}

impl Path {
    /// Coordinates from start to goal, both included.
    #[inline]
    pub fn steps(&self) -> &[Coord2] {
        &self.steps
    }

    /// Sum of the terrain costs of every cell entered after the start.
    #[inline]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Number of distinct cells that received a cost during the search.
    #[inline]
    pub fn nodes_visited(&self) -> usize {
        self.nodes_visited
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[inline]
    pub fn start(&self) -> Option<Coord2> {
        self.steps.first().copied()
    }

    #[inline]
    pub fn goal(&self) -> Option<Coord2> {
        self.steps.last().copied()
    }

    /// The cells along the path, read from `grid`.
    pub fn cells<'g, T>(&self, grid: &'g Grid<T>) -> Vec<&'g T> {
        self.steps.iter().filter_map(|&c| grid.get(c)).collect()
    }

    pub fn into_steps(self) -> Vec<Coord2> {
        self.steps
    }
}

/// Open-set entry ordered by f-score, then by terrain cost so cheaper ground wins ties.
#[derive(Copy, Clone, Debug)]
struct OpenNode {
    f_score: f32,
    terrain: TerrainCost,
    g_score: u32,
    index: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .total_cmp(&other.f_score)
            .then_with(|| self.terrain.cmp(&other.terrain))
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

const NONE_INDEX: usize = usize::MAX;

/// Per-search bookkeeping, dropped when the search returns.
struct SearchState {
    cost_so_far: Vec<u32>,
    came_from: Vec<usize>,
    open: PriorityQueue<OpenNode>,
}

impl SearchState {
    fn new(size: usize) -> Self {
        Self {
            cost_so_far: alloc::vec![u32::MAX; size],
            came_from: alloc::vec![NONE_INDEX; size],
            open: PriorityQueue::with_capacity(size),
        }
    }
}

/// Lowest-cost 8-directional path from `start` to `goal`.
///
/// Entering a cell costs its terrain value; NotWalkable cells are never entered.
/// Returns `None` when either end lies outside the grid, the goal is NotWalkable,
/// or the goal cannot be reached.
pub fn find_path<T: TerrainCell>(grid: &Grid<T>, start: Coord2, goal: Coord2) -> Option<Path> {
    find_path_observed(grid, start, goal, &mut NoOpPathfindObserver)
}

pub fn find_path_observed<T: TerrainCell>(
    grid: &Grid<T>,
    start: Coord2,
    goal: Coord2,
    observer: &mut impl PathfindObserver,
) -> Option<Path> {
    let (Some(start_idx), Some(goal_idx)) = (grid.coord_to_index(start), grid.coord_to_index(goal))
    else {
        debug!("pathfind: endpoints {start:?} -> {goal:?} outside the grid");
        observer.on_no_path();
        return None;
    };
    if !grid.is_walkable(goal) {
        debug!("pathfind: goal {goal:?} is not walkable");
        observer.on_no_path();
        return None;
    }

    let mut state = SearchState::new(grid.len());
    state.cost_so_far[start_idx] = 0;
    state.open.push(OpenNode {
        f_score: 0.0,
        terrain: grid.cells()[start_idx].terrain(),
        g_score: 0,
        index: start_idx,
    });

    let mut expanded = 0usize;
    while let Some(node) = state.open.pop() {
        if node.g_score > state.cost_so_far[node.index] {
            continue;
        }
        if node.index == goal_idx {
            let steps = reconstruct_path(grid, &state.came_from, start_idx, goal_idx);
            let cost: u32 = steps
                .iter()
                .skip(1)
                .filter_map(|&c| grid.terrain(c).and_then(TerrainCost::step_cost))
                .sum();
            let nodes_visited = state.cost_so_far.iter().filter(|&&c| c != u32::MAX).count();
            trace!("pathfind: expanded {expanded} nodes, visited {nodes_visited}");
            debug!(
                "pathfind: {} steps from {start:?} to {goal:?}, cost {cost}",
                steps.len()
            );
            observer.on_path_found(&steps, cost);
            return Some(Path {
                steps,
                cost,
                nodes_visited,
            });
        }

        expanded += 1;
        let current = grid.index_to_coord(node.index);
        observer.on_expand(current, node.g_score, node.f_score);

        for &neighbor in grid.neighbor_coords(current) {
            let Some(neighbor_idx) = grid.coord_to_index(neighbor) else {
                continue;
            };
            let terrain = grid.cells()[neighbor_idx].terrain();
            let Some(step) = terrain.step_cost() else {
                continue;
            };
            let new_cost = node.g_score.saturating_add(step);
            if new_cost < state.cost_so_far[neighbor_idx] {
                state.cost_so_far[neighbor_idx] = new_cost;
                state.came_from[neighbor_idx] = node.index;
                let h = heuristic(neighbor, goal) * (1.0 + HEURISTIC_EPSILON);
                state.open.push(OpenNode {
                    f_score: new_cost as f32 + h,
                    terrain,
                    g_score: new_cost,
                    index: neighbor_idx,
                });
            }
        }
    }

    debug!("pathfind: no path from {start:?} to {goal:?} after {expanded} expansions");
    observer.on_no_path();
    None
}

fn reconstruct_path<T>(
    grid: &Grid<T>,
    came_from: &[usize],
    start_idx: usize,
    goal_idx: usize,
) -> Vec<Coord2> {
    let mut reverse = Vec::new();
    let mut current = goal_idx;
    reverse.push(grid.index_to_coord(current));

    while current != start_idx {
        let parent = came_from[current];
        if parent == NONE_INDEX {
            break;
        }
        current = parent;
        reverse.push(grid.index_to_coord(current));
    }
    reverse.reverse();
    reverse
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(path: &Path, start: Coord2, goal: Coord2) {
        assert_eq!(path.start(), Some(start));
        assert_eq!(path.goal(), Some(goal));
        for pair in path.steps().windows(2) {
            assert!(pair[0].is_adjacent8(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn astar_straight_line() {
        let g = Grid::new_filled(5, 1, TerrainCost::Easy);
        let path = find_path(&g, Coord2::new(0, 0), Coord2::new(4, 0)).unwrap();
        assert_valid(&path, Coord2::new(0, 0), Coord2::new(4, 0));
        assert_eq!(path.len(), 5);
        assert_eq!(path.cost(), 4);
    }

    #[test]
    fn astar_diagonal_on_uniform_grid() {
        let g = Grid::new_filled(5, 5, TerrainCost::Easy);
        let path = find_path(&g, Coord2::new(0, 0), Coord2::new(4, 4)).unwrap();
        assert_valid(&path, Coord2::new(0, 0), Coord2::new(4, 4));
        assert_eq!(path.len(), 5);
        assert_eq!(path.cost(), 4);
    }

    #[test]
    fn astar_around_wall() {
        let mut g = Grid::new_filled(5, 5, TerrainCost::Easy);
        g.set(Coord2::new(2, 1), TerrainCost::NotWalkable);
        g.set(Coord2::new(2, 2), TerrainCost::NotWalkable);
        g.set(Coord2::new(2, 3), TerrainCost::NotWalkable);
        let path = find_path(&g, Coord2::new(0, 2), Coord2::new(4, 2)).unwrap();
        assert_valid(&path, Coord2::new(0, 2), Coord2::new(4, 2));
        assert!(path.steps().iter().all(|&c| g.is_walkable(c)));
    }

    #[test]
    fn astar_goal_not_walkable() {
        let mut g = Grid::new_filled(3, 3, TerrainCost::Easy);
        g.set(Coord2::new(2, 2), TerrainCost::NotWalkable);
        assert!(find_path(&g, Coord2::new(0, 0), Coord2::new(2, 2)).is_none());
    }

    #[test]
    fn astar_blocked_row() {
        let mut g = Grid::new_filled(5, 5, TerrainCost::Easy);
        for x in 0..5 {
            g.set(Coord2::new(x, 2), TerrainCost::NotWalkable);
        }
        assert!(find_path(&g, Coord2::new(0, 0), Coord2::new(4, 4)).is_none());
    }

    #[test]
    fn astar_outside_grid() {
        let g = Grid::new_filled(3, 3, TerrainCost::Easy);
        assert!(find_path(&g, Coord2::new(-1, 0), Coord2::new(2, 2)).is_none());
        assert!(find_path(&g, Coord2::new(0, 0), Coord2::new(3, 2)).is_none());
    }

    #[test]
    fn astar_start_is_goal() {
        let g = Grid::new_filled(2, 2, TerrainCost::Easy);
        let path = find_path(&g, Coord2::new(1, 1), Coord2::new(1, 1)).unwrap();
        assert_eq!(path.cost(), 0);
        assert_eq!(path.steps(), &[Coord2::new(1, 1)]);
    }

    #[test]
    fn astar_prefers_cheap_terrain() {
        // Hard band across the middle with one Easy gap at the far side.
        let mut g = Grid::new_filled(7, 5, TerrainCost::Easy);
        for x in 0..6 {
            g.set(Coord2::new(x, 2), TerrainCost::Hard);
        }
        let path = find_path(&g, Coord2::new(0, 0), Coord2::new(0, 4)).unwrap();
        assert_valid(&path, Coord2::new(0, 0), Coord2::new(0, 4));
        // Straight through the Hard band costs 1 + 3 + 1 + 1; the detour via the gap costs 12.
        assert_eq!(path.cost(), 6);
        assert_eq!(path.len(), 5);

        let mut g = Grid::new_filled(7, 5, TerrainCost::Easy);
        for x in 1..7 {
            g.set(Coord2::new(x, 2), TerrainCost::Hard);
        }
        let path = find_path(&g, Coord2::new(1, 0), Coord2::new(1, 4)).unwrap();
        assert_eq!(path.cost(), 4);
        assert!(path.steps().contains(&Coord2::new(0, 2)));
    }

    #[test]
    fn astar_cells_follow_steps() {
        let g = Grid::new_filled(4, 4, TerrainCost::Medium);
        let path = find_path(&g, Coord2::new(0, 0), Coord2::new(3, 0)).unwrap();
        let cells = path.cells(&g);
        assert_eq!(cells.len(), path.len());
        assert!(cells.iter().all(|t| **t == TerrainCost::Medium));
        assert_eq!(path.cost(), 6);
    }

    #[test]
    fn astar_repeated_searches_are_independent() {
        let g = Grid::new_filled(6, 6, TerrainCost::Easy);
        let first = find_path(&g, Coord2::new(0, 0), Coord2::new(5, 3)).unwrap();
        let second = find_path(&g, Coord2::new(0, 0), Coord2::new(5, 3)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn astar_observer_events() {
        #[derive(Default)]
        struct Recorder {
            expanded: usize,
            found: Option<u32>,
            failed: bool,
        }
        impl PathfindObserver for Recorder {
            fn on_expand(&mut self, _coord: Coord2, _g: u32, _f: f32) {
                self.expanded += 1;
            }
            fn on_path_found(&mut self, _path: &[Coord2], cost: u32) {
                self.found = Some(cost);
            }
            fn on_no_path(&mut self) {
                self.failed = true;
            }
        }

        let g = Grid::new_filled(4, 4, TerrainCost::Easy);
        let mut rec = Recorder::default();
        find_path_observed(&g, Coord2::new(0, 0), Coord2::new(3, 3), &mut rec).unwrap();
        assert!(rec.expanded > 0);
        assert_eq!(rec.found, Some(3));
        assert!(!rec.failed);

        let mut rec = Recorder::default();
        let mut blocked = Grid::new_filled(4, 4, TerrainCost::Easy);
        blocked.set(Coord2::new(3, 3), TerrainCost::NotWalkable);
        assert!(find_path_observed(&blocked, Coord2::new(0, 0), Coord2::new(3, 3), &mut rec).is_none());
        assert!(rec.failed);
    }

    #[test]
    fn open_node_tie_breaks_on_terrain() {
        let cheap = OpenNode {
            f_score: 2.0,
            terrain: TerrainCost::Easy,
            g_score: 1,
            index: 9,
        };
        let dear = OpenNode {
            f_score: 2.0,
            terrain: TerrainCost::Hard,
            g_score: 1,
            index: 0,
        };
        let mut queue: PriorityQueue<OpenNode> = [dear, cheap].into_iter().collect();
        assert_eq!(queue.pop().map(|n| n.terrain), Some(TerrainCost::Easy));
    }
}
