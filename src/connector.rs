use alloc::vec::Vec;
use core::cmp::Reverse;

use log::{debug, warn};

use crate::coord::Coord2;
use crate::grid::Grid;
use crate::observer::GenerationObserver;
use crate::region::{Room, RoomId};
use crate::terrain::{TerrainCell, TerrainCost};

/// Straight corridor carved between two rooms.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Passage {
    pub rooms: (RoomId, RoomId),
    pub from: Coord2,
    pub to: Coord2,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionReport {
    pub main_room: RoomId,
    pub passages: Vec<Passage>,
}

#[derive(Copy, Clone, Debug)]
struct Candidate {
    distance: u64,
    room_a: usize,
    room_b: usize,
    tile_a: Coord2,
    tile_b: Coord2,
}

/// Carves passages until every room is reachable from the largest one.
#[derive(Clone, Debug, Default)]
pub struct RoomConnector;

impl RoomConnector {
    pub fn new() -> Self {
        Self
    }

    /// Designates the largest room as main, links every isolated room to its nearest
    /// neighbour, then keeps joining the closest inaccessible/accessible pair until
    /// nothing is left unreachable. Returns `None` when `rooms` is empty.
    pub fn connect<T: TerrainCell>(
        &self,
        grid: &mut Grid<T>,
        rooms: &mut [Room],
        observer: &mut dyn GenerationObserver,
    ) -> Option<ConnectionReport> {
        let main = rooms
            .iter()
            .enumerate()
            .min_by_key(|(_, room)| Reverse(room.size()))
            .map(|(index, _)| index)?;
        rooms[main].mark_main();

        let mut passages = Vec::new();

        let everyone: Vec<usize> = (0..rooms.len()).collect();
        for a in 0..rooms.len() {
            if !rooms[a].neighbour_rooms().is_empty() {
                continue;
            }
            if let Some(best) = closest_pair(rooms, &[a], &everyone) {
                passages.push(join(grid, rooms, best, observer));
            }
        }

        loop {
            let (inaccessible, accessible): (Vec<usize>, Vec<usize>) =
                (0..rooms.len()).partition(|&i| !rooms[i].is_accessible_from_main());
            if inaccessible.is_empty() {
                break;
            }
            match closest_pair(rooms, &inaccessible, &accessible) {
                Some(best) => passages.push(join(grid, rooms, best, observer)),
                None => {
                    warn!(
                        "{} rooms could not be joined to the main room",
                        inaccessible.len()
                    );
                    break;
                }
            }
        }

        debug!(
            "connected {} rooms with {} passages",
            rooms.len(),
            passages.len()
        );
        Some(ConnectionReport {
            main_room: rooms[main].id(),
            passages,
        })
    }
}

/// Nearest pair of connection tiles by squared distance, with `a` drawn from `from`
/// and `b` from `to`. Pairs that are the same room or already linked are skipped.
fn closest_pair(rooms: &[Room], from: &[usize], to: &[usize]) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for &a in from {
        for &b in to {
            if a == b || rooms[a].is_connected_to(rooms[b].id()) {
                continue;
            }
            for &tile_a in rooms[a].connection_tiles() {
                for &tile_b in rooms[b].connection_tiles() {
                    let distance = tile_a.squared_distance(tile_b);
                    if best.map_or(true, |current| distance < current.distance) {
                        best = Some(Candidate {
                            distance,
                            room_a: a,
                            room_b: b,
                            tile_a,
                            tile_b,
                        });
                    }
                }
            }
        }
    }
    best
}

fn join<T: TerrainCell>(
    grid: &mut Grid<T>,
    rooms: &mut [Room],
    best: Candidate,
    observer: &mut dyn GenerationObserver,
) -> Passage {
    debug!(
        "connecting room tiles [{}:{}] => [{}:{}]",
        best.tile_a.x, best.tile_a.y, best.tile_b.x, best.tile_b.y
    );
    carve_passage(grid, best.tile_a, best.tile_b);
    observer.on_passage_carved(best.tile_a, best.tile_b);
    link_rooms(rooms, best.room_a, best.room_b);
    Passage {
        rooms: (rooms[best.room_a].id(), rooms[best.room_b].id()),
        from: best.tile_a,
        to: best.tile_b,
    }
}

/// Links the rooms at positions `a` and `b` both ways. If either side is reachable
/// from the main room, the other side and everything already linked to it become
/// reachable too.
pub(crate) fn link_rooms(rooms: &mut [Room], a: usize, b: usize) {
    if rooms[a].is_accessible_from_main() {
        mark_accessible(rooms, b);
    } else if rooms[b].is_accessible_from_main() {
        mark_accessible(rooms, a);
    }
    let (id_a, id_b) = (rooms[a].id(), rooms[b].id());
    rooms[a].add_neighbour(id_b);
    rooms[b].add_neighbour(id_a);
}

fn mark_accessible(rooms: &mut [Room], start: usize) {
    let mut stack = alloc::vec![start];
    while let Some(index) = stack.pop() {
        if rooms[index].mark_accessible() {
            stack.extend(
                rooms[index]
                    .neighbour_rooms()
                    .iter()
                    .filter_map(|&id| index_of(rooms, id)),
            );
        }
    }
}

fn index_of(rooms: &[Room], id: RoomId) -> Option<usize> {
    match rooms.get(id.0) {
        Some(room) if room.id() == id => Some(id.0),
        _ => rooms.iter().position(|room| room.id() == id),
    }
}

/// Carves an Easy straight line from `from` to `to`, both ends included.
///
/// The line has one point per step of Chebyshev distance, so consecutive points
/// are always 8-adjacent. Terrain along the way is overwritten regardless of cost.
pub fn carve_passage<T: TerrainCell>(grid: &mut Grid<T>, from: Coord2, to: Coord2) -> Vec<Coord2> {
    let steps = from.chebyshev_distance(to);
    let mut line = Vec::with_capacity(steps as usize + 1);
    for step in 0..=steps {
        let t = if steps == 0 {
            0.0
        } else {
            step as f32 / steps as f32
        };
        let point = Coord2::new(lerp_round(from.x, to.x, t), lerp_round(from.y, to.y, t));
        grid.set_terrain(point, TerrainCost::Easy);
        line.push(point);
    }
    line
}

#[inline]
fn lerp_round(a: i32, b: i32, t: f32) -> i32 {
    libm::roundf(a as f32 + (b - a) as f32 * t) as i32
}

/// True when every room can be reached from `main` by following neighbour links.
pub fn is_fully_connected(rooms: &[Room], main: RoomId) -> bool {
    if rooms.is_empty() {
        return true;
    }
    let Some(start) = index_of(rooms, main) else {
        return false;
    };
    let mut seen = alloc::vec![false; rooms.len()];
    let mut stack = alloc::vec![start];
    seen[start] = true;
    while let Some(index) = stack.pop() {
        for neighbour in rooms[index].neighbour_rooms() {
            let Some(next) = index_of(rooms, *neighbour) else {
                continue;
            };
            if !seen[next] {
                seen[next] = true;
                stack.push(next);
            }
        }
    }
    seen.into_iter().all(|reached| reached)
}
