use alloc::vec::Vec;

use log::debug;

use crate::coord::Coord2;
use crate::flood::region_tiles;
use crate::grid::Grid;
use crate::observer::GenerationObserver;
use crate::terrain::{TerrainCell, TerrainCost};

/// Index of a room within the list produced by [`RegionAnalyzer::analyze`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub usize);

/// Maximal 8-connected set of walkable tiles sharing one terrain cost.
///
/// Tiles are coordinates into the grid the room was extracted from; the room never
/// owns cell data. Only the connection bookkeeping changes after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    terrain: TerrainCost,
    tiles: Vec<Coord2>,
    edge_tiles: Vec<Coord2>,
    neighbour_rooms: Vec<RoomId>,
    is_main_room: bool,
    is_accessible_from_main: bool,
}

impl Room {
    /// Builds a room from its tiles. Edge tiles are the ones touching at least one
    /// NotWalkable cell in `grid`.
    pub fn new<T: TerrainCell>(
        id: RoomId,
        terrain: TerrainCost,
        tiles: Vec<Coord2>,
        grid: &Grid<T>,
    ) -> Self {
        let edge_tiles = tiles
            .iter()
            .copied()
            .filter(|&tile| {
                grid.neighbor_coords(tile)
                    .iter()
                    .any(|&n| grid.terrain(n) == Some(TerrainCost::NotWalkable))
            })
            .collect();
        Self {
            id,
            terrain,
            tiles,
            edge_tiles,
            neighbour_rooms: Vec::new(),
            is_main_room: false,
            is_accessible_from_main: false,
        }
    }

    #[inline]
    pub fn id(&self) -> RoomId {
        self.id
    }

    #[inline]
    pub fn terrain(&self) -> TerrainCost {
        self.terrain
    }

    #[inline]
    pub fn tiles(&self) -> &[Coord2] {
        &self.tiles
    }

    #[inline]
    pub fn edge_tiles(&self) -> &[Coord2] {
        &self.edge_tiles
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn neighbour_rooms(&self) -> &[RoomId] {
        &self.neighbour_rooms
    }

    #[inline]
    pub fn is_main_room(&self) -> bool {
        self.is_main_room
    }

    #[inline]
    pub fn is_accessible_from_main(&self) -> bool {
        self.is_accessible_from_main
    }

    pub fn is_connected_to(&self, other: RoomId) -> bool {
        self.neighbour_rooms.contains(&other)
    }

    pub fn contains(&self, tile: Coord2) -> bool {
        self.tiles.contains(&tile)
    }

    /// Passage endpoints: edge tiles, or every tile for a room with no wall contact.
    pub fn connection_tiles(&self) -> &[Coord2] {
        if self.edge_tiles.is_empty() {
            &self.tiles
        } else {
            &self.edge_tiles
        }
    }

    pub(crate) fn add_neighbour(&mut self, other: RoomId) {
        if !self.is_connected_to(other) {
            self.neighbour_rooms.push(other);
        }
    }

    pub(crate) fn mark_main(&mut self) {
        self.is_main_room = true;
        self.is_accessible_from_main = true;
    }

    pub(crate) fn mark_accessible(&mut self) -> bool {
        let changed = !self.is_accessible_from_main;
        self.is_accessible_from_main = true;
        changed
    }
}

/// Splits a grid into same-terrain regions and removes the ones too small to keep.
#[derive(Clone, Debug)]
pub struct RegionAnalyzer {
    pub min_room_size: usize,
}

impl Default for RegionAnalyzer {
    fn default() -> Self {
        Self { min_room_size: 6 }
    }
}

impl RegionAnalyzer {
    pub fn new(min_room_size: usize) -> Self {
        Self { min_room_size }
    }

    /// Every 8-connected same-terrain component, NotWalkable ones included, in
    /// row-major order of their first tile.
    pub fn regions<T: TerrainCell>(&self, grid: &Grid<T>) -> Vec<(TerrainCost, Vec<Coord2>)> {
        let mut seen = Grid::new_filled(grid.width(), grid.height(), false);
        let mut regions = Vec::new();
        for (coord, cell) in grid.iter_coords() {
            if seen.get(coord).copied().unwrap_or(true) {
                continue;
            }
            let Some(tiles) = region_tiles(grid, coord) else {
                continue;
            };
            for &tile in &tiles {
                seen.set(tile, true);
            }
            regions.push((cell.terrain(), tiles));
        }
        regions
    }

    /// Extracts walkable rooms, turning every region smaller than `min_room_size`
    /// into NotWalkable. Survivors are sorted largest first and their ids match
    /// their position in the returned list.
    pub fn analyze<T: TerrainCell>(
        &self,
        grid: &mut Grid<T>,
        observer: &mut dyn GenerationObserver,
    ) -> Vec<Room> {
        let mut survivors = Vec::new();
        let mut demoted = 0usize;

        for (terrain, tiles) in self.regions(grid) {
            if !terrain.is_walkable() {
                continue;
            }
            if tiles.len() < self.min_room_size {
                for &tile in &tiles {
                    grid.set_terrain(tile, TerrainCost::NotWalkable);
                }
                observer.on_region_demoted(terrain, &tiles);
                demoted += 1;
                continue;
            }
            survivors.push((terrain, tiles));
        }

        if demoted > 0 {
            grid.notify_all_changed();
        }

        survivors.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        let rooms: Vec<Room> = survivors
            .into_iter()
            .enumerate()
            .map(|(index, (terrain, tiles))| Room::new(RoomId(index), terrain, tiles, grid))
            .collect();

        debug!(
            "region analysis kept {} rooms, demoted {demoted} undersized regions",
            rooms.len()
        );
        rooms
    }
}
