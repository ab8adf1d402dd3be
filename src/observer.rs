use crate::coord::Coord2;
use crate::placement::Rect;
use crate::terrain::TerrainCost;

/// Receives a notification every time a grid cell is mutated or explicitly re-announced.
///
/// Notifications fire synchronously at the point of mutation, so an observer sees
/// every intermediate state rather than only the finished grid.
pub trait GridObserver<T> {
    fn on_cell_changed(&mut self, coord: Coord2, cell: &T);
}

impl<T, F> GridObserver<T> for F
where
    F: FnMut(Coord2, &T),
{
    fn on_cell_changed(&mut self, coord: Coord2, cell: &T) {
        self(coord, cell)
    }
}

pub trait PathfindObserver {
    fn on_expand(&mut self, _coord: Coord2, _g: u32, _f: f32) {}
    fn on_path_found(&mut self, _path: &[Coord2], _cost: u32) {}
    fn on_no_path(&mut self) {}
}

pub trait GenerationObserver {
    fn on_room_placed(&mut self, _rect: &Rect) {}
    fn on_room_skipped(&mut self, _width: u32, _height: u32) {}
    fn on_iteration(&mut self, _iteration: u32) {}
    fn on_region_demoted(&mut self, _terrain: TerrainCost, _tiles: &[Coord2]) {}
    fn on_passage_carved(&mut self, _from: Coord2, _to: Coord2) {}
}

pub struct NoOpPathfindObserver;
impl PathfindObserver for NoOpPathfindObserver {}

pub struct NoOpGenerationObserver;
impl GenerationObserver for NoOpGenerationObserver {}
