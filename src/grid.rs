use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::OnceCell;
use core::fmt;

use rand_core::RngCore;

use crate::coord::{Coord2, WorldPoint};
use crate::error::GenerationError;
use crate::neighborhood::Dir8;
use crate::observer::GridObserver;
use crate::random::rand_below;
use crate::terrain::{TerrainCell, TerrainCost};

/// 2D rectangular grid backed by a flat Vec, stored row-major with `y = 0` at the bottom.
///
/// Neighbor lists are computed lazily per coordinate and kept for the lifetime of the
/// grid. They describe adjacency only: terrain must always be read fresh through
/// [`Grid::get`].
pub struct Grid<T> {
    cells: Vec<T>,
    width: u32,
    height: u32,
    cell_size: f32,
    origin: WorldPoint,
    neighbor_cache: Vec<OnceCell<Vec<Coord2>>>,
    observers: Vec<Box<dyn GridObserver<T>>>,
}

fn empty_cache(len: usize) -> Vec<OnceCell<Vec<Coord2>>> {
    (0..len).map(|_| OnceCell::new()).collect()
}

impl<T> Grid<T> {
    pub fn new(
        width: u32,
        height: u32,
        cell_size: f32,
        origin: WorldPoint,
        mut factory: impl FnMut(Coord2) -> T,
    ) -> Self {
        let mut grid = Self::from_fn(width, height, |x, y| factory(Coord2::new(x, y)));
        grid.cell_size = cell_size;
        grid.origin = origin;
        grid
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(i32, i32) -> T) -> Self {
        let len = width as usize * height as usize;
        let mut cells = Vec::with_capacity(len);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                cells.push(f(x, y));
            }
        }
        Self {
            cells,
            width,
            height,
            cell_size: 1.0,
            origin: WorldPoint::default(),
            neighbor_cache: empty_cache(len),
            observers: Vec::new(),
        }
    }

    pub fn from_vec(width: u32, height: u32, cells: Vec<T>) -> Result<Self, GenerationError> {
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(GenerationError::GridSizeMismatch {
                expected,
                got: cells.len(),
            });
        }
        Ok(Self {
            cells,
            width,
            height,
            cell_size: 1.0,
            origin: WorldPoint::default(),
            neighbor_cache: empty_cache(expected),
            observers: Vec::new(),
        })
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub const fn origin(&self) -> WorldPoint {
        self.origin
    }

    #[inline]
    pub fn in_bounds(&self, coord: Coord2) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.x < self.width as i32
            && coord.y < self.height as i32
    }

    #[inline]
    pub fn coord_to_index(&self, coord: Coord2) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        coord.to_index(self.width)
    }

    #[inline]
    pub fn index_to_coord(&self, index: usize) -> Coord2 {
        Coord2::from_index(index, self.width)
    }

    pub fn get(&self, coord: Coord2) -> Option<&T> {
        self.coord_to_index(coord).and_then(|i| self.cells.get(i))
    }

    /// Replaces the cell and notifies observers. Out-of-bounds writes are ignored.
    pub fn set(&mut self, coord: Coord2, value: T) {
        if let Some(index) = self.coord_to_index(coord) {
            self.cells[index] = value;
            self.notify_index(index);
        }
    }

    /// Mutates the cell in place and notifies observers. Returns `false` when out of bounds.
    pub fn update(&mut self, coord: Coord2, f: impl FnOnce(&mut T)) -> bool {
        match self.coord_to_index(coord) {
            Some(index) => {
                f(&mut self.cells[index]);
                self.notify_index(index);
                true
            }
            None => false,
        }
    }

    /// In-bounds 8-neighborhood of `coord`, excluding `coord` itself.
    pub fn neighbor_coords(&self, coord: Coord2) -> &[Coord2] {
        let Some(index) = self.coord_to_index(coord) else {
            return &[];
        };
        self.neighbor_cache[index].get_or_init(|| {
            let mut out = Vec::with_capacity(8);
            for dir in Dir8::ALL {
                let next = coord + dir.offset();
                if self.in_bounds(next) {
                    out.push(next);
                }
            }
            out
        })
    }

    pub fn neighbors(&self, coord: Coord2) -> Vec<&T> {
        self.neighbor_coords(coord)
            .iter()
            .filter_map(|&n| self.get(n))
            .collect()
    }

    /// Visits every coordinate exactly once, row by row.
    pub fn for_each_coordinate(&self, mut f: impl FnMut(Coord2)) {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                f(Coord2::new(x, y));
            }
        }
    }

    pub fn iter_coords(&self) -> impl Iterator<Item = (Coord2, &T)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (Coord2::from_index(index, self.width), cell))
    }

    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn on_changed(&mut self, observer: impl GridObserver<T> + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn add_observer(&mut self, observer: Box<dyn GridObserver<T>>) {
        self.observers.push(observer);
    }

    #[inline]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn notify_changed(&mut self, coord: Coord2) {
        if let Some(index) = self.coord_to_index(coord) {
            self.notify_index(index);
        }
    }

    /// Re-announces every cell, in storage order.
    pub fn notify_all_changed(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let width = self.width;
        for (index, cell) in self.cells.iter().enumerate() {
            let coord = Coord2::from_index(index, width);
            for observer in self.observers.iter_mut() {
                observer.on_cell_changed(coord, cell);
            }
        }
    }

    fn notify_index(&mut self, index: usize) {
        let coord = Coord2::from_index(index, self.width);
        let cell = &self.cells[index];
        for observer in self.observers.iter_mut() {
            observer.on_cell_changed(coord, cell);
        }
    }

    /// Bottom-left corner of the cell in world space, or its center when `centered`.
    pub fn world_position(&self, coord: Coord2, centered: bool) -> WorldPoint {
        let mut x = coord.x as f32 * self.cell_size + self.origin.x;
        let mut y = coord.y as f32 * self.cell_size + self.origin.y;
        if centered {
            x += self.cell_size / 2.0;
            y += self.cell_size / 2.0;
        }
        WorldPoint::new(x, y)
    }

    /// Cell containing `point`. The result may lie outside the grid.
    pub fn world_to_coord(&self, point: WorldPoint) -> Coord2 {
        Coord2::new(
            libm::floorf((point.x - self.origin.x) / self.cell_size) as i32,
            libm::floorf((point.y - self.origin.y) / self.cell_size) as i32,
        )
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_filled(width: u32, height: u32, fill: T) -> Self {
        Self::from_fn(width, height, |_, _| fill.clone())
    }
}

impl<T: TerrainCell> Grid<T> {
    #[inline]
    pub fn terrain(&self, coord: Coord2) -> Option<TerrainCost> {
        self.get(coord).map(TerrainCell::terrain)
    }

    pub fn set_terrain(&mut self, coord: Coord2, terrain: TerrainCost) -> bool {
        self.update(coord, |cell| cell.set_terrain(terrain))
    }

    #[inline]
    pub fn is_walkable(&self, coord: Coord2) -> bool {
        self.get(coord).is_some_and(TerrainCell::is_walkable)
    }

    /// Uniformly chosen walkable coordinate, `None` when the grid has no walkable cell.
    pub fn random_walkable(&self, rng: &mut impl RngCore) -> Option<Coord2> {
        let walkable: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_walkable())
            .map(|(index, _)| index)
            .collect();
        if walkable.is_empty() {
            return None;
        }
        Some(self.index_to_coord(walkable[rand_below(rng, walkable.len())]))
    }
}

impl<T: Clone> Clone for Grid<T> {
    /// Copies cells and layout. Observers stay registered on the source grid only.
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
            width: self.width,
            height: self.height,
            cell_size: self.cell_size,
            origin: self.origin,
            neighbor_cache: self.neighbor_cache.clone(),
            observers: Vec::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("cell_size", &self.cell_size)
            .field("origin", &self.origin)
            .field("observers", &self.observers.len())
            .field("cells", &self.cells)
            .finish()
    }
}
