use alloc::vec::Vec;

use log::debug;
use rand_core::RngCore;

use crate::config::RoomPlacementConfig;
use crate::coord::Coord2;
use crate::grid::Grid;
use crate::observer::GenerationObserver;
use crate::random::rand_range;
use crate::terrain::{TerrainCell, TerrainCost};

/// Axis-aligned block of cells anchored at its bottom-left corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Overlap test on cells; rectangles that only share an edge line do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.width == 0 || self.height == 0 || other.width == 0 || other.height == 0 {
            return false;
        }
        let a_left = self.x;
        let a_right = self.x + self.width as i32 - 1;
        let a_bottom = self.y;
        let a_top = self.y + self.height as i32 - 1;

        let b_left = other.x;
        let b_right = other.x + other.width as i32 - 1;
        let b_bottom = other.y;
        let b_top = other.y + other.height as i32 - 1;

        !(a_right < b_left || a_left > b_right || a_top < b_bottom || a_bottom > b_top)
    }

    #[inline]
    pub fn contains(&self, point: Coord2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width as i32
            && point.y < self.y + self.height as i32
    }

    pub fn cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        (self.y..self.y + self.height as i32)
            .flat_map(move |y| (self.x..self.x + self.width as i32).map(move |x| Coord2::new(x, y)))
    }
}

/// Carves up to a random number of non-overlapping Easy rectangles into `grid`.
///
/// A room that cannot be placed within `max_tries` samples is skipped, so the result
/// may hold fewer rooms than requested.
pub fn place_rooms<T: TerrainCell>(
    grid: &mut Grid<T>,
    config: &RoomPlacementConfig,
    rng: &mut impl RngCore,
    observer: &mut dyn GenerationObserver,
) -> Vec<Rect> {
    let requested = rand_range(rng, &config.room_count);
    debug!("placing up to {requested} rooms");

    let mut placed: Vec<Rect> = Vec::with_capacity(requested as usize);
    for _ in 0..requested {
        let width = rand_range(rng, &config.room_width);
        let height = rand_range(rng, &config.room_height);
        match try_place(grid, &placed, width, height, config.max_tries, rng) {
            Some(rect) => {
                debug!(
                    "room at [{}:{}], w/h = {}/{}",
                    rect.x, rect.y, rect.width, rect.height
                );
                for cell in rect.cells() {
                    grid.set_terrain(cell, TerrainCost::Easy);
                }
                observer.on_room_placed(&rect);
                placed.push(rect);
            }
            None => {
                debug!(
                    "gave up on a {width}x{height} room after {} tries",
                    config.max_tries
                );
                observer.on_room_skipped(width, height);
            }
        }
    }
    placed
}

fn try_place<T>(
    grid: &Grid<T>,
    placed: &[Rect],
    width: u32,
    height: u32,
    max_tries: u32,
    rng: &mut impl RngCore,
) -> Option<Rect> {
    if width > grid.width() || height > grid.height() {
        return None;
    }
    let x_span = grid.width().saturating_sub(width);
    let y_span = grid.height().saturating_sub(height);
    for _ in 0..max_tries {
        let x = rand_range(rng, &(0..x_span)) as i32;
        let y = rand_range(rng, &(0..y_span)) as i32;
        let candidate = Rect::new(x, y, width, height);
        if !placed.iter().any(|other| other.intersects(&candidate)) {
            return Some(candidate);
        }
    }
    None
}
