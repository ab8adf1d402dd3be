use core::ops::{Add, Sub};

/// Integer cell position. `(0, 0)` is the bottom-left cell of a grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord2 {
    pub x: i32,
    pub y: i32,
}

impl Coord2 {
    pub const ZERO: Coord2 = Coord2::new(0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Coord2 { x, y }
    }

    /// Absolute per-axis separation.
    #[inline]
    fn span(self, other: Coord2) -> (u32, u32) {
        (self.x.abs_diff(other.x), self.y.abs_diff(other.y))
    }

    /// Number of king moves between the two cells.
    #[inline]
    pub fn chebyshev_distance(self, other: Coord2) -> u32 {
        let (dx, dy) = self.span(other);
        dx.max(dy)
    }

    /// Squared Euclidean distance, exact for any pair of `i32` coordinates.
    #[inline]
    pub fn squared_distance(self, other: Coord2) -> u64 {
        let (dx, dy) = self.span(other);
        u64::from(dx) * u64::from(dx) + u64::from(dy) * u64::from(dy)
    }

    /// Straight steps cost 1, diagonal steps cost `sqrt(2)`.
    #[inline]
    pub fn octile_distance(self, other: Coord2) -> f32 {
        let (dx, dy) = self.span(other);
        let (dx, dy) = (dx as f32, dy as f32);
        (dx + dy) + (core::f32::consts::SQRT_2 - 2.0) * dx.min(dy)
    }

    /// True for the eight cells around `self`, false for `self`.
    #[inline]
    pub fn is_adjacent8(self, other: Coord2) -> bool {
        self.chebyshev_distance(other) == 1
    }

    /// Row-major storage index for a grid `width` cells wide. Rows past the top are
    /// not rejected here; callers bound-check `y` themselves.
    #[inline]
    pub fn to_index(self, width: u32) -> Option<usize> {
        let x = u32::try_from(self.x).ok().filter(|&x| x < width)?;
        let y = usize::try_from(self.y).ok()?;
        Some(y * width as usize + x as usize)
    }

    #[inline]
    pub fn from_index(index: usize, width: u32) -> Self {
        match width as usize {
            0 => Coord2::ZERO,
            w => Coord2::new((index % w) as i32, (index / w) as i32),
        }
    }
}

impl Add for Coord2 {
    type Output = Coord2;

    #[inline]
    fn add(self, rhs: Coord2) -> Coord2 {
        Coord2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord2 {
    type Output = Coord2;

    #[inline]
    fn sub(self, rhs: Coord2) -> Coord2 {
        Coord2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for Coord2 {
    fn from((x, y): (i32, i32)) -> Self {
        Coord2::new(x, y)
    }
}

/// Position in the host's continuous world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        WorldPoint { x, y }
    }
}
