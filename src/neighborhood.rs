use crate::coord::Coord2;

/// One of the eight Moore-neighborhood steps. North is `+y`, since row 0 is the
/// bottom of the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dir8 {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

const STEPS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

impl Dir8 {
    /// Clockwise from north. Neighbor lists are built in this order.
    pub const ALL: [Dir8; 8] = [
        Dir8::N,
        Dir8::NE,
        Dir8::E,
        Dir8::SE,
        Dir8::S,
        Dir8::SW,
        Dir8::W,
        Dir8::NW,
    ];

    #[inline]
    pub const fn offset(self) -> Coord2 {
        let (x, y) = STEPS[self as usize];
        Coord2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_cover_the_moore_ring() {
        for dir in Dir8::ALL {
            let step = Coord2::ZERO + dir.offset();
            assert_eq!(Coord2::ZERO.chebyshev_distance(step), 1);
        }
    }

    #[test]
    fn north_points_up() {
        assert_eq!(Dir8::N.offset(), Coord2::new(0, 1));
        assert_eq!(Dir8::SW.offset(), Coord2::new(-1, -1));
    }
}
