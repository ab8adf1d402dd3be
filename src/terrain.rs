/// Traversal difficulty of a cell. The discriminant doubles as the A* step cost.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TerrainCost {
    None = 0,
    Easy = 1,
    Medium = 2,
    Hard = 3,
    #[default]
    NotWalkable = 100,
}

impl TerrainCost {
    pub const WALKABLE: [TerrainCost; 3] =
        [TerrainCost::Easy, TerrainCost::Medium, TerrainCost::Hard];

    #[inline]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, TerrainCost::NotWalkable)
    }

    /// Cost of stepping onto a cell of this terrain, `None` when it must never be entered.
    #[inline]
    pub const fn step_cost(self) -> Option<u32> {
        match self {
            TerrainCost::NotWalkable => None,
            other => Some(other as u32),
        }
    }
}

/// Capability shared by every cell payload the generation and search algorithms operate on.
pub trait TerrainCell {
    fn terrain(&self) -> TerrainCost;
    fn set_terrain(&mut self, terrain: TerrainCost);

    #[inline]
    fn is_walkable(&self) -> bool {
        self.terrain().is_walkable()
    }
}

impl TerrainCell for TerrainCost {
    #[inline]
    fn terrain(&self) -> TerrainCost {
        *self
    }

    #[inline]
    fn set_terrain(&mut self, terrain: TerrainCost) {
        *self = terrain;
    }
}

/// Default cell payload produced by the terrain generator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tile {
    pub terrain: TerrainCost,
}

impl Tile {
    #[inline]
    pub const fn new(terrain: TerrainCost) -> Self {
        Self { terrain }
    }
}

impl TerrainCell for Tile {
    #[inline]
    fn terrain(&self) -> TerrainCost {
        self.terrain
    }

    #[inline]
    fn set_terrain(&mut self, terrain: TerrainCost) {
        self.terrain = terrain;
    }
}

impl From<TerrainCost> for Tile {
    fn from(terrain: TerrainCost) -> Self {
        Tile::new(terrain)
    }
}
