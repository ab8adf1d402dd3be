use core::ops::Range;

use crate::cellular::Ruleset;
use crate::coord::WorldPoint;
use crate::error::GenerationError;

#[derive(Clone, Debug, PartialEq)]
pub struct RoomPlacementConfig {
    /// Number of rooms to attempt, sampled once per run.
    pub room_count: Range<u32>,
    pub room_width: Range<u32>,
    pub room_height: Range<u32>,
    /// Placement samples per room before it is skipped.
    pub max_tries: u32,
}

impl Default for RoomPlacementConfig {
    fn default() -> Self {
        Self {
            room_count: 8..20,
            room_width: 3..7,
            room_height: 3..6,
            max_tries: 15,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Strategy {
    /// Each cell becomes NotWalkable with probability `fill_percent / 100`, otherwise Easy.
    RandomFill { fill_percent: u32 },
    /// Non-overlapping Easy rectangles carved into a NotWalkable grid.
    RoomPlacement(RoomPlacementConfig),
}

impl Strategy {
    pub fn ruleset(&self) -> Ruleset {
        match self {
            Strategy::RandomFill { .. } => Ruleset::RandomFill,
            Strategy::RoomPlacement(_) => Ruleset::Rooms,
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::RandomFill { fill_percent: 43 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationConfig {
    pub width: u32,
    pub height: u32,
    pub cell_size: f32,
    pub origin: WorldPoint,
    /// `None` derives a seed from the clock.
    pub seed: Option<u64>,
    pub strategy: Strategy,
    pub smoothing_iterations: u32,
    /// Regions with fewer tiles are turned into NotWalkable.
    pub min_room_size: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 60,
            cell_size: 3.5,
            origin: WorldPoint::new(-110.0, -60.0),
            seed: None,
            strategy: Strategy::default(),
            smoothing_iterations: 5,
            min_room_size: 6,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width == 0 || self.height == 0 {
            return Err(GenerationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.cell_size.is_nan() || self.cell_size <= 0.0 {
            return Err(GenerationError::InvalidConfig("cell_size must be positive"));
        }
        match &self.strategy {
            Strategy::RandomFill { fill_percent } => {
                if *fill_percent > 100 {
                    return Err(GenerationError::InvalidConfig(
                        "fill_percent must be within 0..=100",
                    ));
                }
            }
            Strategy::RoomPlacement(rooms) => {
                if rooms.room_count.is_empty() {
                    return Err(GenerationError::InvalidConfig("room_count range is empty"));
                }
                if rooms.room_width.is_empty() || rooms.room_width.start == 0 {
                    return Err(GenerationError::InvalidConfig(
                        "room_width range must be non-empty and positive",
                    ));
                }
                if rooms.room_height.is_empty() || rooms.room_height.start == 0 {
                    return Err(GenerationError::InvalidConfig(
                        "room_height range must be non-empty and positive",
                    ));
                }
                if rooms.room_width.end - 1 > self.width {
                    return Err(GenerationError::InvalidConfig(
                        "room_width can exceed the grid width",
                    ));
                }
                if rooms.room_height.end - 1 > self.height {
                    return Err(GenerationError::InvalidConfig(
                        "room_height can exceed the grid height",
                    ));
                }
                if rooms.max_tries == 0 {
                    return Err(GenerationError::InvalidConfig("max_tries must be positive"));
                }
            }
        }
        Ok(())
    }
}
