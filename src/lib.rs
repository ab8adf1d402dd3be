#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod cellular;
pub mod config;
pub mod connector;
pub mod coord;
pub mod error;
pub mod flood;
pub mod generator;
pub mod grid;
pub mod neighborhood;
pub mod observer;
pub mod pathfind;
pub mod placement;
pub mod priority_queue;
pub mod random;
pub mod region;
pub mod terrain;

pub use cellular::{random_fill, smooth, Ruleset};
pub use config::{GenerationConfig, RoomPlacementConfig, Strategy};
pub use connector::{carve_passage, is_fully_connected, ConnectionReport, Passage, RoomConnector};
pub use coord::{Coord2, WorldPoint};
pub use error::GenerationError;
pub use flood::{flood_fill, is_connected, region_tiles, FloodResult};
pub use generator::{Map, TerrainGenerator};
pub use grid::Grid;
pub use neighborhood::Dir8;
pub use observer::{
    GenerationObserver, GridObserver, NoOpGenerationObserver, NoOpPathfindObserver,
    PathfindObserver,
};
pub use pathfind::{find_path, find_path_observed, Path};
pub use placement::{place_rooms, Rect};
pub use priority_queue::PriorityQueue;
pub use region::{RegionAnalyzer, Room, RoomId};
pub use terrain::{TerrainCell, TerrainCost, Tile};
