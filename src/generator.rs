use alloc::boxed::Box;
use alloc::vec::Vec;

use log::info;
use rand_core::RngCore;

use crate::cellular::{random_fill, run_smoothing};
use crate::config::{GenerationConfig, Strategy};
use crate::connector::{is_fully_connected, Passage, RoomConnector};
use crate::coord::Coord2;
use crate::error::GenerationError;
use crate::grid::Grid;
use crate::observer::{GenerationObserver, GridObserver, NoOpGenerationObserver};
use crate::pathfind::{find_path, Path};
use crate::placement::place_rooms;
use crate::random::{resolve_seed, seeded_rng};
use crate::region::{RegionAnalyzer, Room, RoomId};
use crate::terrain::{TerrainCost, Tile};

/// Finished terrain: the grid, the rooms that survived, and how they were joined.
#[derive(Clone, Debug)]
pub struct Map {
    grid: Grid<Tile>,
    rooms: Vec<Room>,
    main_room: RoomId,
    passages: Vec<Passage>,
    seed: u64,
}

impl Map {
    #[inline]
    pub fn grid(&self) -> &Grid<Tile> {
        &self.grid
    }

    #[inline]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn main_room(&self) -> &Room {
        &self.rooms[self.main_room.0]
    }

    #[inline]
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Seed the map was generated from; feeding it back reproduces the map.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn find_path(&self, start: Coord2, goal: Coord2) -> Option<Path> {
        find_path(&self.grid, start, goal)
    }

    pub fn is_fully_connected(&self) -> bool {
        is_fully_connected(&self.rooms, self.main_room)
    }

    pub fn into_grid(self) -> Grid<Tile> {
        self.grid
    }
}

/// Runs the whole pipeline: seed, shape terrain, smooth, extract rooms, connect them.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    config: GenerationConfig,
}

impl TerrainGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn generate(&self) -> Result<Map, GenerationError> {
        self.generate_with(Vec::new(), &mut NoOpGenerationObserver)
    }

    /// Like [`generate`](Self::generate), with `observers` attached to the grid before
    /// the first cell is written, so they see every intermediate change.
    pub fn generate_with(
        &self,
        observers: Vec<Box<dyn GridObserver<Tile>>>,
        events: &mut dyn GenerationObserver,
    ) -> Result<Map, GenerationError> {
        let cfg = &self.config;
        let seed = resolve_seed(cfg.seed);
        info!(
            "generating {}x{} terrain with seed {seed} ({:?})",
            cfg.width, cfg.height, cfg.strategy
        );
        let mut rng = seeded_rng(seed);

        let mut grid = Grid::new(cfg.width, cfg.height, cfg.cell_size, cfg.origin, |_| {
            Tile::new(TerrainCost::NotWalkable)
        });
        for observer in observers {
            grid.add_observer(observer);
        }

        self.shape(&mut grid, &mut rng, events);

        let mut rooms = RegionAnalyzer::new(cfg.min_room_size).analyze(&mut grid, events);
        let report = RoomConnector::new()
            .connect(&mut grid, &mut rooms, events)
            .ok_or(GenerationError::NoSurvivingRooms { seed })?;

        info!(
            "terrain ready: {} rooms, main room of {} tiles, {} passages",
            rooms.len(),
            rooms[report.main_room.0].size(),
            report.passages.len()
        );
        Ok(Map {
            grid,
            rooms,
            main_room: report.main_room,
            passages: report.passages,
            seed,
        })
    }

    /// Initial fill for the configured strategy followed by the smoothing passes.
    pub fn shape(
        &self,
        grid: &mut Grid<Tile>,
        rng: &mut impl RngCore,
        events: &mut dyn GenerationObserver,
    ) {
        match &self.config.strategy {
            Strategy::RandomFill { fill_percent } => random_fill(grid, *fill_percent, rng),
            Strategy::RoomPlacement(rooms) => {
                place_rooms(grid, rooms, rng, events);
            }
        }
        run_smoothing(
            grid,
            self.config.strategy.ruleset(),
            self.config.smoothing_iterations,
            events,
        );
    }
}
