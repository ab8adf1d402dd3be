use std::cell::RefCell;
use std::rc::Rc;

use groundwork::random::seeded_rng;
use groundwork::{
    find_path, is_connected, Coord2, GenerationConfig, GenerationError, GenerationObserver,
    GridObserver, Rect, RoomPlacementConfig, Strategy, TerrainCost, TerrainGenerator, Tile,
};

fn config(seed: u64, strategy: Strategy) -> GenerationConfig {
    GenerationConfig {
        width: 64,
        height: 40,
        seed: Some(seed),
        strategy,
        ..Default::default()
    }
}

fn rooms_strategy() -> Strategy {
    Strategy::RoomPlacement(RoomPlacementConfig::default())
}

#[derive(Default)]
struct Events {
    placed: Vec<Rect>,
    skipped: usize,
    iterations: Vec<u32>,
    demoted: usize,
    passages: usize,
}

impl GenerationObserver for Events {
    fn on_room_placed(&mut self, rect: &Rect) {
        self.placed.push(*rect);
    }

    fn on_room_skipped(&mut self, _width: u32, _height: u32) {
        self.skipped += 1;
    }

    fn on_iteration(&mut self, iteration: u32) {
        self.iterations.push(iteration);
    }

    fn on_region_demoted(&mut self, terrain: TerrainCost, tiles: &[Coord2]) {
        assert!(terrain.is_walkable());
        assert!(tiles.len() < 6);
        self.demoted += 1;
    }

    fn on_passage_carved(&mut self, _from: Coord2, _to: Coord2) {
        self.passages += 1;
    }
}

#[test]
fn same_seed_same_map() {
    for strategy in [Strategy::default(), rooms_strategy()] {
        let generator = TerrainGenerator::new(config(2024, strategy)).unwrap();
        let a = generator.generate().unwrap();
        let b = generator.generate().unwrap();
        assert_eq!(a.grid().cells(), b.grid().cells());
        assert_eq!(a.rooms(), b.rooms());
        assert_eq!(a.passages(), b.passages());
    }
}

#[test]
fn unseeded_map_reports_a_reusable_seed() {
    let unseeded = GenerationConfig {
        width: 64,
        height: 40,
        seed: None,
        ..Default::default()
    };
    let first = TerrainGenerator::new(unseeded.clone())
        .unwrap()
        .generate()
        .unwrap();

    let replay = GenerationConfig {
        seed: Some(first.seed()),
        ..unseeded
    };
    let second = TerrainGenerator::new(replay).unwrap().generate().unwrap();
    assert_eq!(second.seed(), first.seed());
    assert_eq!(first.grid().cells(), second.grid().cells());
    assert_eq!(first.rooms(), second.rooms());
    assert_eq!(first.passages(), second.passages());
}

#[test]
fn different_seeds_differ() {
    let a = TerrainGenerator::new(config(1, Strategy::default()))
        .unwrap()
        .generate()
        .unwrap();
    let b = TerrainGenerator::new(config(2, Strategy::default()))
        .unwrap()
        .generate()
        .unwrap();
    assert_ne!(a.grid().cells(), b.grid().cells());
}

#[test]
fn every_room_reachable_from_main() {
    for seed in 0..8 {
        for strategy in [Strategy::default(), rooms_strategy()] {
            let map = TerrainGenerator::new(config(seed, strategy))
                .unwrap()
                .generate()
                .unwrap();
            assert!(map.is_fully_connected(), "seed {seed}");
            assert!(is_connected(map.grid()), "seed {seed}");
            assert!(map.rooms().iter().all(|r| r.is_accessible_from_main()));
            assert_eq!(map.rooms().iter().filter(|r| r.is_main_room()).count(), 1);
        }
    }
}

#[test]
fn main_room_is_largest() {
    let map = TerrainGenerator::new(config(31, Strategy::default()))
        .unwrap()
        .generate()
        .unwrap();
    let largest = map.rooms().iter().map(|r| r.size()).max().unwrap();
    assert_eq!(map.main_room().size(), largest);
}

#[test]
fn paths_exist_between_rooms() {
    let map = TerrainGenerator::new(config(77, rooms_strategy()))
        .unwrap()
        .generate()
        .unwrap();
    let start = map.main_room().tiles()[0];
    for room in map.rooms() {
        let goal = *room.tiles().last().unwrap();
        let path = map.find_path(start, goal).expect("connected rooms must be reachable");
        assert_eq!(path.start(), Some(start));
        assert_eq!(path.goal(), Some(goal));
        for pair in path.steps().windows(2) {
            assert!(pair[0].is_adjacent8(pair[1]));
        }
        assert!(path.steps().iter().all(|&c| map.grid().is_walkable(c)));
    }
}

#[test]
fn random_walkable_cells_are_mutually_reachable() {
    let map = TerrainGenerator::new(config(5, Strategy::default()))
        .unwrap()
        .generate()
        .unwrap();
    let mut rng = seeded_rng(5);
    for _ in 0..10 {
        let a = map.grid().random_walkable(&mut rng).unwrap();
        let b = map.grid().random_walkable(&mut rng).unwrap();
        assert!(find_path(map.grid(), a, b).is_some());
    }
}

#[test]
fn no_small_regions_survive() {
    let map = TerrainGenerator::new(config(13, Strategy::default()))
        .unwrap()
        .generate()
        .unwrap();
    assert!(map.rooms().iter().all(|r| r.size() >= 6));
    for room in map.rooms() {
        for &tile in room.edge_tiles() {
            assert!(room.contains(tile));
        }
    }
}

#[test]
fn grid_observers_see_every_write() {
    let seen = Rc::new(RefCell::new(0usize));
    let last_easy = Rc::new(RefCell::new(Vec::new()));
    let counter = {
        let seen = Rc::clone(&seen);
        move |_: Coord2, _: &Tile| *seen.borrow_mut() += 1
    };
    let easy = {
        let last_easy = Rc::clone(&last_easy);
        move |coord: Coord2, tile: &Tile| {
            if tile.terrain == TerrainCost::Easy {
                last_easy.borrow_mut().push(coord);
            }
        }
    };
    let observers: Vec<Box<dyn GridObserver<Tile>>> = vec![Box::new(counter), Box::new(easy)];

    let cfg = config(9, Strategy::default());
    let cells = (cfg.width * cfg.height) as usize;
    let iterations = cfg.smoothing_iterations as usize;
    let map = TerrainGenerator::new(cfg)
        .unwrap()
        .generate_with(observers, &mut Events::default())
        .unwrap();

    // One write per cell for the fill and for each smoothing pass.
    assert!(*seen.borrow() >= cells * (1 + iterations));
    assert!(last_easy
        .borrow()
        .iter()
        .all(|&c| map.grid().in_bounds(c)));
    assert_eq!(map.grid().observer_count(), 2);
}

#[test]
fn generation_events_for_random_fill() {
    let mut events = Events::default();
    let cfg = config(3, Strategy::default());
    let map = TerrainGenerator::new(cfg.clone())
        .unwrap()
        .generate_with(Vec::new(), &mut events)
        .unwrap();
    assert!(events.placed.is_empty());
    assert_eq!(events.skipped, 0);
    assert_eq!(
        events.iterations,
        (0..cfg.smoothing_iterations).collect::<Vec<_>>()
    );
    assert_eq!(events.passages, map.passages().len());
}

#[test]
fn generation_events_for_room_placement() {
    let mut events = Events::default();
    let map = TerrainGenerator::new(config(11, rooms_strategy()))
        .unwrap()
        .generate_with(Vec::new(), &mut events)
        .unwrap();
    let attempted = events.placed.len() + events.skipped;
    assert!((8..20).contains(&attempted));
    assert!(!events.placed.is_empty());
    for (i, a) in events.placed.iter().enumerate() {
        assert!((3..7).contains(&a.width));
        assert!((3..6).contains(&a.height));
        for b in &events.placed[i + 1..] {
            assert!(!a.intersects(b));
        }
    }
    assert_eq!(events.passages, map.passages().len());
}

#[test]
fn world_mapping_uses_config() {
    let map = TerrainGenerator::new(config(4, Strategy::default()))
        .unwrap()
        .generate()
        .unwrap();
    let grid = map.grid();
    assert_eq!(grid.cell_size(), 3.5);
    let corner = grid.world_position(Coord2::new(0, 0), false);
    assert_eq!((corner.x, corner.y), (-110.0, -60.0));
    let center = grid.world_position(Coord2::new(10, 7), true);
    assert_eq!(grid.world_to_coord(center), Coord2::new(10, 7));
}

#[test]
fn invalid_configs_fail_fast() {
    let zero_width = GenerationConfig {
        width: 0,
        ..Default::default()
    };
    assert_eq!(
        TerrainGenerator::new(zero_width).unwrap_err(),
        GenerationError::InvalidDimensions {
            width: 0,
            height: 60
        }
    );

    let overfilled = GenerationConfig {
        strategy: Strategy::RandomFill { fill_percent: 101 },
        ..Default::default()
    };
    assert!(matches!(
        TerrainGenerator::new(overfilled),
        Err(GenerationError::InvalidConfig(_))
    ));

    let empty_rooms = GenerationConfig {
        strategy: Strategy::RoomPlacement(RoomPlacementConfig {
            room_width: 4..4,
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(matches!(
        TerrainGenerator::new(empty_rooms),
        Err(GenerationError::InvalidConfig(_))
    ));
}

#[test]
fn walled_map_reports_seed() {
    let cfg = GenerationConfig {
        smoothing_iterations: 0,
        ..config(17, Strategy::RandomFill { fill_percent: 100 })
    };
    let err = TerrainGenerator::new(cfg).unwrap().generate().unwrap_err();
    assert_eq!(err, GenerationError::NoSurvivingRooms { seed: 17 });
}
