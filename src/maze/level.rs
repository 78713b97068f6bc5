//! Level assembly: built rooms, walls, collision field and room graph
//!
//! A [`Level`] is generated once and is read-only afterwards. It answers the
//! placement queries hosts need (spawn point, goal, enemy spawn rooms).

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::generator::{Cell, Direction, MazeGrid, Openings};
use super::graph::RoomGraph;
use super::walls::{self, WallPiece};
use crate::core::LevelConfig;
use crate::physics::{CollisionField, Rect};

/// Carving attempts before a level with sealed rooms is accepted as-is.
const MAX_GENERATION_ATTEMPTS: usize = 8;

/// A grid cell promoted to a walled, world-positioned room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Grid row
    pub i: i32,
    /// Grid column
    pub j: i32,
    /// World-space center X
    pub cx: f32,
    /// World-space center Z
    pub cz: f32,
    /// Doorways, restricted to other built rooms
    pub openings: Openings,
}

impl Room {
    #[must_use]
    pub fn cell(&self) -> Cell {
        Cell::new(self.i, self.j)
    }

    /// Center in the XZ plane
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.cx, self.cz)
    }

    /// Center on the floor
    #[must_use]
    pub fn floor_center(&self) -> Vec3 {
        Vec3::new(self.cx, 0.0, self.cz)
    }
}

/// A generated maze level
#[derive(Debug, Clone)]
pub struct Level {
    rooms: Vec<Room>,
    walls: Vec<WallPiece>,
    colliders: CollisionField,
    graph: RoomGraph,
    spawn_room_index: usize,
    room_size: f32,
    grid_shape: (usize, usize),
}

impl Level {
    /// Generate a level using the given random source.
    pub fn generate<R: Rng + ?Sized>(config: &LevelConfig, rng: &mut R) -> Self {
        let target = config.effective_target_rooms();
        let (rows, cols) = config
            .grid
            .unwrap_or_else(|| MazeGrid::dimensions_for(target));

        let mut attempt = 1;
        let mut level = Self::carve_once(config, target, rows, cols, rng);
        while attempt < MAX_GENERATION_ATTEMPTS {
            let sealed = level.sealed_rooms();
            if sealed.is_empty() {
                break;
            }
            log::error!(
                "attempt {attempt}: rooms {sealed:?} unreachable from spawn, regenerating"
            );
            level = Self::carve_once(config, target, rows, cols, rng);
            attempt += 1;
        }

        log::info!(
            "generated level: {} rooms on a {}x{} grid, {} doorways, {} colliders",
            level.rooms.len(),
            rows,
            cols,
            level.graph.edge_count(),
            level.colliders.len()
        );
        level
    }

    /// Generate a level from `config.seed`, or from entropy when no seed is set.
    #[must_use]
    pub fn generate_seeded(config: &LevelConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::generate(config, &mut rng)
    }

    fn carve_once<R: Rng + ?Sized>(
        config: &LevelConfig,
        target: usize,
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Self {
        let grid = MazeGrid::carve(rows, cols, rng);
        let order = grid.visitation_order();

        if order.len() < target {
            log::warn!(
                "maze exhausted after {} of {} requested rooms, accepting a smaller level",
                order.len(),
                target
            );
        }
        let built = &order[..target.min(order.len())];

        let index_of: FxHashMap<Cell, usize> = built
            .iter()
            .enumerate()
            .map(|(index, &cell)| (cell, index))
            .collect();

        let (min_i, max_i, min_j, max_j) = built.iter().fold(
            (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
            |(a, b, c, d), cell| (a.min(cell.i), b.max(cell.i), c.min(cell.j), d.max(cell.j)),
        );
        let mid_i = (min_i + max_i) as f32 * 0.5;
        let mid_j = (min_j + max_j) as f32 * 0.5;

        let rooms: Vec<Room> = built
            .iter()
            .map(|&cell| {
                let carved = grid.openings(cell);
                let mut openings = Openings::default();
                for dir in Direction::ALL {
                    let open = carved.get(dir) && index_of.contains_key(&cell.step(dir));
                    openings.set(dir, open);
                }
                Room {
                    i: cell.i,
                    j: cell.j,
                    cx: (cell.j as f32 - mid_j) * config.room_size,
                    cz: (cell.i as f32 - mid_i) * config.room_size,
                    openings,
                }
            })
            .collect();

        let edges: Vec<(usize, usize)> = rooms
            .iter()
            .enumerate()
            .flat_map(|(index, room)| {
                [Direction::South, Direction::East]
                    .into_iter()
                    .filter(|&dir| room.openings.get(dir))
                    .filter_map(|dir| index_of.get(&room.cell().step(dir)).map(|&n| (index, n)))
                    .collect::<Vec<_>>()
            })
            .collect();
        let graph = RoomGraph::new(rooms.iter().map(Room::center).collect(), edges);

        let walls = walls::layout(&rooms, config);
        let colliders = CollisionField::new(
            walls
                .iter()
                .filter(|piece| piece.collides())
                .map(|piece| piece.footprint),
        );

        Self {
            rooms,
            walls,
            colliders,
            graph,
            spawn_room_index: 0,
            room_size: config.room_size,
            grid_shape: (grid.rows(), grid.cols()),
        }
    }

    /// Built rooms in visitation order
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// All wall pieces, including non-colliding lintels
    #[must_use]
    pub fn walls(&self) -> &[WallPiece] {
        &self.walls
    }

    #[must_use]
    pub fn colliders(&self) -> &CollisionField {
        &self.colliders
    }

    #[must_use]
    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    /// Room the player starts in
    #[must_use]
    pub fn spawn_room_index(&self) -> usize {
        self.spawn_room_index
    }

    /// Floor position at the center of the spawn room (origin if there are no rooms)
    #[must_use]
    pub fn spawn_position(&self) -> Vec3 {
        self.rooms
            .get(self.spawn_room_index)
            .map_or(Vec3::ZERO, Room::floor_center)
    }

    #[must_use]
    pub fn room_size(&self) -> f32 {
        self.room_size
    }

    /// Shape of the carving grid as (rows, cols)
    #[must_use]
    pub fn grid_shape(&self) -> (usize, usize) {
        self.grid_shape
    }

    /// Room centers in the XZ plane
    #[must_use]
    pub fn room_centers(&self) -> Vec<Vec2> {
        self.rooms.iter().map(Room::center).collect()
    }

    /// Floor extents covered by all rooms (a zero rectangle when empty)
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let half = self.room_size * 0.5;
        self.rooms
            .iter()
            .map(|room| Rect::square(room.cx, room.cz, half))
            .reduce(|a, b| a.union(&b))
            .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Index of the room whose floor square contains `position`
    #[must_use]
    pub fn room_containing(&self, position: Vec3) -> Option<usize> {
        let half = self.room_size * 0.5;
        self.rooms.iter().position(|room| {
            (position.x - room.cx).abs() <= half && (position.z - room.cz).abs() <= half
        })
    }

    /// BFS hop counts between rooms
    #[must_use]
    pub fn distances_from(&self, room: usize) -> Vec<Option<u32>> {
        self.graph.distances_from(room)
    }

    /// Rooms that cannot be reached from the spawn room
    #[must_use]
    pub fn sealed_rooms(&self) -> Vec<usize> {
        if self.rooms.is_empty() {
            return Vec::new();
        }
        self.graph
            .distances_from(self.spawn_room_index)
            .iter()
            .enumerate()
            .filter_map(|(index, d)| d.is_none().then_some(index))
            .collect()
    }

    /// Goal placement: center of the room graph-farthest from `position`.
    #[must_use]
    pub fn farthest_room_from(&self, position: Vec3) -> Vec3 {
        self.graph.farthest_room_from(position)
    }

    /// Spawn placement: center of a room `steps` doorways from the spawn room.
    ///
    /// See [`RoomGraph::room_at_graph_distance`] for the fallback order.
    pub fn room_at_graph_distance<R: Rng + ?Sized>(&self, steps: u32, rng: &mut R) -> Vec3 {
        if self.rooms.is_empty() {
            return Vec3::ZERO;
        }
        let index = self
            .graph
            .room_at_graph_distance(self.spawn_room_index, steps, rng);
        self.rooms[index].floor_center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::WallKind;

    fn seeded(config: &LevelConfig, seed: u64) -> Level {
        Level::generate(config, &mut StdRng::seed_from_u64(seed))
    }

    fn count(level: &Level, kind: WallKind) -> usize {
        level.walls().iter().filter(|w| w.kind == kind).count()
    }

    #[test]
    fn test_room_count_and_unique_cells() {
        for target in 1..=30 {
            let config = LevelConfig::default().with_target_rooms(target);
            let level = seeded(&config, target as u64);

            assert_eq!(level.rooms().len(), target as usize);
            let cells: rustc_hash::FxHashSet<_> = level.rooms().iter().map(Room::cell).collect();
            assert_eq!(cells.len(), level.rooms().len());
        }
    }

    #[test]
    fn test_non_positive_target_uses_default() {
        let level = seeded(&LevelConfig::default().with_target_rooms(0), 1);
        assert_eq!(level.rooms().len(), 12);
    }

    #[test]
    fn test_exhaustion_accepts_smaller_level() {
        let config = LevelConfig::default().with_target_rooms(5).with_grid(1, 3);
        let level = seeded(&config, 9);
        assert_eq!(level.rooms().len(), 3);
    }

    #[test]
    fn test_openings_symmetric() {
        let level = seeded(&LevelConfig::default().with_target_rooms(20), 77);
        let by_cell: FxHashMap<Cell, &Room> =
            level.rooms().iter().map(|r| (r.cell(), r)).collect();

        for room in level.rooms() {
            for dir in Direction::ALL {
                if room.openings.get(dir) {
                    let other = by_cell
                        .get(&room.cell().step(dir))
                        .expect("opening must lead to a built room");
                    assert!(other.openings.get(dir.opposite()));
                }
            }
        }
    }

    #[test]
    fn test_truncation_drops_openings_to_unbuilt_cells() {
        // 3x3 grid, only 4 rooms built: at least one carved passage must be cut.
        let config = LevelConfig::default().with_target_rooms(4).with_grid(3, 3);
        let level = seeded(&config, 21);
        let cells: rustc_hash::FxHashSet<_> = level.rooms().iter().map(Room::cell).collect();

        for room in level.rooms() {
            for dir in Direction::ALL {
                if room.openings.get(dir) {
                    assert!(cells.contains(&room.cell().step(dir)));
                }
            }
        }
        assert_eq!(level.graph().edge_count(), 3);
    }

    #[test]
    fn test_no_sealed_rooms() {
        for seed in 0..40 {
            let config = LevelConfig::default().with_target_rooms(7).with_grid(4, 4);
            let level = seeded(&config, seed);
            assert!(level.sealed_rooms().is_empty(), "seed {seed} sealed a room");
        }
    }

    #[test]
    fn test_no_duplicate_colliders() {
        let level = seeded(&LevelConfig::default().with_target_rooms(25), 5);
        let colliders = level.colliders().colliders();

        for (a, rect_a) in colliders.iter().enumerate() {
            for rect_b in &colliders[a + 1..] {
                assert_ne!(rect_a, rect_b);
            }
        }
        // Every colliding piece made it into the field.
        let colliding = level.walls().iter().filter(|w| w.collides()).count();
        assert_eq!(colliding, colliders.len());
    }

    #[test]
    fn test_single_room_is_closed() {
        let level = seeded(&LevelConfig::default().with_target_rooms(1), 0);

        assert_eq!(level.rooms().len(), 1);
        assert_eq!(level.rooms()[0].openings.count(), 0);
        assert_eq!(count(&level, WallKind::Slab), 4);
        assert_eq!(count(&level, WallKind::Jamb), 0);
        assert_eq!(count(&level, WallKind::Lintel), 0);
        assert_eq!(count(&level, WallKind::Pillar), 4);
        assert_eq!(level.rooms()[0].center(), Vec2::ZERO);
    }

    #[test]
    fn test_single_row_corridor() {
        let config = LevelConfig::default().with_target_rooms(3).with_grid(1, 3);
        let level = seeded(&config, 4);

        assert_eq!(level.graph().edge_count(), 2);
        // Two doorways: two lintels, four jambs.
        assert_eq!(count(&level, WallKind::Lintel), 2);
        assert_eq!(count(&level, WallKind::Jamb), 4);
        // Three north walls, three south walls, the far west wall and the far east wall.
        assert_eq!(count(&level, WallKind::Slab), 8);

        let xs: Vec<f32> = level.rooms().iter().map(|r| r.cx).collect();
        assert_eq!(xs, vec![-12.0, 0.0, 12.0]);
    }

    #[test]
    fn test_doorway_gap_is_passable() {
        let config = LevelConfig::default().with_target_rooms(2).with_grid(1, 2);
        let level = seeded(&config, 0);
        // The shared edge lies at x = 0; a small agent in the middle of the gap is clear.
        let door = Vec3::new(0.0, 0.0, 0.0);
        assert!(!level.colliders().overlaps(door, 0.5));
        // The same spot on a wall line away from the door is blocked.
        assert!(level.colliders().overlaps(Vec3::new(0.0, 0.0, 5.0), 0.5));
    }

    #[test]
    fn test_room_centers_idempotent() {
        let level = seeded(&LevelConfig::default().with_target_rooms(9), 21);

        let first = level.room_centers();
        let second = level.room_centers();
        let expected: Vec<Vec2> = level.rooms().iter().map(Room::center).collect();

        assert_eq!(first, second);
        assert_eq!(first, expected);
        assert_eq!(first.len(), 9);
    }

    #[test]
    fn test_room_size_scales_layout() {
        let config = LevelConfig::default()
            .with_target_rooms(3)
            .with_grid(1, 3)
            .with_room_size(8.0);
        let level = seeded(&config, 5);

        let mut xs: Vec<f32> = level.rooms().iter().map(|r| r.cx).collect();
        xs.sort_by(f32::total_cmp);
        assert_eq!(xs, vec![-8.0, 0.0, 8.0]);
        assert!((level.room_size() - 8.0).abs() < f32::EPSILON);
        assert_eq!(level.bounds(), Rect::new(-12.0, 12.0, -4.0, 4.0));
    }

    #[test]
    fn test_bounds_and_centers() {
        let config = LevelConfig::default().with_target_rooms(4).with_grid(2, 2);
        let level = seeded(&config, 3);
        let bounds = level.bounds();

        assert_eq!(bounds, Rect::new(-12.0, 12.0, -12.0, 12.0));
        let corner = level.room_containing(Vec3::new(-6.0, 0.0, -6.0));
        assert_eq!(corner.map(|i| level.rooms()[i].cell()), Some(Cell::new(0, 0)));
        assert_eq!(level.room_containing(Vec3::new(100.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_spawn_distances() {
        let level = seeded(&LevelConfig::default().with_target_rooms(16), 8);
        let spawn = level.spawn_room_index();
        let from_spawn = level.distances_from(spawn);
        assert_eq!(from_spawn[spawn], Some(0));

        let all: Vec<Vec<Option<u32>>> =
            (0..level.rooms().len()).map(|r| level.distances_from(r)).collect();
        for a in 0..all.len() {
            for b in 0..all.len() {
                for c in 0..all.len() {
                    if let (Some(ab), Some(bc), Some(ac)) = (all[a][b], all[b][c], all[a][c]) {
                        assert!(ac <= ab + bc);
                    }
                }
            }
        }
    }

    #[test]
    fn test_objective_placement() {
        let config = LevelConfig::default().with_target_rooms(3).with_grid(1, 3);
        let level = seeded(&config, 0);
        let mut rng = StdRng::seed_from_u64(1);

        // Spawn is the west end of the corridor; the goal lands at the east end.
        assert_eq!(level.spawn_position(), Vec3::new(-12.0, 0.0, 0.0));
        assert_eq!(level.farthest_room_from(level.spawn_position()), Vec3::new(12.0, 0.0, 0.0));
        assert_eq!(level.room_at_graph_distance(1, &mut rng), Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(level.room_at_graph_distance(9, &mut rng), Vec3::new(12.0, 0.0, 0.0));
    }

    #[test]
    fn test_same_seed_same_level() {
        let config = LevelConfig::default().with_target_rooms(14).with_seed(2024);
        let a = Level::generate_seeded(&config);
        let b = Level::generate_seeded(&config);

        assert_eq!(a.rooms(), b.rooms());
        assert_eq!(a.colliders().colliders(), b.colliders().colliders());
    }
}
