//! Room adjacency graph and breadth-first distance queries
//!
//! Nodes are built rooms (indexed 0..R-1), edges are doorways. All queries
//! return a defined fallback on an empty graph instead of panicking.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

/// Undirected, unweighted graph over room centers
#[derive(Debug, Clone, Default)]
pub struct RoomGraph {
    /// Room centers in the XZ plane (x -> x, y -> z)
    centers: Vec<Vec2>,
    /// Neighbor lists; a grid room has at most four doorways
    adjacency: Vec<SmallVec<[usize; 4]>>,
}

impl RoomGraph {
    /// Build a graph from room centers and undirected edges.
    ///
    /// Edges referencing unknown rooms, self-loops and duplicates are ignored.
    #[must_use]
    pub fn new(centers: Vec<Vec2>, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut adjacency = vec![SmallVec::new(); centers.len()];

        for (a, b) in edges {
            if a == b || a >= centers.len() || b >= centers.len() {
                continue;
            }
            if !adjacency[a].contains(&b) {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }

        Self { centers, adjacency }
    }

    /// Number of rooms
    #[must_use]
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Number of undirected edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(SmallVec::len).sum::<usize>() / 2
    }

    /// Rooms directly connected to `room`
    #[must_use]
    pub fn neighbors(&self, room: usize) -> &[usize] {
        self.adjacency.get(room).map_or(&[], |n| n.as_slice())
    }

    /// Whether a doorway connects `a` and `b`
    #[must_use]
    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Center of a room in the XZ plane (origin for unknown rooms)
    #[must_use]
    pub fn center(&self, room: usize) -> Vec2 {
        self.centers.get(room).copied().unwrap_or(Vec2::ZERO)
    }

    /// BFS hop counts from `start` to every room; `None` marks unreachable rooms.
    ///
    /// An out-of-range `start` reaches nothing.
    #[must_use]
    pub fn distances_from(&self, start: usize) -> Vec<Option<u32>> {
        let mut distances = vec![None; self.len()];
        if start >= self.len() {
            return distances;
        }

        let mut queue = VecDeque::with_capacity(self.len());
        distances[start] = Some(0);
        queue.push_back(start);

        while let Some(room) = queue.pop_front() {
            let next = distances[room].map_or(0, |d| d + 1);
            for &neighbor in &self.adjacency[room] {
                if distances[neighbor].is_none() {
                    distances[neighbor] = Some(next);
                    queue.push_back(neighbor);
                }
            }
        }

        distances
    }

    /// Room whose center is closest to (x, z). Returns 0 on an empty graph.
    #[must_use]
    pub fn nearest_room_to(&self, x: f32, z: f32) -> usize {
        let point = Vec2::new(x, z);
        let mut best = 0;
        let mut best_distance = f32::INFINITY;

        for (index, center) in self.centers.iter().enumerate() {
            let distance = center.distance_squared(point);
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }

        best
    }

    /// Reachable room with the largest hop count from `start`, lowest index on ties.
    #[must_use]
    pub fn farthest_room_index(&self, start: usize) -> usize {
        if start >= self.len() {
            return 0;
        }

        let mut best = start;
        let mut best_distance = 0;

        for (index, distance) in self.distances_from(start).into_iter().enumerate() {
            if let Some(distance) = distance
                && distance > best_distance
            {
                best_distance = distance;
                best = index;
            }
        }

        best
    }

    /// Center of the room graph-farthest from the room nearest to `position`.
    ///
    /// Returns the origin on an empty graph.
    #[must_use]
    pub fn farthest_room_from(&self, position: Vec3) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        let start = self.nearest_room_to(position.x, position.z);
        let center = self.center(self.farthest_room_index(start));
        Vec3::new(center.x, 0.0, center.y)
    }

    /// Pick a room by hop count from `start`.
    ///
    /// Uniformly random among rooms exactly `steps` away; otherwise uniformly
    /// random among rooms further than `steps`; otherwise the farthest
    /// reachable room. Unreachable rooms are never picked.
    pub fn room_at_graph_distance<R: Rng + ?Sized>(
        &self,
        start: usize,
        steps: u32,
        rng: &mut R,
    ) -> usize {
        if self.is_empty() {
            return 0;
        }

        let distances = self.distances_from(start);
        let collect = |keep: &dyn Fn(u32) -> bool| -> SmallVec<[usize; 16]> {
            distances
                .iter()
                .enumerate()
                .filter_map(|(index, d)| d.filter(|&d| keep(d)).map(|_| index))
                .collect()
        };

        let exact = collect(&|d| d == steps);
        if let Some(&room) = exact.choose(rng) {
            return room;
        }

        let beyond = collect(&|d| d > steps);
        if let Some(&room) = beyond.choose(rng) {
            return room;
        }

        self.farthest_room_index(start)
    }
}
