//! Maze generation and level layout
//!
//! Carves a perfect maze over a grid, promotes a prefix of the visitation
//! order to rooms, and derives walls, colliders and the room graph.

mod generator;
mod graph;
mod level;
mod walls;

pub use generator::{Cell, Direction, MazeGrid, Openings};
pub use graph::RoomGraph;
pub use level::{Level, Room};
pub use walls::{WallKind, WallPiece};
