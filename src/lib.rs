//! Procedural maze levels with enemy AI
//!
//! This crate provides:
//! - Maze carving on a grid with a randomized depth-first search
//! - Room graphs with breadth-first distance queries for spawn placement
//! - Axis-aligned wall colliders with circle push-out
//! - Player and enemy locomotion on the ground plane
//! - An idle/chase/attack enemy state machine with hurt reactions
//!
//! Rendering, audio and input devices are left to the host.

pub mod agent;
pub mod ai;
pub mod core;
pub mod maze;
pub mod physics;
pub mod session;

// Re-exports for convenience
pub use glam;
pub use rand;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::agent::{Health, Player, PlayerInput, PlayerMotor, Target};
    pub use crate::ai::{Enemy, EnemyState};
    pub use crate::core::{AgentId, EventQueue, GameConfig, GameEvent, LevelConfig, Time};
    pub use crate::maze::{Level, Room, RoomGraph};
    pub use crate::physics::{CollisionField, Rect};
    pub use crate::session::{Outcome, Session};
    pub use glam::{Vec2, Vec3};
}
