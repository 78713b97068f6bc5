//! Agents: health, locomotion and the player
//!
//! Enemies live in the `ai` module since their movement is driven by behavior.

mod health;
mod locomotion;
mod player;

use glam::Vec3;

pub use health::{Health, HpCallback};
pub use locomotion::{
    EnemyMotor, FlatGround, Ground, PlayerInput, PlayerMotor, forward_from_yaw, planar_distance,
    right_from_yaw, turn_towards, wrap_angle, yaw_towards,
};
pub use player::Player;

/// Something an enemy can pursue and hit.
pub trait Target {
    /// Current world position
    fn target_position(&self) -> Vec3;

    /// Collision radius used to keep pursuers from overlapping
    fn target_radius(&self) -> f32;

    /// Apply damage, returning the remaining HP
    fn receive_damage(&mut self, amount: f32) -> f32;
}
