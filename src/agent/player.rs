//! Player agent

use glam::Vec3;

use super::health::Health;
use super::locomotion::{Ground, PlayerInput, PlayerMotor};
use super::Target;
use crate::core::{AgentId, PlayerConfig};
use crate::physics::CollisionField;

/// The player-controlled agent
#[derive(Debug)]
pub struct Player {
    pub id: AgentId,
    pub motor: PlayerMotor,
    pub health: Health,
}

impl Player {
    #[must_use]
    pub fn new(id: AgentId, position: Vec3, yaw: f32, config: &PlayerConfig) -> Self {
        Self {
            id,
            motor: PlayerMotor::new(position, yaw, config),
            health: Health::new(config.hp_max),
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.motor.position
    }

    /// Advance one tick. A defeated player no longer moves.
    pub fn update(
        &mut self,
        input: PlayerInput,
        dt: f32,
        field: &CollisionField,
        ground: &impl Ground,
    ) {
        if self.health.is_depleted() {
            return;
        }
        self.motor.step(input, dt, field, ground);
    }
}

impl Target for Player {
    fn target_position(&self) -> Vec3 {
        self.motor.position
    }

    fn target_radius(&self) -> f32 {
        self.motor.radius
    }

    fn receive_damage(&mut self, amount: f32) -> f32 {
        let was_alive = !self.health.is_depleted();
        let hp = self.health.damage(amount);
        if was_alive && self.health.is_depleted() {
            log::info!("player {:?} defeated", self.id);
        }
        hp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::FlatGround;

    #[test]
    fn test_player_takes_damage_as_target() {
        let mut player = Player::new(AgentId(0), Vec3::ZERO, 0.0, &PlayerConfig::default());

        assert_eq!(player.receive_damage(25.0), 75.0);
        assert_eq!(player.target_position(), Vec3::ZERO);
    }

    #[test]
    fn test_defeated_player_stops() {
        let mut player = Player::new(AgentId(0), Vec3::ZERO, 0.0, &PlayerConfig::default());
        player.receive_damage(1000.0);

        let push = PlayerInput { forward: 1.0, ..Default::default() };
        player.update(push, 0.5, &CollisionField::default(), &FlatGround);

        assert_eq!(player.position(), Vec3::ZERO);
    }
}
