//! Integrate-then-resolve movement shared by the player and enemies
//!
//! Heading convention: yaw 0 faces -Z, positive yaw turns toward -X
//! (a right-handed rotation about +Y). Every step integrates heading and
//! position first, then resolves against the collision field.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec2, Vec3};

use crate::core::{EnemyConfig, PlayerConfig};
use crate::physics::{CollisionField, separate};

/// Ground height provider. Floors are flat today; the hook keeps room for
/// ramps and uneven terrain.
pub trait Ground {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

/// Flat floor at y = 0
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround;

impl Ground for FlatGround {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        0.0
    }
}

/// Wrap an angle into (-π, π].
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Unit forward vector for a yaw
#[must_use]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Quat::from_rotation_y(yaw) * Vec3::NEG_Z
}

/// Unit right vector for a yaw
#[must_use]
pub fn right_from_yaw(yaw: f32) -> Vec3 {
    Quat::from_rotation_y(yaw) * Vec3::X
}

/// Yaw that faces from `from` toward `to` in the XZ plane
#[must_use]
pub fn yaw_towards(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    (-d.x).atan2(-d.z)
}

/// Turn `current` toward `desired` by at most `max_step` radians, the short way round.
#[must_use]
pub fn turn_towards(current: f32, desired: f32, max_step: f32) -> f32 {
    let delta = wrap_angle(desired - current);
    let step = delta.clamp(-max_step.abs(), max_step.abs());
    wrap_angle(current + step)
}

/// Distance between two points ignoring height
#[must_use]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// One frame of player control input, each axis in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// +1 forward, -1 backward
    pub forward: f32,
    /// +1 right, -1 left
    pub strafe: f32,
    /// +1 turns left (positive yaw), -1 turns right
    pub turn: f32,
}

/// Player movement state
#[derive(Debug, Clone)]
pub struct PlayerMotor {
    pub position: Vec3,
    pub yaw: f32,
    /// Local velocity: x = forward, y = strafe
    pub velocity: Vec2,
    pub radius: f32,
    acceleration: f32,
    decay: Vec2,
    turn_step: f32,
}

impl PlayerMotor {
    #[must_use]
    pub fn new(position: Vec3, yaw: f32, config: &PlayerConfig) -> Self {
        Self {
            position,
            yaw: wrap_angle(yaw),
            velocity: Vec2::ZERO,
            radius: config.radius,
            acceleration: config.acceleration,
            decay: config.velocity_decay.max(Vec2::ZERO),
            turn_step: config.turn_step,
        }
    }

    /// Unit forward vector
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    /// Advance one tick.
    pub fn step(
        &mut self,
        input: PlayerInput,
        dt: f32,
        field: &CollisionField,
        ground: &impl Ground,
    ) {
        let dt = dt.max(0.0);

        if input.turn != 0.0 {
            self.yaw = wrap_angle(self.yaw + input.turn.signum() * self.turn_step);
        }

        let thrust = Vec2::new(input.forward.clamp(-1.0, 1.0), input.strafe.clamp(-1.0, 1.0));
        self.velocity += thrust * self.acceleration * dt;
        self.velocity *= Vec2::new((-self.decay.x * dt).exp(), (-self.decay.y * dt).exp());

        let travel =
            forward_from_yaw(self.yaw) * self.velocity.x + right_from_yaw(self.yaw) * self.velocity.y;
        let mut next = self.position + travel * dt;
        next.y = ground.height_at(next.x, next.z);

        self.position = field.resolve(next, self.radius);
    }
}

/// Enemy movement state
#[derive(Debug, Clone)]
pub struct EnemyMotor {
    pub position: Vec3,
    pub yaw: f32,
    /// Current forward speed; set by behavior each tick
    pub speed: f32,
    pub radius: f32,
    turn_speed: f32,
}

impl EnemyMotor {
    #[must_use]
    pub fn new(position: Vec3, yaw: f32, config: &EnemyConfig) -> Self {
        Self {
            position,
            yaw: wrap_angle(yaw),
            speed: 0.0,
            radius: config.radius,
            turn_speed: config.turn_speed,
        }
    }

    #[must_use]
    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    /// Advance one tick: turn toward `face` (if any), move along the heading,
    /// resolve against walls, then keep clear of the target circle.
    pub fn step(
        &mut self,
        face: Option<Vec3>,
        dt: f32,
        field: &CollisionField,
        target: Option<(Vec3, f32)>,
    ) {
        let dt = dt.max(0.0);

        if let Some(point) = face
            && planar_distance(point, self.position) > f32::EPSILON
        {
            let desired = yaw_towards(self.position, point);
            self.yaw = turn_towards(self.yaw, desired, self.turn_speed * dt);
        }

        let next = self.position + forward_from_yaw(self.yaw) * self.speed * dt;
        self.position = field.resolve(next, self.radius);

        if let Some((target_position, target_radius)) = target {
            self.position = separate(self.position, target_position, self.radius, target_radius);
        }
    }

    /// Instant displacement, resolved against the field.
    pub fn shove(&mut self, offset: Vec3, field: &CollisionField) {
        let next = self.position + Vec3::new(offset.x, 0.0, offset.z);
        self.position = field.resolve(next, self.radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Rect;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn test_wrap_angle_range() {
        assert_close(wrap_angle(0.0), 0.0);
        assert_close(wrap_angle(PI), PI);
        assert_close(wrap_angle(-PI), PI);
        assert_close(wrap_angle(3.0 * PI / 2.0), -PI / 2.0);
        assert_close(wrap_angle(-3.0 * PI / 2.0), PI / 2.0);
        assert_close(wrap_angle(5.0 * TAU + 0.25), 0.25);
        assert_eq!(wrap_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_heading_convention() {
        let f = forward_from_yaw(0.0);
        assert_close(f.z, -1.0);

        let f = forward_from_yaw(PI / 2.0);
        assert_close(f.x, -1.0);

        assert_close(yaw_towards(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0)), 0.0);
        assert_close(yaw_towards(Vec3::ZERO, Vec3::new(-5.0, 0.0, 0.0)), PI / 2.0);
        assert_close(right_from_yaw(0.0).x, 1.0);
    }

    #[test]
    fn test_turn_takes_short_way() {
        // From just below +π to just above -π is a small positive turn.
        let current = PI - 0.1;
        let desired = -PI + 0.1;
        let turned = turn_towards(current, desired, 0.05);
        assert_close(turned, PI - 0.05);

        // Capped by max step.
        assert_close(turn_towards(0.0, 1.0, 0.3), 0.3);
        assert_close(turn_towards(0.0, -1.0, 0.3), -0.3);
        // Within reach lands exactly.
        assert_close(turn_towards(0.0, 0.2, 0.3), 0.2);
    }

    #[test]
    fn test_player_accelerates_and_decays() {
        let config = PlayerConfig::default();
        let field = CollisionField::default();
        let mut motor = PlayerMotor::new(Vec3::ZERO, 0.0, &config);

        let push = PlayerInput { forward: 1.0, ..Default::default() };
        for _ in 0..30 {
            motor.step(push, 1.0 / 60.0, &field, &FlatGround);
        }
        assert!(motor.velocity.x > 0.0);
        assert!(motor.position.z < 0.0, "moved forward along -Z");
        assert_eq!(motor.position.y, 0.0);

        let speed = motor.velocity.x;
        motor.step(PlayerInput::default(), 1.0 / 60.0, &field, &FlatGround);
        assert!(motor.velocity.x < speed, "velocity decays without input");
    }

    #[test]
    fn test_player_turn_is_discrete() {
        let config = PlayerConfig { turn_step: 0.1, ..Default::default() };
        let field = CollisionField::default();
        let mut motor = PlayerMotor::new(Vec3::ZERO, 0.0, &config);

        let turn = PlayerInput { turn: 0.3, ..Default::default() };
        motor.step(turn, 1.0, &field, &FlatGround);
        motor.step(turn, 0.001, &field, &FlatGround);
        assert_close(motor.yaw, 0.2);
    }

    #[test]
    fn test_player_blocked_by_wall() {
        let config = PlayerConfig::default();
        let field = CollisionField::new([Rect::new(-5.0, 5.0, -2.0, -1.5)]);
        let mut motor = PlayerMotor::new(Vec3::ZERO, 0.0, &config);

        let push = PlayerInput { forward: 1.0, ..Default::default() };
        for _ in 0..240 {
            motor.step(push, 1.0 / 60.0, &field, &FlatGround);
            assert!(!field.overlaps(motor.position, motor.radius));
        }
        assert_close(motor.position.z, -1.5 + motor.radius);
    }

    #[test]
    fn test_ground_height_applied() {
        struct Ramp;
        impl Ground for Ramp {
            fn height_at(&self, x: f32, _z: f32) -> f32 {
                x * 0.5
            }
        }

        let config = PlayerConfig::default();
        let mut motor = PlayerMotor::new(Vec3::ZERO, 0.0, &config);
        let strafe = PlayerInput { strafe: 1.0, ..Default::default() };
        motor.step(strafe, 0.1, &CollisionField::default(), &Ramp);

        assert!(motor.position.x > 0.0);
        assert_close(motor.position.y, motor.position.x * 0.5);
    }

    #[test]
    fn test_enemy_turns_then_moves() {
        let config = EnemyConfig { turn_speed: 1.0, ..Default::default() };
        let field = CollisionField::default();
        let mut motor = EnemyMotor::new(Vec3::ZERO, 0.0, &config);
        motor.speed = 2.0;

        // Target behind: the turn is capped at turn_speed * dt.
        motor.step(Some(Vec3::new(0.0, 0.0, 10.0)), 0.5, &field, None);
        assert_close(motor.yaw.abs(), 0.5);
        assert_close(planar_distance(motor.position, Vec3::ZERO), 1.0);
    }

    #[test]
    fn test_enemy_separates_from_target() {
        let config = EnemyConfig::default();
        let field = CollisionField::default();
        let mut motor = EnemyMotor::new(Vec3::ZERO, 0.0, &config);
        motor.speed = 5.0;

        let target = Vec3::new(0.0, 0.0, -1.0);
        motor.step(Some(target), 0.1, &field, Some((target, 0.5)));

        let gap = planar_distance(motor.position, target);
        assert!(gap >= motor.radius + 0.5 - 1e-4);
    }
}
