//! Headless demo: generate a level and walk the player toward the goal

use maze_core::agent::{wrap_angle, yaw_towards};
use maze_core::prelude::*;

const FRAME_DT: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 60 * 120;
const STRIKE_DAMAGE: f32 = 20.0;
const STRIKE_REACH: f32 = 1.6;

/// Scripted pilot: follows the room graph toward the goal, striking enemies in reach.
struct Autopilot {
    route: Vec<Vec3>,
    next: usize,
}

impl Autopilot {
    fn new(session: &Session) -> Self {
        let level = session.level();
        let goal_room = level
            .room_containing(session.goal())
            .unwrap_or(level.spawn_room_index());
        let distances = level.distances_from(goal_room);

        // Walk down the distance gradient from spawn to goal.
        let mut route = Vec::new();
        let mut room = level.spawn_room_index();
        while let Some(Some(d)) = distances.get(room).copied()
            && d > 0
        {
            let Some(next) = level
                .graph()
                .neighbors(room)
                .iter()
                .copied()
                .find(|&n| distances[n] == Some(d - 1))
            else {
                break;
            };
            route.push(level.rooms()[next].floor_center());
            room = next;
        }

        Self { route, next: 0 }
    }

    fn input(&mut self, player: &Player) -> PlayerInput {
        let Some(&waypoint) = self.route.get(self.next) else {
            return PlayerInput::default();
        };
        let position = player.position();
        if (waypoint - position).length() < 0.75 {
            self.next += 1;
            return PlayerInput::default();
        }

        let desired = yaw_towards(position, waypoint);
        let error = wrap_angle(desired - player.motor.yaw);

        PlayerInput {
            forward: if error.abs() < 0.3 { 1.0 } else { 0.0 },
            strafe: 0.0,
            turn: if error.abs() > 0.05 { error.signum() } else { 0.0 },
        }
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(7);

    let config = GameConfig {
        level: LevelConfig::default().with_seed(seed),
        ..GameConfig::default()
    };
    let mut session = Session::new(config);
    let mut pilot = Autopilot::new(&session);

    log::info!(
        "seed {seed}: {} rooms, {} colliders, route of {} rooms",
        session.level().rooms().len(),
        session.level().colliders().len(),
        pilot.route.len()
    );

    let mut outcome = Outcome::Playing;
    for _ in 0..MAX_FRAMES {
        let input = pilot.input(session.player());
        outcome = session.step(input, FRAME_DT);

        for event in session.events().iter() {
            log::debug!("{event:?}");
        }
        if session
            .enemies()
            .iter()
            .any(|enemy| enemy.state() == EnemyState::Attack)
        {
            session.strike(STRIKE_DAMAGE, STRIKE_REACH);
        }
        if outcome != Outcome::Playing {
            break;
        }
    }

    log::info!(
        "finished after {:.1}s with {:?}, player hp {:.0}",
        session.time().now(),
        outcome,
        session.player().health.current()
    );
}
