//! Session orchestration for hosts that want a ready-made game loop
//!
//! Owns the level, the player, enemies, the clock and the event queue, and
//! reports the outcome each step. Hosts with their own orchestration can use
//! the underlying modules directly.

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::agent::{FlatGround, Player, PlayerInput, planar_distance};
use crate::ai::Enemy;
use crate::core::{AgentId, EventQueue, GameConfig, GameEvent, Time};
use crate::maze::Level;

/// How the session currently stands. Reported, never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Playing,
    /// The player reached the goal
    Won,
    /// The player's HP reached zero
    Lost,
}

/// A running game
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    level: Level,
    player: Player,
    enemies: Vec<Enemy>,
    goal: Vec3,
    time: Time,
    events: EventQueue,
    rng: StdRng,
    outcome: Outcome,
    next_id: u32,
}

impl Session {
    /// Generate a level and place the player, goal and first enemy.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let mut rng = match config.level.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let level = Level::generate(&config.level, &mut rng);

        let spawn = level.spawn_position();
        let goal = level.farthest_room_from(spawn);
        let player = Player::new(AgentId(0), spawn, 0.0, &config.player);

        let mut session = Self {
            config,
            level,
            player,
            enemies: Vec::new(),
            goal,
            time: Time::new(),
            events: EventQueue::new(),
            rng,
            outcome: Outcome::Playing,
            next_id: 1,
        };

        let enemy_spawn = session
            .level
            .room_at_graph_distance(session.config.enemy_spawn_steps, &mut session.rng);
        if session.level.room_containing(enemy_spawn) != Some(session.level.spawn_room_index()) {
            session.spawn_enemy(enemy_spawn);
        }

        log::info!(
            "session ready: spawn {spawn}, goal {goal}, {} enemies",
            session.enemies.len()
        );
        session
    }

    /// Add an enemy at `position`, returning its id.
    pub fn spawn_enemy(&mut self, position: Vec3) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.enemies.push(Enemy::new(id, position, 0.0, &self.config.enemy));
        id
    }

    /// Advance the whole session by `dt` seconds.
    ///
    /// Events emitted during the previous step are available from
    /// [`Session::events`] until the next call.
    pub fn step(&mut self, input: PlayerInput, dt: f32) -> Outcome {
        self.events.swap();
        if self.outcome != Outcome::Playing {
            return self.outcome;
        }

        self.time.advance(dt);
        let dt = self.time.delta_seconds();
        let now = self.time.now();
        let field = self.level.colliders();

        self.player.update(input, dt, field, &FlatGround);
        for enemy in &mut self.enemies {
            enemy.update(dt, now, &mut self.player, field, &mut self.events);
        }

        self.outcome = if self.player.health.is_depleted() {
            Outcome::Lost
        } else if planar_distance(self.player.position(), self.goal) <= self.config.goal_radius {
            self.events.push(GameEvent::GoalReached {
                position: self.player.position(),
            });
            Outcome::Won
        } else {
            Outcome::Playing
        };

        if self.outcome != Outcome::Playing {
            log::info!("session over at t={:.2}: {:?}", now, self.outcome);
        }
        self.outcome
    }

    /// Player melee: damage every enemy within `reach`. Returns the number hit.
    pub fn strike(&mut self, damage: f32, reach: f32) -> usize {
        let origin = self.player.position();
        let now = self.time.now();
        let field = self.level.colliders();

        self.enemies
            .iter_mut()
            .filter(|enemy| planar_distance(enemy.position(), origin) <= reach)
            .map(|enemy| enemy.take_damage(damage, Some(origin), now, field, &mut self.events))
            .filter(|&hit| hit)
            .count()
    }

    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Goal position (center of the room farthest from spawn)
    #[must_use]
    pub fn goal(&self) -> Vec3 {
        self.goal
    }

    #[must_use]
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Events emitted during the previous step
    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
