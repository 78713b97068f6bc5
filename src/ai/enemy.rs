//! Enemy pursuit and attack behavior
//!
//! Transition table (evaluated once per tick, skipped while the hold timer
//! runs or a hurt reaction is active):
//!
//! | from   | to     | condition                                                        |
//! |--------|--------|------------------------------------------------------------------|
//! | idle   | chase  | distance <= aggro range                                          |
//! | chase  | idle   | distance > deaggro range                                         |
//! | chase  | attack | distance <= attack enter range and cooldown elapsed              |
//! | attack | attack | attack finished, distance <= attack exit range, cooldown elapsed |
//! | attack | chase  | attack finished and (distance > attack exit range, or cooldown   |
//! |        |        | pending and distance > deaggro range)                            |
//!
//! Every state sets a hold timer on entry. Entering attack delivers damage to
//! the target in the same tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::fsm::{State, StateMachine, Transition};
use crate::agent::{EnemyMotor, Health, Target, planar_distance};
use crate::core::{AgentId, EnemyConfig, EventQueue, GameEvent};
use crate::physics::CollisionField;

/// Behavior state of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyState {
    #[default]
    Idle,
    Chase,
    Attack,
}

/// Data shared by the enemy states
#[derive(Debug, Clone)]
pub struct EnemyContext {
    pub config: EnemyConfig,
    /// Current session time
    pub now: f32,
    /// Planar distance to the target this tick
    pub distance: f32,
    /// State the machine is in, written on entry
    pub state: EnemyState,
    /// Remaining minimum time in the current state
    pub hold: f32,
    /// When the most recent attack finished
    pub last_attack_end: f32,
    /// When the current attack started
    pub attack_started_at: f32,
    /// Damage to deliver to the target this tick
    pub pending_damage: f32,
}

impl EnemyContext {
    #[must_use]
    pub fn new(config: EnemyConfig) -> Self {
        Self {
            config,
            now: 0.0,
            distance: f32::INFINITY,
            state: EnemyState::Idle,
            hold: 0.0,
            last_attack_end: f32::NEG_INFINITY,
            attack_started_at: f32::NEG_INFINITY,
            pending_damage: 0.0,
        }
    }

    /// Whether enough time has passed since the last attack ended
    #[must_use]
    pub fn cooldown_elapsed(&self) -> bool {
        self.now - self.last_attack_end >= self.config.attack_cooldown
    }

    /// Whether the current attack has run its full duration
    #[must_use]
    pub fn attack_finished(&self) -> bool {
        self.now - self.attack_started_at >= self.config.attack_duration
    }
}

// ============================================================================
// States
// ============================================================================

#[derive(Debug, Default)]
pub struct IdleState;

impl State<EnemyContext> for IdleState {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn enter(&mut self, ctx: &mut EnemyContext) {
        ctx.state = EnemyState::Idle;
        ctx.hold = ctx.config.idle_hold;
    }

    fn update(&mut self, ctx: &mut EnemyContext) -> Transition<EnemyContext> {
        if ctx.distance <= ctx.config.aggro_range {
            return Transition::to(ChaseState);
        }
        Transition::None
    }
}

#[derive(Debug, Default)]
pub struct ChaseState;

impl State<EnemyContext> for ChaseState {
    fn name(&self) -> &'static str {
        "Chase"
    }

    fn enter(&mut self, ctx: &mut EnemyContext) {
        ctx.state = EnemyState::Chase;
        ctx.hold = ctx.config.chase_hold;
    }

    fn update(&mut self, ctx: &mut EnemyContext) -> Transition<EnemyContext> {
        if ctx.distance > ctx.config.deaggro_range() {
            return Transition::to(IdleState);
        }
        if ctx.distance <= ctx.config.attack_enter_range() && ctx.cooldown_elapsed() {
            return Transition::to(AttackState);
        }
        Transition::None
    }
}

#[derive(Debug, Default)]
pub struct AttackState;

impl State<EnemyContext> for AttackState {
    fn name(&self) -> &'static str {
        "Attack"
    }

    fn enter(&mut self, ctx: &mut EnemyContext) {
        ctx.state = EnemyState::Attack;
        ctx.hold = ctx.config.attack_hold;
        ctx.attack_started_at = ctx.now;
        ctx.pending_damage += ctx.config.attack_damage;
    }

    fn update(&mut self, ctx: &mut EnemyContext) -> Transition<EnemyContext> {
        if !ctx.attack_finished() {
            return Transition::None;
        }
        ctx.last_attack_end = ctx.attack_started_at + ctx.config.attack_duration;

        let in_reach = ctx.distance <= ctx.config.attack_exit_range();
        if in_reach && ctx.cooldown_elapsed() {
            return Transition::to(AttackState);
        }
        let waiting_too_far = !ctx.cooldown_elapsed() && ctx.distance > ctx.config.deaggro_range();
        if !in_reach || waiting_too_far {
            return Transition::to(ChaseState);
        }
        Transition::None
    }
}

// ============================================================================
// Enemy
// ============================================================================

/// A pursuing enemy: movement, health, behavior and hurt reaction
#[derive(Debug)]
pub struct Enemy {
    pub id: AgentId,
    pub motor: EnemyMotor,
    pub health: Health,
    fsm: StateMachine<EnemyContext>,
    ctx: EnemyContext,
    hurt_until: f32,
    invuln_until: f32,
}

impl Enemy {
    #[must_use]
    pub fn new(id: AgentId, position: Vec3, yaw: f32, config: &EnemyConfig) -> Self {
        let mut ctx = EnemyContext::new(config.clone());
        let mut fsm = StateMachine::new(IdleState);
        fsm.start(&mut ctx);
        // No hold on spawn: the first tick may already react.
        ctx.hold = 0.0;

        Self {
            id,
            motor: EnemyMotor::new(position, yaw, config),
            health: Health::new(config.hp_max),
            fsm,
            ctx,
            hurt_until: f32::NEG_INFINITY,
            invuln_until: f32::NEG_INFINITY,
        }
    }

    #[must_use]
    pub fn state(&self) -> EnemyState {
        self.ctx.state
    }

    /// Name of the active behavior state, for logs and debug overlays
    #[must_use]
    pub fn behavior_name(&self) -> &'static str {
        self.fsm.current_state_name()
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.motor.position
    }

    #[must_use]
    pub fn config(&self) -> &EnemyConfig {
        &self.ctx.config
    }

    /// Remaining hold time in the current state
    #[must_use]
    pub fn hold_remaining(&self) -> f32 {
        self.ctx.hold
    }

    #[must_use]
    pub fn is_hurt(&self, now: f32) -> bool {
        now < self.hurt_until
    }

    #[must_use]
    pub fn is_invulnerable(&self, now: f32) -> bool {
        now < self.invuln_until
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health.is_depleted()
    }

    /// Advance one tick: timers, transitions, damage delivery, then movement.
    ///
    /// A defeated enemy is inert; removing it is up to the host.
    pub fn update(
        &mut self,
        dt: f32,
        now: f32,
        target: &mut impl Target,
        field: &CollisionField,
        events: &mut EventQueue,
    ) {
        if self.is_defeated() {
            return;
        }

        let dt = dt.max(0.0);
        let target_position = target.target_position();
        self.ctx.now = now;
        self.ctx.hold = (self.ctx.hold - dt).max(0.0);
        self.ctx.distance = planar_distance(self.motor.position, target_position);

        let hurt = self.is_hurt(now);
        if !hurt && self.ctx.hold <= 0.0 {
            let from = self.ctx.state;
            if self.fsm.update(&mut self.ctx) {
                let to = self.ctx.state;
                log::debug!(
                    "enemy {:?}: {:?} -> {} at distance {:.2}",
                    self.id,
                    from,
                    self.fsm.current_state_name(),
                    self.ctx.distance
                );
                events.push(GameEvent::EnemyStateChanged {
                    enemy: self.id,
                    from,
                    to,
                });
            }
        }

        let damage = std::mem::take(&mut self.ctx.pending_damage);
        if damage > 0.0 {
            let target_hp = target.receive_damage(damage);
            events.push(GameEvent::TargetAttacked {
                attacker: self.id,
                damage,
                target_hp,
            });
        }

        self.motor.speed = match self.ctx.state {
            EnemyState::Chase if !hurt => self.ctx.config.chase_speed,
            _ => 0.0,
        };
        let face = match self.ctx.state {
            EnemyState::Chase | EnemyState::Attack if !hurt => Some(target_position),
            _ => None,
        };
        self.motor.step(
            face,
            dt,
            field,
            Some((target_position, target.target_radius())),
        );
    }

    /// Apply damage and start the hurt reaction.
    ///
    /// Returns `false` when the hit was ignored (invulnerable, defeated, or a
    /// non-positive amount). `source` is where the hit came from; with a
    /// non-zero knockback the enemy is pushed away from it.
    pub fn take_damage(
        &mut self,
        amount: f32,
        source: Option<Vec3>,
        now: f32,
        field: &CollisionField,
        events: &mut EventQueue,
    ) -> bool {
        if amount <= 0.0 || self.is_defeated() {
            return false;
        }
        if self.is_invulnerable(now) {
            log::trace!("enemy {:?} ignored {amount} damage", self.id);
            events.push(GameEvent::DamageIgnored { enemy: self.id });
            return false;
        }

        let hp = self.health.damage(amount);
        self.hurt_until = now + self.ctx.config.hurt_duration;
        self.invuln_until = now + self.ctx.config.invuln_duration;
        self.motor.speed = 0.0;

        if let Some(source) = source
            && self.ctx.config.knockback > 0.0
        {
            let away = Vec3::new(
                self.motor.position.x - source.x,
                0.0,
                self.motor.position.z - source.z,
            )
            .normalize_or_zero();
            self.motor.shove(away * self.ctx.config.knockback, field);
        }

        log::debug!("enemy {:?} hurt for {amount}, {hp} HP left", self.id);
        events.push(GameEvent::EnemyHurt {
            enemy: self.id,
            amount,
            hp,
            position: self.motor.position,
        });
        if self.health.is_depleted() {
            log::info!("enemy {:?} defeated", self.id);
            events.push(GameEvent::AgentDefeated { agent: self.id });
        }
        true
    }
}
