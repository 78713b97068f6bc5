//! Event Queue for Gameplay Notifications
//!
//! Agents report what happened during their update (attacks, hurt reactions,
//! state changes, defeats) by pushing events here. Hosts drain them on the
//! following frame to drive audio, HUD updates and effects, so the core never
//! calls into presentation code directly.
//!
//! The queue is double-buffered: events pushed during frame N become visible
//! after the `swap()` at the start of frame N+1.
//!
//! # Example
//!
//! ```ignore
//! enemy.update(dt, now, &mut player, level.colliders(), &mut events);
//!
//! // next frame
//! events.swap();
//! for event in events.iter() {
//!     if let GameEvent::TargetAttacked { damage, .. } = event {
//!         play_hit_sound(*damage);
//!     }
//! }
//! ```

use std::collections::VecDeque;

use glam::Vec3;

use crate::ai::EnemyState;

/// Identifies an agent in emitted events. Assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AgentId(pub u32);

// ============================================================================
// Event Types
// ============================================================================

/// Gameplay events emitted by the core.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameEvent {
    /// An enemy started an attack and dealt damage to its target.
    TargetAttacked {
        /// The attacking enemy
        attacker: AgentId,
        /// Damage delivered
        damage: f32,
        /// Target HP after the hit
        target_hp: f32,
    },

    /// An enemy changed behavior state.
    EnemyStateChanged {
        enemy: AgentId,
        from: EnemyState,
        to: EnemyState,
    },

    /// An enemy took damage and started its hurt reaction.
    EnemyHurt {
        enemy: AgentId,
        /// Damage applied
        amount: f32,
        /// HP after the hit
        hp: f32,
        /// Position after knockback
        position: Vec3,
    },

    /// Damage was dropped because the enemy was still invulnerable.
    DamageIgnored { enemy: AgentId },

    /// An agent's HP reached zero. Removal is up to the host.
    AgentDefeated { agent: AgentId },

    /// The player reached the goal.
    GoalReached { position: Vec3 },
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue for frame-consistent event processing.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this frame
    pending: VecDeque<GameEvent>,
    /// Events from previous frame, ready for processing
    processing: VecDeque<GameEvent>,
}

impl EventQueue {
    const DEFAULT_CAPACITY: usize = 32;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event to be processed next frame.
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues.
    ///
    /// Call this once per frame, before agents update.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous frame.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.processing.iter()
    }

    /// Drain all events from the previous frame.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.processing.drain(..)
    }

    /// Check if there are any events to process.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Number of events ready for processing.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Number of events written this frame.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Iterate over events written this frame, before the swap.
    pub fn pending(&self) -> impl Iterator<Item = &GameEvent> {
        self.pending.iter()
    }

    /// Clear both buffers.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
