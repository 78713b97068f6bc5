//! AI module
//!
//! Generic finite state machine and the enemy behavior built on it.

mod enemy;
mod fsm;

pub use enemy::{AttackState, ChaseState, Enemy, EnemyContext, EnemyState, IdleState};
pub use fsm::{State, StateMachine, Transition};
