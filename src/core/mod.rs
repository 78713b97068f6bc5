//! Core module
//!
//! Configuration, simulation clock and gameplay events

pub mod config;
mod events;
mod time;

pub use config::{ConfigError, EnemyConfig, GameConfig, LevelConfig, PlayerConfig};
pub use events::{AgentId, EventQueue, GameEvent};
pub use time::Time;
