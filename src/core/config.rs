//! Tunable parameters for level generation and agents
//!
//! Every struct has sensible defaults, so a config file only needs to list
//! the values it overrides. Files can be stored as RON or JSON.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Room count used when the requested count is not positive.
pub const DEFAULT_TARGET_ROOMS: i32 = 12;

/// Level generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Requested number of rooms (non-positive clamps to the default)
    pub target_rooms: i32,
    /// Force the carving grid to (rows, cols) instead of deriving it
    pub grid: Option<(usize, usize)>,
    /// Side length of a square room in world units
    pub room_size: f32,
    /// Wall slab thickness
    pub wall_thickness: f32,
    /// Width of the gap left in a wall for a doorway
    pub door_width: f32,
    /// Side length of a square pillar
    pub pillar_size: f32,
    /// Distance from a room corner to the pillar center, along each axis
    pub pillar_inset: f32,
    /// Seed for reproducible levels (None draws from entropy)
    pub seed: Option<u64>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            target_rooms: DEFAULT_TARGET_ROOMS,
            grid: None,
            room_size: 12.0,
            wall_thickness: 0.4,
            door_width: 3.0,
            pillar_size: 0.8,
            pillar_inset: 1.6,
            seed: None,
        }
    }
}

impl LevelConfig {
    /// Set the requested room count
    pub fn with_target_rooms(mut self, target_rooms: i32) -> Self {
        self.target_rooms = target_rooms;
        self
    }

    /// Force the carving grid shape
    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.grid = Some((rows, cols));
        self
    }

    /// Set the room side length
    pub fn with_room_size(mut self, room_size: f32) -> Self {
        self.room_size = room_size;
        self
    }

    /// Use a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Requested room count after clamping non-positive values.
    #[must_use]
    pub fn effective_target_rooms(&self) -> usize {
        if self.target_rooms > 0 {
            self.target_rooms as usize
        } else {
            log::warn!(
                "target_rooms = {} is not positive, using {DEFAULT_TARGET_ROOMS}",
                self.target_rooms
            );
            DEFAULT_TARGET_ROOMS as usize
        }
    }
}

/// Player movement and health parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Collision radius
    pub radius: f32,
    /// Maximum hit points
    pub hp_max: f32,
    /// Acceleration applied per unit of input, in units/s²
    pub acceleration: f32,
    /// Exponential decay rate per axis (x = forward, y = strafe), in 1/s
    pub velocity_decay: Vec2,
    /// Yaw change applied per tick while a turn key is held, in radians
    pub turn_step: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            hp_max: 100.0,
            acceleration: 40.0,
            velocity_decay: Vec2::new(6.0, 8.0),
            turn_step: 0.04,
        }
    }
}

/// Enemy behavior parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Collision radius
    pub radius: f32,
    /// Maximum hit points
    pub hp_max: f32,
    /// Movement speed while chasing
    pub chase_speed: f32,
    /// Maximum turn rate in radians per second
    pub turn_speed: f32,
    /// Distance at which an idle enemy starts chasing
    pub aggro_range: f32,
    /// Center distance at which enemy and target touch
    pub contact_radius: f32,
    /// Extra reach beyond contact for starting an attack
    pub attack_margin: f32,
    /// Extra reach an ongoing attack keeps before falling back to chase
    pub attack_hysteresis: f32,
    /// Minimum time between the end of one attack and the start of the next
    pub attack_cooldown: f32,
    /// Length of one attack
    pub attack_duration: f32,
    /// Damage dealt when an attack starts
    pub attack_damage: f32,
    /// Minimum time spent in idle once entered
    pub idle_hold: f32,
    /// Minimum time spent in chase once entered
    pub chase_hold: f32,
    /// Minimum time spent in attack once entered
    pub attack_hold: f32,
    /// Length of the hurt reaction
    pub hurt_duration: f32,
    /// Damage immunity after being hit
    pub invuln_duration: f32,
    /// Push-back distance applied when hit (0 disables knockback)
    pub knockback: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            radius: 0.6,
            hp_max: 60.0,
            chase_speed: 3.5,
            turn_speed: 4.0,
            aggro_range: 10.0,
            contact_radius: 1.1,
            attack_margin: 0.4,
            attack_hysteresis: 0.6,
            attack_cooldown: 1.2,
            attack_duration: 0.8,
            attack_damage: 10.0,
            idle_hold: 0.2,
            chase_hold: 0.3,
            attack_hold: 0.1,
            hurt_duration: 0.4,
            invuln_duration: 0.0,
            knockback: 0.0,
        }
    }
}

impl EnemyConfig {
    /// Distance beyond which a chasing enemy gives up.
    #[must_use]
    pub fn deaggro_range(&self) -> f32 {
        self.aggro_range * 1.25
    }

    /// Distance at which an attack may start.
    #[must_use]
    pub fn attack_enter_range(&self) -> f32 {
        self.contact_radius + self.attack_margin
    }

    /// Distance within which an attack may repeat.
    #[must_use]
    pub fn attack_exit_range(&self) -> f32 {
        self.attack_enter_range() + self.attack_hysteresis
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub level: LevelConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    /// Distance from the goal at which the player wins
    pub goal_radius: f32,
    /// Graph distance from the spawn room used for enemy placement
    pub enemy_spawn_steps: u32,
}

impl GameConfig {
    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        ron::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Save the config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level: LevelConfig::default(),
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            goal_radius: 1.5,
            enemy_spawn_steps: 3,
        }
    }
}

/// Errors that can occur while reading or writing config files
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
