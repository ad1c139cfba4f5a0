//! Engine tuning loaded from `config.toml`.
//!
//! These are the gameplay constants that are not part of world content: speeds, ranges,
//! durations and the enemy AI parameters. Every field has a default, so a partial file only
//! overrides what it names, and a missing or broken file falls back to the defaults entirely.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete tuning configuration for a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Player walking speed in world units per second.
    pub player_speed: f32,
    /// Maximum distance at which a sword swing defeats an enemy.
    pub attack_range: f32,
    /// How long attack input stays locked after a swing.
    pub attack_lockout_ms: u64,
    /// How long a transient message stays on screen.
    pub message_duration_ms: u64,
    /// Hearts lost when an enemy touches the player.
    pub contact_damage: u32,
    /// Enemy patrol speed in world units per second.
    pub enemy_speed: f32,
    /// Health of a freshly spawned enemy.
    pub enemy_health: u32,
    /// Probability per tick that a patrolling enemy picks a new direction.
    pub enemy_turn_chance: f64,
    /// Interval between enemy respawn checks.
    pub respawn_interval_ms: u64,
    /// Distance a block moves per push.
    pub block_step: f32,
    pub world_width: f32,
    pub world_height: f32,
    /// Fixed seed for the enemy AI; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    /// Directory for save files; `None` uses `saved_games/`.
    pub save_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            player_speed: 120.0,
            attack_range: 40.0,
            attack_lockout_ms: 400,
            message_duration_ms: 1800,
            contact_damage: 1,
            enemy_speed: 40.0,
            enemy_health: 2,
            enemy_turn_chance: 0.02,
            respawn_interval_ms: 10_000,
            block_step: 32.0,
            world_width: 800.0,
            world_height: 600.0,
            rng_seed: None,
            save_dir: None,
        }
    }
}

impl EngineConfig {
    /// Per-tick turn probability, forced into `[0, 1]`.
    pub fn turn_chance(&self) -> f64 {
        if (0.0..=1.0).contains(&self.enemy_turn_chance) {
            self.enemy_turn_chance
        } else {
            warn!(
                "enemy_turn_chance {} is not a probability, using default",
                self.enemy_turn_chance
            );
            EngineConfig::default().enemy_turn_chance
        }
    }

    /// World size used for clamping, with any non-positive or non-finite side replaced by
    /// its default.
    pub fn world_bounds(&self) -> (f32, f32) {
        let defaults = EngineConfig::default();
        let usable = |value: f32| value.is_finite() && value > 0.0;
        let width = if usable(self.world_width) {
            self.world_width
        } else {
            warn!("world_width {} is not a usable size, using default", self.world_width);
            defaults.world_width
        };
        let height = if usable(self.world_height) {
            self.world_height
        } else {
            warn!("world_height {} is not a usable size, using default", self.world_height);
            defaults.world_height
        };
        (width, height)
    }
}

/// Loads engine configuration from a TOML file, falling back to defaults on error.
///
/// This function never fails. A missing or unparsable file is logged with `warn!`
/// and the defaults are returned instead.
pub fn load_config(toml_path: &Path) -> EngineConfig {
    match try_load_config(toml_path) {
        Ok(config) => {
            info!("engine configuration loaded from '{}'", toml_path.display());
            config
        },
        Err(e) => {
            warn!(
                "Could not load engine configuration from '{}': {e:#}. Using defaults.",
                toml_path.display()
            );
            EngineConfig::default()
        },
    }
}

/// Attempts to load engine configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
fn try_load_config(toml_path: &Path) -> Result<EngineConfig> {
    let raw = fs::read_to_string(toml_path)
        .with_context(|| format!("reading engine configuration from '{}'", toml_path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing engine configuration from '{}'", toml_path.display()))
}
