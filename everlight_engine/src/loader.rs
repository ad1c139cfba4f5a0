//! Loader utilities for building a `GameSession` from serialized data.
//!
//! World content comes from a `WorldDef` RON file; engine tuning comes from `config.toml`.
//! A copy of the stock world is compiled into the binary so the game runs without a data
//! directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use everlight_data::WorldDef;
use log::info;

use crate::config::load_config;
use crate::data_paths::data_path;
use crate::session::GameSession;

/// The stock world, as shipped in `data/world.ron`.
pub const BUILTIN_WORLD: &str = include_str!("../data/world.ron");

/// Load a `WorldDef` from a RON file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid `WorldDef`.
pub fn load_worlddef(path: &Path) -> Result<WorldDef> {
    let text = fs::read_to_string(path).with_context(|| format!("reading worlddef from '{}'", path.display()))?;
    parse_worlddef(&text).with_context(|| format!("parsing worlddef RON from '{}'", path.display()))
}

/// Parse `WorldDef` RON text.
///
/// # Errors
/// Returns an error if `text` is not a valid `WorldDef`.
pub fn parse_worlddef(text: &str) -> Result<WorldDef> {
    Ok(ron::from_str(text)?)
}

/// The compiled-in stock world.
///
/// # Errors
/// Fails only if the embedded file is malformed.
pub fn builtin_worlddef() -> Result<WorldDef> {
    parse_worlddef(BUILTIN_WORLD).context("parsing built-in world")
}

/// Validate a `WorldDef` and return a single aggregated error.
///
/// # Errors
/// Returns an error listing every problem found.
pub fn validate_worlddef(def: &WorldDef) -> Result<()> {
    let errors = everlight_data::validate_world(def);
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .into_iter()
        .map(|err| format!("- {err}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("worlddef validation failed:\n{details}");
}

/// Build a session from the data directory.
///
/// `world_path` overrides `data/world.ron`; when neither exists the built-in world is used.
/// Configuration always comes from `data/config.toml`, falling back to defaults.
///
/// # Errors
/// Errors bubble up from reading, parsing or validating the world.
pub fn load_session(world_path: Option<&Path>) -> Result<GameSession> {
    let config = load_config(&data_path("config.toml"));

    let default_path = data_path("world.ron");
    let worlddef = match world_path {
        Some(path) => load_worlddef(path)?,
        None if default_path.is_file() => load_worlddef(&default_path)?,
        None => {
            info!("no world file at '{}', using built-in world", default_path.display());
            builtin_worlddef()?
        },
    };
    info!(
        "worlddef '{}' loaded: {} quests, {} npcs, {} items, {} spawn points",
        worlddef.game.title,
        worlddef.quests.len(),
        worlddef.npcs.len(),
        worlddef.items.len(),
        worlddef.enemies.spawn_points.len()
    );
    GameSession::new(&worlddef, config).context("while building session from worlddef")
}
