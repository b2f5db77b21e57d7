use std::path::Path;

use anyhow::Context;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Tunables for level generation, entity behavior and the bundled physics.
/// Missing fields in a config file fall back to the reference values.
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u64,
    pub tile_size: f32,
    pub map_width_tiles: usize,
    pub map_height_tiles: usize,
    pub segment_width_tiles: usize,

    pub player_speed: f32,
    pub player_jump_velocity: f32,
    pub player_health: i32,
    pub player_spawn: (f32, f32),
    pub player_size: (f32, f32),
    pub level_complete_margin: f32,

    pub enemy_speed: f32,
    pub enemy_size: (f32, f32),
    pub patrol_range: f32,
    pub jump_interval_ms: (u32, u32),
    pub enemy_jump_velocity: f32,
    pub chase_range: f32,
    pub spawn_margin: f32,

    pub gravity: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tile_size: 32.0,
            map_width_tiles: 50,
            map_height_tiles: 20,
            segment_width_tiles: 10,
            player_speed: 200.0,
            player_jump_velocity: -350.0,
            player_health: 3,
            player_spawn: (100.0, 400.0),
            player_size: (32.0, 48.0),
            level_complete_margin: 50.0,
            enemy_speed: 100.0,
            enemy_size: (32.0, 32.0),
            patrol_range: 100.0,
            jump_interval_ms: (2000, 4000),
            enemy_jump_velocity: -200.0,
            chase_range: 150.0,
            spawn_margin: 50.0,
            gravity: 600.0,
        }
    }
}

impl GameConfig {
    pub fn level_pixel_width(&self) -> f32 {
        self.map_width_tiles as f32 * self.tile_size
    }

    pub fn segment_pixel_width(&self) -> f32 {
        self.segment_width_tiles as f32 * self.tile_size
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if self.tile_size <= 0.0 {
            return Err(LevelError::InvalidConfig(format!(
                "tile_size must be positive, got {}",
                self.tile_size
            )));
        }
        if self.map_width_tiles == 0 || self.map_height_tiles == 0 {
            return Err(LevelError::InvalidConfig(format!(
                "map must be at least 1x1 tiles, got {}x{}",
                self.map_width_tiles, self.map_height_tiles
            )));
        }
        if self.segment_width_tiles == 0 {
            return Err(LevelError::InvalidConfig(
                "segment_width_tiles must be non-zero".to_string(),
            ));
        }
        if self.spawn_margin < 0.0 || self.segment_pixel_width() < 2.0 * self.spawn_margin {
            return Err(LevelError::InvalidConfig(format!(
                "spawn_margin {} leaves no room in a {} px segment",
                self.spawn_margin,
                self.segment_pixel_width()
            )));
        }
        let (lo, hi) = self.jump_interval_ms;
        if lo > hi {
            return Err(LevelError::InvalidConfig(format!(
                "jump_interval_ms range is inverted: {lo}..={hi}"
            )));
        }
        Ok(())
    }
}

pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<GameConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating config {}", path.display()))?;
    Ok(config)
}

/// Resolve the startup config from `DUNGEON_RUNNER_CONFIG` or `game.json`.
/// A missing file means defaults; a broken one is reported and ignored.
pub fn load_startup_config() -> GameConfig {
    let path = std::env::var("DUNGEON_RUNNER_CONFIG")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "game.json".to_string());
    if !Path::new(&path).exists() {
        return GameConfig::default();
    }
    match load_config(&path) {
        Ok(cfg) => {
            info!("[DungeonRunner] Loaded startup config from {}", path);
            cfg
        }
        Err(e) => {
            warn!("[DungeonRunner] Ignoring config {}: {:#}", path, e);
            GameConfig::default()
        }
    }
}
