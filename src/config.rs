//! Typed game configuration
//!
//! Every tunable lives here. Partial JSON overrides are merged onto the
//! defaults via `#[serde(default)]`; hard errors are rejected on load and
//! soft problems are reported by [`GameConfig::validate`].

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::{RENDER_HEIGHT, RENDER_WIDTH};
use crate::sim::level::{Level, builtin_levels};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub initial_x: f32,
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    /// Upward flap impulse (negative is up)
    pub jump_strength: f32,
    /// Per-frame ship thrust (negative is up)
    pub thrust_strength: f32,
    /// Per-frame velocity damping in ship mode
    pub ship_drag: f32,
    pub mini_size_multiplier: f32,
    /// Hitbox inset on every side
    pub hitbox_padding: f32,
    pub trail_max_len: usize,
    pub trail_base_size: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_x: 80.0,
            width: 45.0,
            height: 60.0,
            gravity: 0.3,
            jump_strength: -6.5,
            thrust_strength: -0.6,
            ship_drag: 0.99,
            mini_size_multiplier: 0.6,
            hitbox_padding: 5.0,
            trail_max_len: 10,
            trail_base_size: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    pub max_fuel: f32,
    /// Fuel must be strictly above this to start boosting
    pub min_fuel_to_start: f32,
    pub consumption_rate: f32,
    pub regen_rate: f32,
    /// Scroll speed multiplier while boosting
    pub speed_multiplier: f32,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            max_fuel: 100.0,
            min_fuel_to_start: 10.0,
            consumption_rate: 0.5,
            regen_rate: 0.1,
            speed_multiplier: 1.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    pub gap: f32,
    /// Pixels per frame at scroll speed 1
    pub base_speed: f32,
    pub spawn_interval: u64,
    pub tile_size: f32,
    pub width_tiles: f32,
    /// Keep random gaps this far from the top and bottom edges
    pub gap_margin: f32,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            gap: 200.0,
            base_speed: 2.0,
            spawn_interval: 100,
            tile_size: 32.0,
            width_tiles: 3.0,
            gap_margin: 75.0,
        }
    }
}

impl PipeConfig {
    pub fn width(&self) -> f32 {
        self.tile_size * self.width_tiles
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f32,
    pub height: f32,
    pub idle_duration_frames: u32,
    pub punch_speed: f32,
    pub spawn_interval_frames: u64,
    /// Spawn y is clamped to `[margin, height - margin]`
    pub vertical_margin: f32,
    /// Punching enemies are done once their right edge passes `-exit_margin`
    pub exit_margin: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 46.0,
            height: 46.0,
            idle_duration_frames: 90,
            punch_speed: 6.0,
            spawn_interval_frames: 450,
            vertical_margin: 40.0,
            exit_margin: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlingshotConfig {
    pub x: f32,
    pub y: f32,
    pub max_stretch: f32,
    pub launch_power: f32,
    /// Scroll speed = launch vx * pipe base speed / this
    pub speed_divisor: f32,
    pub min_scroll_speed: f32,
}

impl Default for SlingshotConfig {
    fn default() -> Self {
        Self {
            x: 60.0,
            y: 135.0,
            max_stretch: 80.0,
            launch_power: 0.15,
            speed_divisor: 5.0,
            min_scroll_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub base_speed: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self { base_speed: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Accumulate every N global frames
    pub accumulate_every: u64,
    pub speed_factor: f32,
    pub epic_threshold: f32,
    /// Session high score shown before any run beats it
    pub initial_high_score: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            accumulate_every: 3,
            speed_factor: 0.7,
            epic_threshold: 30.0,
            initial_high_score: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    pub music_volume: f32,
    pub menu_volume: f32,
    pub min_rate: f32,
    pub max_rate: f32,
    /// Scroll speed mapped to `min_rate`
    pub rate_base_speed: f32,
    /// Scroll speed mapped to `max_rate`
    pub rate_max_speed: f32,
    pub rate_clamp_low: f32,
    pub rate_clamp_high: f32,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            music_volume: 0.3,
            menu_volume: 0.2,
            min_rate: 0.9,
            max_rate: 1.5,
            rate_base_speed: 1.0,
            rate_max_speed: 5.0,
            rate_clamp_low: 0.7,
            rate_clamp_high: 2.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world_width: f32,
    pub world_height: f32,
    pub player: PlayerConfig,
    pub boost: BoostConfig,
    pub pipe: PipeConfig,
    pub enemy: EnemyConfig,
    pub slingshot: SlingshotConfig,
    pub background: BackgroundConfig,
    pub scoring: ScoringConfig,
    pub music: MusicConfig,
    pub levels: Vec<Level>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: RENDER_WIDTH as f32,
            world_height: RENDER_HEIGHT as f32,
            player: PlayerConfig::default(),
            boost: BoostConfig::default(),
            pipe: PipeConfig::default(),
            enemy: EnemyConfig::default(),
            slingshot: SlingshotConfig::default(),
            background: BackgroundConfig::default(),
            scoring: ScoringConfig::default(),
            music: MusicConfig::default(),
            levels: builtin_levels(),
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config and reject unusable values.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let cfg: GameConfig = serde_json::from_str(json).context("parse game config")?;
        cfg.check()?;
        for warning in cfg.validate() {
            log::warn!("config: {warning}");
        }
        Ok(cfg)
    }

    /// Hard errors: values the simulation cannot run with.
    pub fn check(&self) -> anyhow::Result<()> {
        ensure!(
            self.world_width == RENDER_WIDTH as f32 && self.world_height == RENDER_HEIGHT as f32,
            "world dimensions must match the {}x{} canvas (got {}x{})",
            RENDER_WIDTH,
            RENDER_HEIGHT,
            self.world_width,
            self.world_height
        );
        ensure!(
            self.pipe.gap > 0.0 && self.pipe.gap < self.world_height,
            "pipe.gap {} must be inside (0, {})",
            self.pipe.gap,
            self.world_height
        );
        ensure!(self.pipe.spawn_interval > 0, "pipe.spawn_interval must be > 0");
        ensure!(
            self.enemy.spawn_interval_frames > 0,
            "enemy.spawn_interval_frames must be > 0"
        );
        ensure!(
            self.scoring.accumulate_every > 0,
            "scoring.accumulate_every must be > 0"
        );
        ensure!(
            self.boost.max_fuel > 0.0,
            "boost.max_fuel must be > 0 (got {})",
            self.boost.max_fuel
        );
        ensure!(
            self.slingshot.speed_divisor != 0.0,
            "slingshot.speed_divisor must be non-zero"
        );
        ensure!(
            self.music.rate_max_speed > self.music.rate_base_speed,
            "music.rate_max_speed {} must be above rate_base_speed {}",
            self.music.rate_max_speed,
            self.music.rate_base_speed
        );
        ensure!(
            self.player.trail_max_len > 0,
            "player.trail_max_len must be > 0"
        );
        for level in &self.levels {
            ensure!(
                level.events.windows(2).all(|w| w[0].time <= w[1].time),
                "level '{}' events must be sorted by time",
                level.id
            );
        }
        Ok(())
    }

    /// Soft problems worth a `warn!` but not fatal.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        let usable = self.world_height - self.pipe.gap - 2.0 * self.pipe.gap_margin;
        if usable < 0.0 {
            w.push(format!(
                "pipe.gap_margin {} leaves no room for random gaps; gaps pin to the margin",
                self.pipe.gap_margin
            ));
        }
        if self.player.gravity <= 0.0 {
            w.push(format!("player.gravity {} is not positive", self.player.gravity));
        }
        if self.player.jump_strength >= 0.0 {
            w.push(format!(
                "player.jump_strength {} is not upward (negative)",
                self.player.jump_strength
            ));
        }
        if !(0.0..=1.0).contains(&self.player.ship_drag) {
            w.push(format!(
                "player.ship_drag {} outside 0..1; ship velocity will grow",
                self.player.ship_drag
            ));
        }
        if self.boost.min_fuel_to_start >= self.boost.max_fuel {
            w.push("boost.min_fuel_to_start >= max_fuel; boosting can never start".into());
        }
        if self.boost.regen_rate <= 0.0 {
            w.push("boost.regen_rate <= 0; fuel never regenerates".into());
        }
        if self.slingshot.max_stretch <= 0.0 {
            w.push("slingshot.max_stretch <= 0; launches have no power".into());
        }
        for level in &self.levels {
            if level.events.is_empty() {
                w.push(format!("level '{}' has no events; completes immediately", level.id));
            }
            for ev in &level.events {
                if let Some(y) = ev.y {
                    if y < 0.0 || y + self.pipe.gap > self.world_height {
                        w.push(format!(
                            "level '{}' event at {} has gap y {} outside the world",
                            level.id, ev.time, y
                        ));
                    }
                }
            }
        }
        w
    }
}
