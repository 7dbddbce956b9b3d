//! The player: kinematics, flight modes, boost fuel and trail

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::GamePhase;
use crate::config::{BoostConfig, PlayerConfig};

/// Flight mode, with the state only that mode needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
    /// Gravity plus discrete flaps; sprite tilts along the flight path
    Normal,
    /// Continuous thrust while held, with drag
    Ship { thrusting: bool },
}

impl PlayerMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            PlayerMode::Normal => ModeKind::Normal,
            PlayerMode::Ship { .. } => ModeKind::Ship,
        }
    }
}

/// Payload-free mode tag, used for mode switches and the presence wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Normal,
    Ship,
}

impl ModeKind {
    fn into_mode(self) -> PlayerMode {
        match self {
            ModeKind::Normal => PlayerMode::Normal,
            ModeKind::Ship => PlayerMode::Ship { thrusting: false },
        }
    }
}

/// Which sprite the renderer should use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSprite {
    Normal,
    Ship,
}

/// A fading trail particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailParticle {
    pub pos: Vec2,
    pub alpha: f32,
    pub size: f32,
}

/// Boost fuel tank
#[derive(Debug, Clone)]
pub struct Boost {
    pub fuel: f32,
    pub boosting: bool,
    cfg: BoostConfig,
}

impl Boost {
    pub fn new(cfg: BoostConfig) -> Self {
        Self {
            fuel: cfg.max_fuel,
            boosting: false,
            cfg,
        }
    }

    pub fn max_fuel(&self) -> f32 {
        self.cfg.max_fuel
    }

    /// Start boosting if there is enough fuel; returns whether boosting is on
    pub fn start(&mut self) -> bool {
        if self.fuel > self.cfg.min_fuel_to_start {
            self.boosting = true;
        }
        self.boosting
    }

    pub fn stop(&mut self) {
        self.boosting = false;
    }

    /// Burn or regenerate one frame of fuel
    pub fn update(&mut self) {
        if self.boosting && self.fuel > 0.0 {
            self.fuel = (self.fuel - self.cfg.consumption_rate).max(0.0);
        } else if self.fuel < self.cfg.max_fuel {
            self.fuel = (self.fuel + self.cfg.regen_rate).min(self.cfg.max_fuel);
        }
        if self.fuel <= 0.0 {
            self.boosting = false;
        }
    }

    pub fn refill(&mut self) {
        self.fuel = self.cfg.max_fuel;
        self.boosting = false;
    }

    /// Fuel as 0..=100 percent
    pub fn percent(&self) -> f32 {
        self.fuel / self.cfg.max_fuel * 100.0
    }
}

/// The player entity
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Sprite tilt in radians
    pub rotation: f32,
    pub mode: PlayerMode,
    pub size_multiplier: f32,
    pub width: f32,
    pub height: f32,
    pub boost: Boost,
    /// Oldest first
    pub trail: VecDeque<TrailParticle>,
    cfg: PlayerConfig,
}

impl Player {
    pub fn new(cfg: PlayerConfig, boost: BoostConfig, initial_y: f32) -> Self {
        Self {
            pos: Vec2::new(cfg.initial_x, initial_y),
            vel: Vec2::ZERO,
            rotation: 0.0,
            mode: PlayerMode::Normal,
            size_multiplier: 1.0,
            width: cfg.width,
            height: cfg.height,
            boost: Boost::new(boost),
            trail: VecDeque::with_capacity(cfg.trail_max_len + 1),
            cfg,
        }
    }

    pub fn sprite(&self) -> PlayerSprite {
        match self.mode {
            PlayerMode::Normal => PlayerSprite::Normal,
            PlayerMode::Ship { .. } => PlayerSprite::Ship,
        }
    }

    pub fn is_thrusting(&self) -> bool {
        matches!(self.mode, PlayerMode::Ship { thrusting: true })
    }

    /// Integrate one frame. Does nothing outside active play.
    pub fn update(&mut self, gravity_dir: f32, phase: GamePhase, horizontal_speed: f32) {
        if !phase.is_active_play() {
            return;
        }

        let prev = self.pos;

        match self.mode {
            PlayerMode::Ship { thrusting } => {
                if thrusting {
                    self.vel.y += self.cfg.thrust_strength * gravity_dir;
                }
                self.vel.y += self.cfg.gravity * gravity_dir;
                self.pos.y += self.vel.y;
                self.vel.y *= self.cfg.ship_drag;
                self.rotation = 0.0;
            }
            PlayerMode::Normal => {
                self.vel.y += self.cfg.gravity * gravity_dir;
                self.pos.y += self.vel.y;
                self.rotation = if horizontal_speed > 0.0 {
                    self.vel.y.atan2(horizontal_speed)
                } else {
                    0.0
                };
            }
        }

        self.push_trail(prev);
    }

    fn push_trail(&mut self, at: Vec2) {
        let ship_scale = match self.mode {
            PlayerMode::Ship { .. } => 1.5,
            PlayerMode::Normal => 1.0,
        };
        self.trail.push_back(TrailParticle {
            pos: at,
            alpha: 1.0,
            size: self.cfg.trail_base_size * self.size_multiplier * ship_scale,
        });
        while self.trail.len() > self.cfg.trail_max_len {
            self.trail.pop_front();
        }
        for p in self.trail.iter_mut() {
            p.alpha -= 0.1;
            p.size *= 0.95;
        }
        self.trail.retain(|p| p.alpha > 0.0 && p.size > 0.5);
    }

    /// Flap upward. Only Normal mode flaps; returns whether it did, so the
    /// caller can play the flap sound.
    pub fn flap(&mut self, gravity_dir: f32) -> bool {
        match self.mode {
            PlayerMode::Normal => {
                self.vel.y = self.cfg.jump_strength * gravity_dir;
                true
            }
            PlayerMode::Ship { .. } => false,
        }
    }

    pub fn start_thrust(&mut self) {
        if let PlayerMode::Ship { thrusting } = &mut self.mode {
            *thrusting = true;
        }
    }

    pub fn end_thrust(&mut self) {
        if let PlayerMode::Ship { thrusting } = &mut self.mode {
            *thrusting = false;
        }
    }

    pub fn start_boosting(&mut self) -> bool {
        self.boost.start()
    }

    pub fn stop_boosting(&mut self) {
        self.boost.stop();
    }

    pub fn update_boost(&mut self) {
        self.boost.update();
    }

    /// Switch flight mode; no-op when already in `kind`
    pub fn change_mode(&mut self, kind: ModeKind) {
        if self.mode.kind() == kind {
            return;
        }
        self.mode = kind.into_mode();
        self.vel = Vec2::ZERO;
        self.rotation = 0.0;
        self.trail.clear();
    }

    /// Rescale from the base size; returns whether anything changed
    pub fn change_size(&mut self, multiplier: f32) -> bool {
        if self.size_multiplier == multiplier {
            return false;
        }
        self.size_multiplier = multiplier;
        self.width = self.cfg.width * multiplier;
        self.height = self.cfg.height * multiplier;
        true
    }

    /// Shrink to the configured mini size
    pub fn make_mini(&mut self) -> bool {
        self.change_size(self.cfg.mini_size_multiplier)
    }

    /// Forgiving hitbox: sprite box inset by the configured padding
    pub fn collision_rect(&self) -> Rect {
        Rect::centered(self.pos, Vec2::new(self.width, self.height)).inset(self.cfg.hitbox_padding)
    }

    /// True when the hitbox leaves the top or bottom of the world
    pub fn check_boundary_collision(&self, world_height: f32) -> bool {
        let r = self.collision_rect();
        r.bottom > world_height || r.top < 0.0
    }

    /// Restore the start-of-run state
    pub fn reset(&mut self, initial_y: f32) {
        self.pos = Vec2::new(self.cfg.initial_x, initial_y);
        self.vel = Vec2::ZERO;
        self.rotation = 0.0;
        self.mode = PlayerMode::Normal;
        self.trail.clear();
        self.change_size(1.0);
        self.boost.refill();
    }
}
