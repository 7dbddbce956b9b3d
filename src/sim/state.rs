//! Game state and core simulation types
//!
//! One `GameState` holds the whole session. The frame driver owns it and
//! hands `&mut` to the tick and to the input handlers in turn.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::enemy::Enemy;
use super::level::{Level, LevelRun};
use super::pipe::Pipe;
use super::player::Player;
use super::slingshot::Slingshot;
use crate::audio::{AudioCommand, SoundKey};
use crate::config::GameConfig;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Assets still loading
    Loading,
    /// Main menu
    Start,
    LevelSelect,
    Tutorial,
    /// Player sits in the slingshot
    ReadyToLaunch,
    /// Random endless run
    Playing,
    /// Scripted level run
    LevelPlaying,
    GameOver,
}

impl GamePhase {
    /// Physics, spawning and scoring run only in these phases
    pub fn is_active_play(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::LevelPlaying)
    }
}

/// What kind of run the player chose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Random,
    /// Index into the configured levels
    Level(usize),
}

/// Result of the last finished run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunResult {
    pub mode: RunMode,
    pub score: f32,
    pub high_score: f32,
    pub new_high_score: bool,
}

/// Things the driver reacts to after a tick or input
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Audio(AudioCommand),
    /// A pipe crossed the camera; scoring does not depend on it
    PipePassed,
    /// The tutorial was finished or skipped; persist the flag
    TutorialCompleted,
    LevelComplete { index: usize },
    GameOver(RunResult),
}

/// Tutorial progress
#[derive(Debug, Clone, Default)]
pub struct TutorialState {
    pub completed: bool,
    pub step: usize,
    /// Run to start once the tutorial ends
    pub pending: Option<RunMode>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: GamePhase,
    /// Frames since the last reset; drives spawn and scoring intervals
    pub frame_count: u64,
    /// The most recently chosen run, kept through game over for restart
    pub mode: RunMode,
    /// Level progress while a level is bound
    pub level: Option<LevelRun>,
    pub score: f32,
    pub high_score: f32,
    /// Scroll speed set at launch
    pub base_speed: f32,
    /// Effective scroll speed this frame (boost applied)
    pub scroll_speed: f32,
    /// +1 normal, -1 inverted
    pub gravity_dir: f32,
    pub epic: bool,
    /// Background scroll offset, in `(-world_width, 0]`
    pub bg_x: f32,
    pub player: Player,
    pub pipes: Vec<Pipe>,
    pub enemies: Vec<Enemy>,
    pub slingshot: Slingshot,
    pub tutorial: TutorialState,
    pub last_result: Option<RunResult>,
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
}

impl GameState {
    /// New session in the Loading phase
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let player = Player::new(
            config.player.clone(),
            config.boost.clone(),
            config.world_height / 2.0,
        );
        Self {
            phase: GamePhase::Loading,
            frame_count: 0,
            mode: RunMode::Random,
            level: None,
            score: 0.0,
            high_score: config.scoring.initial_high_score,
            base_speed: 1.0,
            scroll_speed: 0.0,
            gravity_dir: 1.0,
            epic: false,
            bg_x: 0.0,
            player,
            pipes: Vec::new(),
            enemies: Vec::new(),
            slingshot: Slingshot::default(),
            tutorial: TutorialState::default(),
            last_result: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            config,
        }
    }

    /// The level bound to the current run, if any
    pub fn current_level(&self) -> Option<&Level> {
        self.level.and_then(|run| self.config.levels.get(run.index))
    }

    /// Score as shown to the player
    pub fn display_score(&self) -> u32 {
        self.score.max(0.0).floor() as u32
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn audio(&mut self, cmd: AudioCommand) {
        self.events.push(GameEvent::Audio(cmd));
    }

    pub(crate) fn play_sound(&mut self, key: SoundKey) {
        self.audio(AudioCommand::PlayOneShot { key, volume: 1.0 });
    }

    pub(crate) fn play_music(&mut self, key: SoundKey, volume: f32) {
        self.audio(AudioCommand::PlayMusic {
            key,
            looping: true,
            volume,
        });
    }

    /// Clear per-run state shared by every phase entry
    pub(crate) fn reset_common(&mut self) {
        self.frame_count = 0;
        self.scroll_speed = 0.0;
        self.base_speed = 1.0;
        self.gravity_dir = 1.0;
        self.epic = false;
        self.player.reset(self.config.world_height / 2.0);
        self.pipes.clear();
        self.enemies.clear();
        self.bg_x = 0.0;
        self.slingshot.reset();
    }
}
