//! Phase transitions
//!
//! Every change of `GameState::phase` goes through one of these methods, so
//! the resets and music cues for each edge live in one place.

use glam::Vec2;

use super::level::LevelRun;
use super::slingshot::Launch;
use super::state::{GameEvent, GamePhase, GameState, RunMode, RunResult};
use crate::audio::{AudioCommand, SoundKey};

pub struct TutorialStep {
    pub text: &'static str,
    /// Advances on the first flap
    pub awaits_flap: bool,
    pub show_next: bool,
    pub show_start: bool,
}

pub const TUTORIAL_STEPS: [TutorialStep; 4] = [
    TutorialStep {
        text: "Welcome! Click or press Space to flap your wings. Try it now!",
        awaits_flap: true,
        show_next: false,
        show_start: false,
    },
    TutorialStep {
        text: "Good job! Keep flapping to stay airborne. In the main game, avoid hitting edges, pipes, or the ground.",
        awaits_flap: false,
        show_next: true,
        show_start: false,
    },
    TutorialStep {
        text: "You'll fly through pipe gaps to score points. That's it!",
        awaits_flap: false,
        show_next: true,
        show_start: false,
    },
    TutorialStep {
        text: "You're ready. Click 'Start Game!' below or press Space to begin the real challenge.",
        awaits_flap: false,
        show_next: false,
        show_start: true,
    },
];

impl GameState {
    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("phase {:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
    }

    /// Assets settled; show the main menu
    pub fn finish_loading(&mut self) {
        if self.phase == GamePhase::Loading {
            self.enter_start();
        }
    }

    pub fn enter_start(&mut self) {
        self.set_phase(GamePhase::Start);
        self.reset_common();
        self.level = None;
        self.audio(AudioCommand::StopAll);
        let volume = self.config.music.menu_volume;
        self.play_music(SoundKey::MainMenuMusic, volume);
    }

    pub fn enter_level_select(&mut self) {
        self.set_phase(GamePhase::LevelSelect);
        self.reset_common();
        self.level = None;
    }

    /// Main-menu button: stop everything and go back to Start
    pub fn main_menu(&mut self) {
        self.audio(AudioCommand::StopAll);
        self.enter_start();
    }

    /// Start an endless run, via the tutorial on the first ever run
    pub fn start_random(&mut self) {
        if self.tutorial.completed {
            self.begin_run(RunMode::Random);
        } else {
            self.start_tutorial(RunMode::Random);
        }
    }

    /// Start level `index`; an unknown index returns to level select
    pub fn start_level(&mut self, index: usize) {
        if index >= self.config.levels.len() {
            log::error!("Invalid level index: {index}");
            self.enter_level_select();
            return;
        }
        if self.tutorial.completed {
            self.begin_run(RunMode::Level(index));
        } else {
            self.start_tutorial(RunMode::Level(index));
        }
    }

    /// Replay the last mode: the same level after a level run, else random
    pub fn restart(&mut self) {
        match (self.mode, self.phase) {
            (RunMode::Level(index), GamePhase::GameOver | GamePhase::LevelPlaying) => {
                self.start_level(index)
            }
            _ => self.start_random(),
        }
    }

    fn start_tutorial(&mut self, pending: RunMode) {
        self.set_phase(GamePhase::Tutorial);
        self.reset_common();
        self.level = None;
        self.tutorial.step = 0;
        self.tutorial.pending = Some(pending);
        self.audio(AudioCommand::StopAll);
        let volume = self.config.music.music_volume;
        self.play_music(SoundKey::BackgroundMusic, volume);
    }

    pub fn tutorial_step(&self) -> Option<&'static TutorialStep> {
        if self.phase == GamePhase::Tutorial {
            TUTORIAL_STEPS.get(self.tutorial.step)
        } else {
            None
        }
    }

    pub fn advance_tutorial(&mut self) {
        if self.phase != GamePhase::Tutorial {
            return;
        }
        self.tutorial.step += 1;
        if self.tutorial.step >= TUTORIAL_STEPS.len() {
            self.complete_tutorial();
        }
    }

    /// Finish or skip the tutorial and start the run that was waiting on it
    pub fn complete_tutorial(&mut self) {
        if self.phase != GamePhase::Tutorial {
            return;
        }
        self.tutorial.completed = true;
        self.events.push(GameEvent::TutorialCompleted);
        let mode = self.tutorial.pending.take().unwrap_or(RunMode::Random);
        self.begin_run(mode);
    }

    /// Reset for a new run and wait in the slingshot
    fn begin_run(&mut self, mode: RunMode) {
        self.score = 0.0;
        self.reset_common();
        self.mode = mode;
        self.level = match mode {
            RunMode::Level(index) => Some(LevelRun::new(index)),
            RunMode::Random => None,
        };
        let sling = &self.config.slingshot;
        self.player.pos = Vec2::new(sling.x, sling.y);
        self.player.vel = Vec2::ZERO;
        self.set_phase(GamePhase::ReadyToLaunch);

        self.audio(AudioCommand::StopAll);
        let volume = self.config.music.music_volume;
        self.play_music(SoundKey::BackgroundMusic, volume);
    }

    /// Fire the player out of the slingshot
    pub fn launch(&mut self, launch: Launch) {
        if self.phase != GamePhase::ReadyToLaunch {
            return;
        }
        self.player.vel = Vec2::new(0.0, launch.velocity.y);
        self.player.pos.x = self.config.slingshot.x;
        self.base_speed = launch.scroll_speed;
        let phase = if self.level.is_some() {
            GamePhase::LevelPlaying
        } else {
            GamePhase::Playing
        };
        self.set_phase(phase);

        self.play_sound(SoundKey::Flap);
        self.audio(AudioCommand::StopAll);
        let volume = self.config.music.music_volume;
        self.play_music(SoundKey::SpeedMusic, volume);
    }

    /// The run failed. Only random runs can set a high score.
    pub fn end_game(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let was_level = self.phase == GamePhase::LevelPlaying;
        self.set_phase(GamePhase::GameOver);
        self.player.stop_boosting();
        self.player.end_thrust();

        self.play_sound(SoundKey::Hit);
        self.audio(AudioCommand::StopAll);

        let new_high_score = !was_level && self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
            self.play_sound(SoundKey::NewHighScore);
        } else {
            self.play_sound(SoundKey::GameOver);
        }

        let result = RunResult {
            mode: self.mode,
            score: self.score,
            high_score: self.high_score,
            new_high_score,
        };
        log::info!("game over: score {:.1} (new high score: {new_high_score})", self.score);
        self.last_result = Some(result);
        self.events.push(GameEvent::GameOver(result));
    }

    /// The level's script ran out and the screen is clear
    pub fn end_level(&mut self) {
        let Some(run) = self.level else { return };
        self.play_sound(SoundKey::LevelComplete);
        self.audio(AudioCommand::StopAll);
        log::info!("level {} complete", run.index);
        self.events.push(GameEvent::LevelComplete { index: run.index });
        self.enter_level_select();
    }
}
