//! Frame driver
//!
//! Owns the game state and everything around it, runs the fixed-step
//! simulation, and is the single place a runtime fault is caught (panics on
//! wasm32 go through [`crate::fatal`] instead). After a fault the app stays
//! halted: audio is stopped and input is ignored.

use std::panic::{self, AssertUnwindSafe};

use crate::assets::LoadReport;
use crate::audio::{self, AudioSink};
use crate::config::GameConfig;
use crate::consts::{MAX_SUBSTEPS, RENDER_HEIGHT, RENDER_WIDTH, SIM_DT};
use crate::presence::{PeerPresence, Presence};
use crate::progress::Progress;
use crate::renderer::{PixelCanvas, draw_frame};
use crate::sim::{GameEvent, GameState, InputEvent, UiCommand, handle_command, handle_input, tick};
use crate::ui::Hud;

/// Longest frame delta we accept; anything longer is treated as a stall
const MAX_FRAME_DT: f32 = 0.1;

/// Fixed-timestep accumulator
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    /// Add `dt` seconds and return how many simulation steps to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        steps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    /// Stop requesting frames
    Halted,
}

pub struct App {
    state: GameState,
    canvas: PixelCanvas,
    audio: Box<dyn AudioSink>,
    presence: Presence,
    progress: Progress,
    clock: FrameClock,
    fault: Option<String>,
}

impl App {
    pub fn new(config: GameConfig, seed: u64, audio: Box<dyn AudioSink>, progress: Progress) -> Self {
        let mut state = GameState::new(config, seed);
        state.tutorial.completed = progress.tutorial_completed;
        Self {
            state,
            canvas: PixelCanvas::new(RENDER_WIDTH, RENDER_HEIGHT),
            audio,
            presence: Presence::offline(),
            progress,
            clock: FrameClock::default(),
            fault: None,
        }
    }

    pub fn set_presence(&mut self, presence: Presence) {
        self.presence = presence;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    /// The fault message once halted
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Leave the loading screen. Returns a message to show when nothing
    /// loaded at all; partial failures only degrade.
    pub fn finish_loading(&mut self, report: &LoadReport) -> Option<String> {
        log::info!("Assets: {report}");
        self.state.finish_loading();
        if report.is_total_failure() {
            log::warn!("No audio assets could be loaded");
            Some("Failed to load game sounds. Playing without audio.".to_string())
        } else {
            None
        }
    }

    pub fn input(&mut self, event: InputEvent) {
        if self.fault.is_none() {
            handle_input(&mut self.state, event);
        }
    }

    pub fn command(&mut self, cmd: UiCommand) {
        if self.fault.is_none() {
            handle_command(&mut self.state, cmd);
        }
    }

    pub fn hud(&self) -> Hud {
        Hud::from_state(&self.state, &self.presence)
    }

    /// Run one display frame: simulate, react to events, draw, present.
    ///
    /// Any error or panic from inside halts the app for good.
    pub fn frame<F>(&mut self, dt: f32, present: F) -> FrameStatus
    where
        F: FnOnce(&PixelCanvas) -> anyhow::Result<()>,
    {
        if self.fault.is_some() {
            return FrameStatus::Halted;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.step(dt, present)));
        let message = match outcome {
            Ok(Ok(())) => return FrameStatus::Continue,
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => panic_message(payload.as_ref()),
        };
        self.halt(message);
        FrameStatus::Halted
    }

    fn step<F>(&mut self, dt: f32, present: F) -> anyhow::Result<()>
    where
        F: FnOnce(&PixelCanvas) -> anyhow::Result<()>,
    {
        for _ in 0..self.clock.advance(dt) {
            tick(&mut self.state);
        }
        self.handle_events();

        if self.presence.is_connected() {
            self.presence.sync(&PeerPresence::from_state(&self.state));
        }

        let peers = self.presence.remote_peers();
        draw_frame(&self.state, &mut self.canvas, &peers);
        present(&self.canvas)
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Audio(cmd) => audio::dispatch(self.audio.as_mut(), cmd),
                GameEvent::TutorialCompleted => self.progress.mark_tutorial_completed(),
                GameEvent::GameOver(result) => {
                    log::debug!("run result {result:?}");
                }
                GameEvent::LevelComplete { .. } | GameEvent::PipePassed => {}
            }
        }
    }

    fn halt(&mut self, message: String) {
        log::error!("Fatal error, game stopped: {message}");
        // the sink itself may be what failed
        let audio = &mut self.audio;
        if panic::catch_unwind(AssertUnwindSafe(|| audio.stop_all())).is_err() {
            log::error!("Audio could not be stopped");
        }
        self.fault = Some(message);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
