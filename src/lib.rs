//! Slingshot Flyer - a pixel-scaled side-scrolling slingshot arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, phases)
//! - `app`: Frame driver and error boundary
//! - `fatal`: Panic hook that halts the game where panics cannot be caught
//! - `renderer`: Low-res canvas drawing and the WebGPU upscale
//! - `audio`: Sound commands and backends
//! - `config`: Data-driven game tuning

pub mod app;
pub mod assets;
pub mod audio;
pub mod config;
pub mod fatal;
pub mod presence;
pub mod progress;
pub mod renderer;
pub mod sim;
pub mod ui;

pub use app::App;
pub use config::GameConfig;
pub use progress::Progress;

/// Game configuration constants
pub mod consts {
    /// Low-res render canvas size
    pub const RENDER_WIDTH: u32 = 320;
    pub const RENDER_HEIGHT: u32 = 480;

    /// Fixed simulation timestep (one frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Pipes are "passed" once they clear this x
    pub const CAMERA_X: f32 = RENDER_WIDTH as f32 / 2.0;
}
