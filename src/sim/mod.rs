//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one `tick` per frame)
//! - Seeded RNG only
//! - Side effects leave as `GameEvent`s for the driver
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod flow;
pub mod input;
pub mod level;
pub mod pipe;
pub mod player;
pub mod slingshot;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use enemy::{Enemy, EnemyPose, EnemyState};
pub use flow::{TUTORIAL_STEPS, TutorialStep};
pub use input::{InputEvent, UiCommand, handle_command, handle_input};
pub use level::{Level, LevelEvent, LevelRun, SpawnKind, builtin_levels};
pub use pipe::{Pipe, PipeOutcome};
pub use player::{Boost, ModeKind, Player, PlayerMode, PlayerSprite, TrailParticle};
pub use slingshot::{Launch, Slingshot};
pub use state::{GameEvent, GamePhase, GameState, RunMode, RunResult, TutorialState};
pub use tick::tick;
