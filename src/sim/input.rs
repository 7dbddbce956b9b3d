//! Player input and UI commands
//!
//! Handlers run between frames and mutate the state directly. Pointer
//! positions are already in world pixels.

use glam::Vec2;

use super::state::{GamePhase, GameState, RunMode};
use crate::audio::SoundKey;

/// Raw input, already mapped from DOM or keyboard events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Vec2 },
    PointerMove { pos: Vec2 },
    PointerUp,
    /// Space pressed
    Action,
    /// Space released
    ActionReleased,
    BoostPressed,
    BoostReleased,
}

/// Button presses from the menu layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    StartRandom,
    ShowLevelSelect,
    SelectLevel(usize),
    Restart,
    MainMenu,
    NextTutorialStep,
    SkipTutorial,
    StartTutorialGame,
}

pub fn handle_input(state: &mut GameState, event: InputEvent) {
    match event {
        InputEvent::PointerDown { pos } => {
            if state.phase == GamePhase::ReadyToLaunch {
                state.player.pos = state.slingshot.begin_drag(pos);
            } else {
                press(state);
            }
        }
        InputEvent::PointerMove { pos } => {
            if state.phase != GamePhase::ReadyToLaunch {
                return;
            }
            if let Some(at) = state.slingshot.drag_to(pos, &state.config.slingshot) {
                state.player.pos = at;
            }
        }
        InputEvent::PointerUp => {
            if state.phase == GamePhase::ReadyToLaunch {
                let base = state.config.pipe.base_speed;
                if let Some(launch) = state.slingshot.release(&state.config.slingshot, base) {
                    state.launch(launch);
                }
            } else {
                release(state);
            }
        }
        InputEvent::Action => match state.phase {
            // The slingshot needs a pointer
            GamePhase::ReadyToLaunch => {}
            GamePhase::GameOver => match state.mode {
                RunMode::Level(_) => state.main_menu(),
                RunMode::Random => state.start_random(),
            },
            _ => press(state),
        },
        InputEvent::ActionReleased => release(state),
        InputEvent::BoostPressed => {
            if state.phase.is_active_play() {
                state.player.start_boosting();
            }
        }
        InputEvent::BoostReleased => state.player.stop_boosting(),
    }
}

/// Flap, thrust, or the menu action of the current phase
fn press(state: &mut GameState) {
    match state.phase {
        GamePhase::Playing | GamePhase::LevelPlaying => flap_or_thrust(state),
        GamePhase::Start => state.start_random(),
        GamePhase::Tutorial => {
            let Some(step) = state.tutorial_step() else {
                return;
            };
            if step.awaits_flap {
                flap_or_thrust(state);
                state.advance_tutorial();
            } else if step.show_start {
                state.complete_tutorial();
            }
        }
        _ => {}
    }
}

fn flap_or_thrust(state: &mut GameState) {
    if state.player.flap(state.gravity_dir) {
        state.play_sound(SoundKey::Flap);
    } else {
        state.player.start_thrust();
    }
}

fn release(state: &mut GameState) {
    if state.phase.is_active_play() {
        state.player.end_thrust();
    }
}

pub fn handle_command(state: &mut GameState, cmd: UiCommand) {
    log::debug!("ui command {cmd:?} in {:?}", state.phase);
    match cmd {
        UiCommand::StartRandom => state.start_random(),
        UiCommand::ShowLevelSelect => state.enter_level_select(),
        UiCommand::SelectLevel(index) => state.start_level(index),
        UiCommand::Restart => state.restart(),
        UiCommand::MainMenu => state.main_menu(),
        UiCommand::NextTutorialStep => state.advance_tutorial(),
        UiCommand::SkipTutorial | UiCommand::StartTutorialGame => state.complete_tutorial(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioCommand;
    use crate::config::GameConfig;
    use crate::sim::player::{ModeKind, PlayerMode};
    use crate::sim::state::GameEvent;

    fn ready() -> GameState {
        let mut s = GameState::new(GameConfig::default(), 11);
        s.finish_loading();
        s.tutorial.completed = true;
        handle_command(&mut s, UiCommand::StartRandom);
        s.drain_events();
        s
    }

    #[test]
    fn test_drag_and_release_launches() {
        let mut s = ready();
        handle_input(&mut s, InputEvent::PointerDown { pos: Vec2::new(60.0, 135.0) });
        handle_input(&mut s, InputEvent::PointerMove { pos: Vec2::new(20.0, 105.0) });
        assert_eq!(s.player.pos, Vec2::new(20.0, 105.0));
        handle_input(&mut s, InputEvent::PointerUp);

        assert_eq!(s.phase, GamePhase::Playing);
        assert!((s.base_speed - 2.4).abs() < 1e-5);
        assert!((s.player.vel.y - 4.5).abs() < 1e-5);
        assert_eq!(s.player.pos.x, 60.0);
    }

    #[test]
    fn test_drag_is_clamped() {
        let mut s = ready();
        handle_input(&mut s, InputEvent::PointerDown { pos: Vec2::new(0.0, 0.0) });
        assert_eq!(s.player.pos, Vec2::ZERO);
        handle_input(&mut s, InputEvent::PointerMove { pos: Vec2::new(60.0, 435.0) });
        assert_eq!(s.player.pos, Vec2::new(60.0, 215.0));
    }

    #[test]
    fn test_move_without_drag_ignored() {
        let mut s = ready();
        let before = s.player.pos;
        handle_input(&mut s, InputEvent::PointerMove { pos: Vec2::new(10.0, 10.0) });
        handle_input(&mut s, InputEvent::PointerUp);
        assert_eq!(s.player.pos, before);
        assert_eq!(s.phase, GamePhase::ReadyToLaunch);
    }

    #[test]
    fn test_space_cannot_launch() {
        let mut s = ready();
        handle_input(&mut s, InputEvent::Action);
        assert_eq!(s.phase, GamePhase::ReadyToLaunch);
    }

    #[test]
    fn test_flap_in_play_plays_sound() {
        let mut s = ready();
        handle_input(&mut s, InputEvent::PointerDown { pos: Vec2::new(60.0, 135.0) });
        handle_input(&mut s, InputEvent::PointerUp);
        s.drain_events();

        handle_input(&mut s, InputEvent::Action);
        assert_eq!(s.player.vel.y, -6.5);
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::Audio(AudioCommand::PlayOneShot {
                key: SoundKey::Flap,
                volume: 1.0
            })]
        );
    }

    #[test]
    fn test_ship_thrust_follows_press() {
        let mut s = ready();
        handle_input(&mut s, InputEvent::PointerDown { pos: Vec2::new(60.0, 135.0) });
        handle_input(&mut s, InputEvent::PointerUp);
        s.player.change_mode(ModeKind::Ship);

        handle_input(&mut s, InputEvent::PointerDown { pos: Vec2::ZERO });
        assert_eq!(s.player.mode, PlayerMode::Ship { thrusting: true });
        handle_input(&mut s, InputEvent::PointerUp);
        assert_eq!(s.player.mode, PlayerMode::Ship { thrusting: false });
    }

    #[test]
    fn test_boost_only_in_play() {
        let mut s = ready();
        handle_input(&mut s, InputEvent::BoostPressed);
        assert!(!s.player.boost.boosting);

        handle_input(&mut s, InputEvent::PointerDown { pos: Vec2::new(60.0, 135.0) });
        handle_input(&mut s, InputEvent::PointerUp);
        handle_input(&mut s, InputEvent::BoostPressed);
        assert!(s.player.boost.boosting);
        handle_input(&mut s, InputEvent::BoostReleased);
        assert!(!s.player.boost.boosting);
    }

    #[test]
    fn test_space_on_game_over() {
        let mut s = ready();
        handle_input(&mut s, InputEvent::PointerDown { pos: Vec2::new(60.0, 135.0) });
        handle_input(&mut s, InputEvent::PointerUp);
        s.end_game();
        handle_input(&mut s, InputEvent::Action);
        assert_eq!(s.phase, GamePhase::ReadyToLaunch);

        handle_command(&mut s, UiCommand::SelectLevel(0));
        handle_input(&mut s, InputEvent::PointerDown { pos: Vec2::new(60.0, 135.0) });
        handle_input(&mut s, InputEvent::PointerUp);
        s.end_game();
        handle_input(&mut s, InputEvent::Action);
        assert_eq!(s.phase, GamePhase::Start);
    }

    #[test]
    fn test_tutorial_by_input() {
        let mut s = GameState::new(GameConfig::default(), 11);
        s.finish_loading();
        handle_input(&mut s, InputEvent::Action);
        assert_eq!(s.phase, GamePhase::Tutorial);

        handle_input(&mut s, InputEvent::PointerDown { pos: Vec2::ZERO });
        assert_eq!(s.tutorial.step, 1);
        // informational steps ignore presses
        handle_input(&mut s, InputEvent::Action);
        assert_eq!(s.tutorial.step, 1);

        handle_command(&mut s, UiCommand::NextTutorialStep);
        handle_command(&mut s, UiCommand::NextTutorialStep);
        assert_eq!(s.tutorial.step, 3);
        handle_input(&mut s, InputEvent::Action);
        assert_eq!(s.phase, GamePhase::ReadyToLaunch);
        assert!(s.tutorial.completed);
    }

    #[test]
    fn test_skip_tutorial() {
        let mut s = GameState::new(GameConfig::default(), 11);
        s.finish_loading();
        handle_command(&mut s, UiCommand::ShowLevelSelect);
        handle_command(&mut s, UiCommand::SelectLevel(0));
        handle_command(&mut s, UiCommand::SkipTutorial);
        assert_eq!(s.phase, GamePhase::ReadyToLaunch);
        assert_eq!(s.level.map(|l| l.index), Some(0));
    }
}
