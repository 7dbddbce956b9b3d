//! HUD and menu screens
//!
//! The game builds a plain [`Hud`] snapshot each frame; the DOM layer only
//! ever reads that snapshot and sends [`UiCommand`](crate::sim::UiCommand)s
//! back.

use glam::Vec2;

use crate::presence::{Presence, RosterEntry};
use crate::sim::{GamePhase, GameState, RunResult};

/// Which overlay is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Start,
    LevelSelect,
    Tutorial,
    /// In-game HUD only
    Hud,
    GameOver,
}

impl Screen {
    pub fn for_phase(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Loading => Screen::Loading,
            GamePhase::Start => Screen::Start,
            GamePhase::LevelSelect => Screen::LevelSelect,
            GamePhase::Tutorial => Screen::Tutorial,
            GamePhase::ReadyToLaunch | GamePhase::Playing | GamePhase::LevelPlaying => {
                Screen::Hud
            }
            GamePhase::GameOver => Screen::GameOver,
        }
    }
}

/// Tutorial panel contents
#[derive(Debug, Clone, PartialEq)]
pub struct TutorialPanel {
    pub text: &'static str,
    pub show_next: bool,
    pub show_start: bool,
}

/// Everything the DOM layer displays
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub screen: Screen,
    pub score: u32,
    pub high_score: u32,
    /// 0..=100
    pub boost_percent: u32,
    pub boost_fuel: u32,
    pub boosting: bool,
    pub level_name: Option<String>,
    pub tutorial: Option<TutorialPanel>,
    pub result: Option<RunResult>,
    pub level_names: Vec<String>,
    pub roster: Vec<RosterEntry>,
    pub multiplayer: bool,
}

impl Hud {
    pub fn from_state(state: &GameState, presence: &Presence) -> Self {
        let boost = &state.player.boost;
        Self {
            screen: Screen::for_phase(state.phase),
            score: state.display_score(),
            high_score: state.high_score.max(0.0).floor() as u32,
            boost_percent: boost.percent().clamp(0.0, 100.0).round() as u32,
            boost_fuel: boost.fuel.floor() as u32,
            boosting: boost.boosting,
            level_name: state.current_level().map(|l| l.name.clone()),
            tutorial: state.tutorial_step().map(|step| TutorialPanel {
                text: step.text,
                show_next: step.show_next,
                show_start: step.show_start,
            }),
            result: if state.phase == GamePhase::GameOver {
                state.last_result
            } else {
                None
            },
            level_names: state.config.levels.iter().map(|l| l.name.clone()).collect(),
            roster: presence.roster(),
            multiplayer: presence.is_connected(),
        }
    }
}

/// Map a client-space point onto the canvas grid. The canvas element may be
/// stretched to any size, so each axis is scaled on its own.
pub fn canvas_point(client: Vec2, origin: Vec2, shown: Vec2, canvas: Vec2) -> Vec2 {
    if shown.x <= 0.0 || shown.y <= 0.0 {
        return client - origin;
    }
    (client - origin) * canvas / shown
}

#[cfg(target_arch = "wasm32")]
pub mod dom {
    //! Writes a [`Hud`] into the page

    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlElement};

    use super::{Hud, Screen};

    fn set_display(document: &Document, id: &str, visible: bool, shown: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        {
            let _ = el
                .style()
                .set_property("display", if visible { shown } else { "none" });
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    /// Apply `hud`, touching only what changed since `prev`
    pub fn apply(document: &Document, hud: &Hud, prev: Option<&Hud>) {
        if prev.map(|p| p.screen) != Some(hud.screen) {
            set_display(document, "loadingScreen", hud.screen == Screen::Loading, "flex");
            set_display(document, "startScreen", hud.screen == Screen::Start, "flex");
            set_display(document, "levelSelectScreen", hud.screen == Screen::LevelSelect, "flex");
            set_display(document, "tutorialScreen", hud.screen == Screen::Tutorial, "flex");
            set_display(document, "gameOverScreen", hud.screen == Screen::GameOver, "flex");
            let in_game = hud.screen == Screen::Hud;
            set_display(document, "scoreDisplay", in_game, "block");
            set_display(document, "boostMeter", in_game, "flex");
        }

        set_text(document, "scoreDisplay", &format!("Score: {}", hud.score));
        set_text(document, "highScoreStartDisplay", &format!("High Score: {}", hud.high_score));
        set_text(document, "boostValue", &hud.boost_fuel.to_string());
        if let Some(meter) = document.get_element_by_id("boostMeter") {
            let class = if hud.boosting { "boosting" } else { "" };
            let _ = meter.set_attribute("class", class);
            let _ = meter.set_attribute("data-percent", &hud.boost_percent.to_string());
        }

        match &hud.level_name {
            Some(name) => {
                set_text(document, "levelNameDisplay", name);
                set_display(document, "levelNameDisplay", true, "block");
            }
            None => set_display(document, "levelNameDisplay", false, "block"),
        }

        if let Some(panel) = &hud.tutorial {
            set_text(document, "tutorialText", panel.text);
            set_display(document, "nextTutorialStepButton", panel.show_next, "inline-block");
            set_display(document, "startTutorialGameButton", panel.show_start, "inline-block");
        }

        if let Some(result) = &hud.result {
            set_text(
                document,
                "finalScore",
                &format!("Score: {}", result.score.max(0.0).floor() as u32),
            );
            set_text(
                document,
                "highScoreGameOverDisplay",
                &format!("High Score: {}", result.high_score.max(0.0).floor() as u32),
            );
            set_display(document, "newHighScoreMessage", result.new_high_score, "block");
        }

        if prev.map(|p| &p.roster) != Some(&hud.roster) {
            update_roster(document, hud);
        }
    }

    fn update_roster(document: &Document, hud: &Hud) {
        set_display(document, "multiplayerPanel", hud.multiplayer, "block");
        let Some(list) = document.get_element_by_id("multiplayerList") else {
            return;
        };
        list.set_inner_html("");
        if hud.roster.is_empty() {
            if let Ok(el) = document.create_element("div") {
                el.set_class_name("multiplayer-entry");
                el.set_text_content(Some("No players"));
                let _ = list.append_child(&el);
            }
            return;
        }
        for entry in &hud.roster {
            let Ok(row) = document.create_element("div") else {
                continue;
            };
            row.set_class_name("multiplayer-entry");
            if let Some(url) = &entry.avatar_url {
                if let Ok(img) = document.create_element("img") {
                    let _ = img.set_attribute("src", url);
                    let _ = img.set_attribute("alt", &entry.name);
                    let _ = row.append_child(&img);
                }
            }
            for (class, text) in [("mp-name", entry.name.clone()), ("mp-score", entry.score.to_string())] {
                if let Ok(cell) = document.create_element("div") {
                    cell.set_class_name(class);
                    cell.set_text_content(Some(&text));
                    let _ = row.append_child(&cell);
                }
            }
            let _ = list.append_child(&row);
        }
    }

    /// Show the fatal error overlay; the game is stopped at this point
    pub fn show_fatal(document: &Document, message: &str) {
        set_text(document, "fatalErrorText", message);
        set_display(document, "fatalErrorOverlay", true, "flex");
    }

    /// Note a failed asset load on the start screen
    pub fn show_load_error(document: &Document, message: &str) {
        set_text(document, "loadErrorMessage", message);
        set_display(document, "loadErrorMessage", true, "block");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{Launch, UiCommand, handle_command};

    #[test]
    fn test_screen_follows_phase() {
        let presence = Presence::offline();
        let mut s = GameState::new(GameConfig::default(), 5);
        assert_eq!(Hud::from_state(&s, &presence).screen, Screen::Loading);

        s.finish_loading();
        let hud = Hud::from_state(&s, &presence);
        assert_eq!(hud.screen, Screen::Start);
        assert_eq!(hud.high_score, 100);
        assert_eq!(hud.level_names.len(), 2);
        assert!(hud.tutorial.is_none());

        handle_command(&mut s, UiCommand::StartRandom);
        let hud = Hud::from_state(&s, &presence);
        assert_eq!(hud.screen, Screen::Tutorial);
        assert!(hud.tutorial.is_some());
    }

    #[test]
    fn test_canvas_point_scaling() {
        let canvas = Vec2::new(320.0, 480.0);
        // shown at 2x, offset by 10,20
        let p = canvas_point(Vec2::new(130.0, 260.0), Vec2::new(10.0, 20.0), canvas * 2.0, canvas);
        assert_eq!(p, Vec2::new(60.0, 120.0));
        // stretched unevenly
        let p = canvas_point(Vec2::new(640.0, 240.0), Vec2::ZERO, Vec2::new(1280.0, 480.0), canvas);
        assert_eq!(p, Vec2::new(160.0, 240.0));
        // collapsed element falls back to offsets
        assert_eq!(canvas_point(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::ZERO, canvas), Vec2::splat(5.0));
    }

    #[test]
    fn test_level_name_and_result() {
        let presence = Presence::offline();
        let mut s = GameState::new(GameConfig::default(), 5);
        s.finish_loading();
        s.tutorial.completed = true;
        handle_command(&mut s, UiCommand::SelectLevel(0));
        let hud = Hud::from_state(&s, &presence);
        assert_eq!(hud.level_name.as_deref(), Some("Level 1: The Basics"));
        assert_eq!(hud.boost_percent, 100);
        assert!(hud.result.is_none());

        s.launch(Launch { velocity: Vec2::new(5.0, 0.0), scroll_speed: 2.0 });
        s.score = 7.8;
        s.end_game();
        let hud = Hud::from_state(&s, &presence);
        assert_eq!(hud.screen, Screen::GameOver);
        let result = hud.result.unwrap();
        assert!(!result.new_high_score);
        assert_eq!(hud.score, 7);
    }
}
