//! Slingshot Flyer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, anyhow};
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use slingshot_flyer::app::FrameStatus;
    use slingshot_flyer::audio::WebAudio;
    use slingshot_flyer::consts::*;
    use slingshot_flyer::renderer::PresentState;
    use slingshot_flyer::sim::{InputEvent, UiCommand};
    use slingshot_flyer::ui::{self, Hud, dom};
    use slingshot_flyer::{App, GameConfig, Progress, fatal};

    /// Optional tuning overrides served next to the page
    const CONFIG_URL: &str = "game_config.json";

    /// Browser-side game instance
    struct Game {
        app: App,
        present: PresentState,
        canvas: HtmlCanvasElement,
        document: Document,
        last_time: f64,
        last_hud: Option<Hud>,
        running: bool,
    }

    impl Game {
        /// Map a client-space point to canvas pixels
        fn to_canvas(&self, x: i32, y: i32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            ui::canvas_point(
                Vec2::new(x as f32, y as f32),
                Vec2::new(rect.left() as f32, rect.top() as f32),
                Vec2::new(rect.width() as f32, rect.height() as f32),
                Vec2::new(RENDER_WIDTH as f32, RENDER_HEIGHT as f32),
            )
        }

        fn inside_canvas(&self, x: i32, y: i32) -> bool {
            let rect = self.canvas.get_bounding_client_rect();
            let (x, y) = (x as f64, y as f64);
            x >= rect.left() && x <= rect.right() && y >= rect.top() && y <= rect.bottom()
        }

        fn resize_to_window(&mut self) {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            self.present.resize(width, height);
        }

        /// One animation frame. Returns false once the game has halted.
        fn frame(&mut self, time: f64) -> bool {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            let present = &mut self.present;
            let status = self.app.frame(dt, |canvas| match present.present(canvas) {
                Ok(()) => Ok(()),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = present.size;
                    present.resize(w, h);
                    Ok(())
                }
                Err(wgpu::SurfaceError::Timeout) => {
                    log::warn!("Surface timeout, skipping frame");
                    Ok(())
                }
                Err(e) => Err(anyhow!("present failed: {e:?}")),
            });

            if status == FrameStatus::Halted {
                let message = self.app.fault().unwrap_or("unknown error").to_string();
                if !fatal::report_fatal(&message) {
                    dom::show_fatal(&self.document, &message);
                }
                self.running = false;
                return false;
            }

            let hud = self.app.hud();
            dom::apply(&self.document, &hud, self.last_hud.as_ref());
            self.last_hud = Some(hud);
            true
        }
    }

    async fn fetch_text(url: &str) -> anyhow::Result<String> {
        let window = web_sys::window().context("no window")?;
        let resp = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| anyhow!("fetch {url}: {e:?}"))?;
        let resp: web_sys::Response = resp
            .dyn_into()
            .map_err(|_| anyhow!("fetch {url}: not a Response"))?;
        if !resp.ok() {
            return Err(anyhow!("fetch {url}: HTTP {}", resp.status()));
        }
        let text = JsFuture::from(resp.text().map_err(|e| anyhow!("read {url}: {e:?}"))?)
            .await
            .map_err(|e| anyhow!("read {url}: {e:?}"))?;
        text.as_string().context("response body is not text")
    }

    async fn load_config() -> GameConfig {
        match fetch_text(CONFIG_URL).await {
            Ok(json) => match GameConfig::from_json_str(&json) {
                Ok(config) => {
                    log::info!("Loaded {CONFIG_URL}");
                    config
                }
                Err(err) => {
                    log::warn!("Ignoring {CONFIG_URL}: {err:#}");
                    GameConfig::default()
                }
            },
            Err(err) => {
                log::info!("Using built-in config ({err:#})");
                GameConfig::default()
            }
        }
    }

    pub async fn run() -> anyhow::Result<()> {
        fatal::install_panic_hook();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| anyhow!("failed to init logger: {e}"))?;

        log::info!("Slingshot Flyer starting...");

        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .context("no #gameCanvas element")?
            .dyn_into()
            .map_err(|_| anyhow!("#gameCanvas is not a canvas"))?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width.max(1));
        canvas.set_height(height.max(1));

        let config = load_config().await;

        let mut audio = WebAudio::new();
        let audio_ctx = audio.context();
        let fatal_document = document.clone();
        fatal::set_fatal_handler(move |message| {
            if let Some(ctx) = audio_ctx {
                let _ = ctx.close();
            }
            dom::show_fatal(&fatal_document, message);
        });
        let report = audio.load_all().await;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .context("failed to create surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable graphics adapter")?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let present =
            PresentState::new(surface, &adapter, width, height, RENDER_WIDTH, RENDER_HEIGHT)
                .await?;

        let seed = js_sys::Date::now() as u64;
        let mut app = App::new(config, seed, Box::new(audio), Progress::load());
        if let Some(message) = app.finish_loading(&report) {
            dom::show_load_error(&document, &message);
        }
        log::info!("Game initialized with seed: {}", seed);

        populate_level_list(&document, &app.hud().level_names);

        let game = Rc::new(RefCell::new(Game {
            app,
            present,
            canvas,
            document,
            last_time: 0.0,
            last_hud: None,
            running: true,
        }));

        setup_pointer_handlers(game.clone());
        setup_keyboard(game.clone());
        setup_buttons(game.clone());
        setup_resize(game.clone());

        request_animation_frame(game);
        log::info!("Slingshot Flyer running!");
        Ok(())
    }

    fn populate_level_list(document: &Document, names: &[String]) {
        let Some(container) = document.get_element_by_id("levelListContainer") else {
            return;
        };
        container.set_inner_html("");
        for (index, name) in names.iter().enumerate() {
            let Ok(button) = document.create_element("button") else {
                continue;
            };
            button.set_class_name("level-button");
            button.set_text_content(Some(name));
            let _ = button.set_attribute("data-level", &index.to_string());
            let _ = container.append_child(&button);
        }
    }

    fn setup_pointer_handlers(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Mouse down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.running && g.inside_canvas(event.client_x(), event.client_y()) {
                    let pos = g.to_canvas(event.client_x(), event.client_y());
                    g.app.input(InputEvent::PointerDown { pos });
                }
            });
            let _ = document
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.to_canvas(event.client_x(), event.client_y());
                g.app.input(InputEvent::PointerMove { pos });
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().app.input(InputEvent::PointerUp);
            });
            let _ = document
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let mut g = game.borrow_mut();
                if g.running && g.inside_canvas(touch.client_x(), touch.client_y()) {
                    event.prevent_default();
                    let pos = g.to_canvas(touch.client_x(), touch.client_y());
                    g.app.input(InputEvent::PointerDown { pos });
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let mut g = game.borrow_mut();
                if g.app.state().slingshot.dragging {
                    event.prevent_default();
                }
                let pos = g.to_canvas(touch.client_x(), touch.client_y());
                g.app.input(InputEvent::PointerMove { pos });
            });
            let _ = document
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().app.input(InputEvent::PointerUp);
            });
            let _ = document
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let input = match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        if event.repeat() {
                            return;
                        }
                        InputEvent::Action
                    }
                    "z" | "Z" | "x" | "X" => InputEvent::BoostPressed,
                    _ => return,
                };
                game.borrow_mut().app.input(input);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let input = match event.key().as_str() {
                    " " => InputEvent::ActionReleased,
                    "z" | "Z" | "x" | "X" => InputEvent::BoostReleased,
                    _ => return,
                };
                game.borrow_mut().app.input(input);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let buttons = [
            ("startButton", UiCommand::StartRandom),
            ("playLevelsButton", UiCommand::ShowLevelSelect),
            ("restartButton", UiCommand::Restart),
            ("mainMenuButton", UiCommand::MainMenu),
            ("backToMainMenuButton", UiCommand::MainMenu),
            ("nextTutorialStepButton", UiCommand::NextTutorialStep),
            ("skipTutorialButton", UiCommand::SkipTutorial),
            ("startTutorialGameButton", UiCommand::StartTutorialGame),
        ];
        for (id, command) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing button #{id}");
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.stop_propagation();
                game.borrow_mut().app.command(command);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Level buttons are created at runtime; listen on their container
        if let Some(container) = document.get_element_by_id("levelListContainer") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let level = event
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                    .and_then(|el| el.get_attribute("data-level"))
                    .and_then(|v| v.parse::<usize>().ok());
                if let Some(index) = level {
                    event.stop_propagation();
                    game.borrow_mut().app.command(UiCommand::SelectLevel(index));
                }
            });
            let _ = container
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize_to_window();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = game.borrow_mut().frame(time);
        if keep_going {
            request_animation_frame(game);
        }
    }

    /// Shown when startup itself fails
    pub fn report_startup_failure(err: &anyhow::Error) {
        log::error!("Startup failed: {err:#}");
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            dom::show_fatal(&document, &format!("{err:#}"));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(err) = wasm_game::run().await {
        wasm_game::report_startup_failure(&err);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: skip the tutorial, fire the slingshot, and fly a simple
/// autopilot until the run ends.
#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use glam::Vec2;
    use slingshot_flyer::app::FrameStatus;
    use slingshot_flyer::assets::LoadReport;
    use slingshot_flyer::audio::SilentAudio;
    use slingshot_flyer::consts::SIM_DT;
    use slingshot_flyer::sim::{GamePhase, InputEvent, UiCommand};
    use slingshot_flyer::{App, GameConfig, Progress};

    env_logger::init();
    log::info!("Slingshot Flyer (native) starting...");
    log::info!("Native mode is headless - run the wasm build for the playable game");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
            GameConfig::from_json_str(&json).with_context(|| format!("load {path}"))?
        }
        None => GameConfig::default(),
    };

    let mut app = App::new(config, 42, Box::new(SilentAudio), Progress::load());
    app.finish_loading(&LoadReport::default());
    app.command(UiCommand::StartRandom);
    app.command(UiCommand::SkipTutorial);

    let anchor = Vec2::new(
        app.state().config.slingshot.x,
        app.state().config.slingshot.y,
    );
    app.input(InputEvent::PointerDown { pos: anchor });
    app.input(InputEvent::PointerMove { pos: anchor + Vec2::new(-40.0, -30.0) });
    app.input(InputEvent::PointerUp);

    let max_frames = 60 * 120;
    for _ in 0..max_frames {
        if app.frame(SIM_DT, |_| Ok(())) == FrameStatus::Halted {
            anyhow::bail!("halted: {}", app.fault().unwrap_or("unknown"));
        }
        let state = app.state();
        if state.phase == GamePhase::GameOver {
            break;
        }

        // aim for the middle of the next gap
        let player = &state.player;
        let target = state
            .pipes
            .iter()
            .find(|p| p.x + p.width > player.pos.x)
            .map(|p| p.gap_top + p.gap / 2.0)
            .unwrap_or(state.config.world_height / 2.0);
        if player.pos.y > target + 10.0 && player.vel.y > 0.0 {
            app.input(InputEvent::Action);
            app.input(InputEvent::ActionReleased);
        }
    }

    let state = app.state();
    log::info!(
        "Run finished in {:?} after {} frames, score {}",
        state.phase,
        state.frame_count,
        state.display_score()
    );
    println!("score: {}", state.display_score());
    Ok(())
}
