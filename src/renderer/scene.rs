//! Draws one frame of the game into the low-res canvas

use glam::Vec2;

use super::canvas::{PixelCanvas, Rgba};
use crate::consts::CAMERA_X;
use crate::presence::RemotePeer;
use crate::sim::{Enemy, EnemyPose, GamePhase, GameState, Pipe, PlayerSprite};

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    pub const SKY: Rgba = Rgba::rgb(255, 255, 255);
    pub const SKY_EPIC: Rgba = Rgba::rgb(0, 0, 139);
    pub const HILL: Rgba = Rgba::rgb(214, 236, 214);
    pub const EPIC_TINT: Rgba = Rgba { r: 0, g: 0, b: 50, a: 102 };
    pub const PIPE: Rgba = Rgba::rgb(76, 175, 80);
    pub const PIPE_CAP: Rgba = Rgba::rgb(46, 125, 50);
    pub const ENEMY: Rgba = Rgba::rgb(220, 60, 60);
    pub const ENEMY_PUNCH: Rgba = Rgba::rgb(150, 20, 20);
    pub const PLAYER: Rgba = Rgba::rgb(255, 160, 190);
    pub const PLAYER_SHIP: Rgba = Rgba::rgb(150, 150, 165);
    pub const TRAIL: Rgba = Rgba::rgb(255, 200, 80);
    pub const SLING_POST: Rgba = Rgba::rgb(0x5C, 0x33, 0x17);
    pub const SLING_BAND: Rgba = Rgba { r: 45, g: 24, b: 6, a: 204 };
    pub const REMOTE: Rgba = Rgba::rgb(0xff, 0xcc, 0x66);
    pub const REMOTE_MARK: Rgba = Rgba::rgb(60, 40, 10);
}

const REMOTE_RADIUS: f32 = 14.0;
const PIPE_CAP_HEIGHT: f32 = 6.0;

/// Render `state` plus any remote peers
pub fn draw_frame(state: &GameState, canvas: &mut PixelCanvas, peers: &[RemotePeer]) {
    let active = state.phase.is_active_play();
    draw_background(state, canvas, active && state.epic);

    match state.phase {
        GamePhase::Playing | GamePhase::LevelPlaying | GamePhase::GameOver => {
            for enemy in &state.enemies {
                draw_enemy(canvas, enemy);
            }
            for pipe in &state.pipes {
                draw_pipe(canvas, pipe, state.config.world_height);
            }
            draw_trail(state, canvas);
            draw_player(state, canvas);
            draw_remote(canvas, peers);
        }
        GamePhase::ReadyToLaunch => {
            draw_slingshot(state, canvas);
            draw_player(state, canvas);
        }
        GamePhase::Loading | GamePhase::Start | GamePhase::LevelSelect | GamePhase::Tutorial => {}
    }
}

/// Two side-by-side tiles starting at `bg_x`
fn draw_background(state: &GameState, canvas: &mut PixelCanvas, epic: bool) {
    let w = state.config.world_width;
    let h = state.config.world_height;
    canvas.clear(if epic { colors::SKY_EPIC } else { colors::SKY });

    if !epic {
        for tile_x in [state.bg_x, state.bg_x + w] {
            // low hills give the scroll something to show
            canvas.fill_circle(Vec2::new(tile_x + w * 0.25, h + 20.0), 70.0, colors::HILL);
            canvas.fill_circle(Vec2::new(tile_x + w * 0.75, h + 40.0), 90.0, colors::HILL);
        }
    }

    if epic {
        canvas.fill_rect(0.0, 0.0, w, h, colors::EPIC_TINT);
    }
}

fn draw_pipe(canvas: &mut PixelCanvas, pipe: &Pipe, world_height: f32) {
    let top = pipe.top_rect();
    let bottom = pipe.bottom_rect(world_height);
    canvas.fill_rect(top.left, top.top, top.width(), top.height(), colors::PIPE);
    canvas.fill_rect(bottom.left, bottom.top, bottom.width(), bottom.height(), colors::PIPE);
    canvas.fill_rect(
        top.left - 2.0,
        top.bottom - PIPE_CAP_HEIGHT,
        top.width() + 4.0,
        PIPE_CAP_HEIGHT,
        colors::PIPE_CAP,
    );
    canvas.fill_rect(
        bottom.left - 2.0,
        bottom.top,
        bottom.width() + 4.0,
        PIPE_CAP_HEIGHT,
        colors::PIPE_CAP,
    );
}

fn draw_enemy(canvas: &mut PixelCanvas, enemy: &Enemy) {
    let r = enemy.collision_rect();
    let color = match enemy.pose {
        EnemyPose::Stand => colors::ENEMY,
        EnemyPose::Punch => colors::ENEMY_PUNCH,
    };
    canvas.fill_rect(r.left, r.top, r.width(), r.height(), color);
    if enemy.pose == EnemyPose::Punch {
        // fist out front
        canvas.fill_circle(Vec2::new(r.left - 4.0, enemy.pos.y), 6.0, color);
    }
}

fn draw_trail(state: &GameState, canvas: &mut PixelCanvas) {
    for p in &state.player.trail {
        canvas.fill_circle(p.pos, p.size * 0.5, colors::TRAIL.with_alpha(p.alpha));
    }
}

fn draw_player(state: &GameState, canvas: &mut PixelCanvas) {
    let player = &state.player;
    let color = match player.sprite() {
        PlayerSprite::Normal => colors::PLAYER,
        PlayerSprite::Ship => colors::PLAYER_SHIP,
    };
    canvas.fill_rotated_rect(
        player.pos,
        Vec2::new(player.width, player.height),
        player.rotation,
        color,
    );
}

fn draw_slingshot(state: &GameState, canvas: &mut PixelCanvas) {
    let cfg = &state.config.slingshot;
    let (x, y) = (cfg.x, cfg.y);
    canvas.fill_rect(x - 7.5, y - 30.0, 15.0, 30.0, colors::SLING_POST);
    canvas.fill_rect(x - 7.5, y, 15.0, 30.0, colors::SLING_POST);

    let pouch = Vec2::new(state.player.pos.x - state.player.width / 4.0, state.player.pos.y);
    canvas.stroke_line(Vec2::new(x, y - 15.0), pouch, 5.0, colors::SLING_BAND);
    canvas.stroke_line(Vec2::new(x, y + 15.0), pouch, 5.0, colors::SLING_BAND);
}

/// Remote players share our camera column; only their height differs
fn draw_remote(canvas: &mut PixelCanvas, peers: &[RemotePeer]) {
    for peer in peers {
        let center = Vec2::new(CAMERA_X, peer.y);
        canvas.fill_circle(center, REMOTE_RADIUS, colors::REMOTE);
        if peer.initial != '?' {
            canvas.fill_circle(center, 3.0, colors::REMOTE_MARK);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::{RENDER_HEIGHT, RENDER_WIDTH};
    use crate::sim::{Launch, ModeKind};

    fn canvas() -> PixelCanvas {
        PixelCanvas::new(RENDER_WIDTH, RENDER_HEIGHT)
    }

    fn playing() -> GameState {
        let mut s = GameState::new(GameConfig::default(), 9);
        s.finish_loading();
        s.tutorial.completed = true;
        s.start_random();
        s.launch(Launch { velocity: Vec2::new(4.0, 0.0), scroll_speed: 2.0 });
        s
    }

    #[test]
    fn test_menu_draws_background_only() {
        let mut s = GameState::new(GameConfig::default(), 9);
        s.finish_loading();
        let mut c = canvas();
        draw_frame(&s, &mut c, &[RemotePeer { y: 100.0, initial: 'A' }]);
        assert_eq!(c.pixel(CAMERA_X as u32, 100), Some(colors::SKY));
        let p = s.player.pos;
        assert_eq!(c.pixel(p.x as u32, p.y as u32), Some(colors::SKY));
    }

    #[test]
    fn test_ready_draws_slingshot() {
        let mut s = GameState::new(GameConfig::default(), 9);
        s.finish_loading();
        s.tutorial.completed = true;
        s.start_random();
        assert_eq!(s.phase, GamePhase::ReadyToLaunch);
        // pulled back, so the posts are uncovered
        s.player.pos = Vec2::new(20.0, 300.0);
        let mut c = canvas();
        draw_frame(&s, &mut c, &[]);
        let sling = &s.config.slingshot;
        assert_eq!(
            c.pixel((sling.x + 6.0) as u32, (sling.y + 25.0) as u32),
            Some(colors::SLING_POST)
        );
        assert_eq!(
            c.pixel(s.player.pos.x as u32, s.player.pos.y as u32),
            Some(colors::PLAYER)
        );
    }

    #[test]
    fn test_playing_draws_entities() {
        let mut s = playing();
        s.pipes.push(Pipe::new(200.0, 100.0, &s.config.pipe));
        let mut c = canvas();
        draw_frame(&s, &mut c, &[RemotePeer { y: 400.0, initial: 'B' }]);
        assert_eq!(c.pixel(210, 20), Some(colors::PIPE));
        assert_eq!(c.pixel(210, 150), Some(colors::SKY));
        assert_eq!(c.pixel(CAMERA_X as u32 + 8, 400), Some(colors::REMOTE));
        assert_eq!(c.pixel(CAMERA_X as u32, 400), Some(colors::REMOTE_MARK));
    }

    #[test]
    fn test_ship_sprite_color() {
        let mut s = playing();
        s.player.change_mode(ModeKind::Ship);
        let mut c = canvas();
        draw_frame(&s, &mut c, &[]);
        let p = s.player.pos;
        assert_eq!(c.pixel(p.x as u32, p.y as u32), Some(colors::PLAYER_SHIP));
    }

    #[test]
    fn test_epic_tint() {
        let mut s = playing();
        s.epic = true;
        let mut c = canvas();
        draw_frame(&s, &mut c, &[]);
        let px = c.pixel(5, 5).unwrap();
        assert!(px.b > px.r);
        assert!(px.b < colors::SKY_EPIC.b);
    }
}
