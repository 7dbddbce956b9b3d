//! Fixed-step simulation tick

use super::enemy::{Enemy, update_enemies};
use super::pipe::{Pipe, random_gap_top, update_pipes};
use super::state::{GameEvent, GamePhase, GameState};
use crate::audio::{AudioCommand, SoundKey};
use crate::consts::CAMERA_X;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState) {
    state.frame_count += 1;

    if state.phase.is_active_play() {
        scroll_background(state);
        update_game_logic(state);
    }
}

fn scroll_background(state: &mut GameState) {
    state.bg_x -= state.config.background.base_speed * state.scroll_speed;
    if state.bg_x <= -state.config.world_width {
        state.bg_x = 0.0;
    }
}

/// Music rate for a scroll speed, before the audio layer's own clamp
pub fn music_rate(speed: f32, cfg: &crate::config::MusicConfig) -> f32 {
    let t = (speed - cfg.rate_base_speed) / (cfg.rate_max_speed - cfg.rate_base_speed);
    let rate = cfg.min_rate + t * (cfg.max_rate - cfg.min_rate);
    rate.clamp(cfg.rate_clamp_low, cfg.rate_clamp_high)
}

fn update_game_logic(state: &mut GameState) {
    let multiplier = if state.player.boost.boosting {
        state.config.boost.speed_multiplier
    } else {
        1.0
    };
    state.scroll_speed = state.base_speed * multiplier;
    let horizontal_speed = state.config.pipe.base_speed * state.scroll_speed;

    state
        .player
        .update(state.gravity_dir, state.phase, horizontal_speed);
    state.player.update_boost();

    let world_h = state.config.world_height;
    if state.player.check_boundary_collision(world_h) {
        state.end_game();
        return;
    }

    let track = if state.epic {
        SoundKey::EpicMusic
    } else {
        SoundKey::SpeedMusic
    };
    let rate = music_rate(state.scroll_speed, &state.config.music);
    state.audio(AudioCommand::SetPlaybackRate { key: track, rate });

    if state.phase == GamePhase::Playing
        && state.frame_count % state.config.enemy.spawn_interval_frames == 0
    {
        let enemy = Enemy::spawn(state.config.world_width, world_h, &state.config.enemy);
        state.enemies.push(enemy);
    }

    let player_rect = state.player.collision_rect();
    if update_enemies(&mut state.enemies, horizontal_speed, &player_rect) {
        state.end_game();
        return;
    }

    match state.phase {
        GamePhase::Playing => {
            if state.frame_count % state.config.pipe.spawn_interval == 0 {
                spawn_pipe(state, None);
            }
        }
        GamePhase::LevelPlaying => {
            let due = match state.level.as_mut() {
                Some(run) => state
                    .config
                    .levels
                    .get(run.index)
                    .and_then(|level| run.advance(level))
                    .map(|ev| ev.y),
                None => None,
            };
            if let Some(y) = due {
                spawn_pipe(state, y);
            }
        }
        _ => {}
    }

    let outcome = update_pipes(
        &mut state.pipes,
        horizontal_speed,
        &player_rect,
        world_h,
        CAMERA_X,
    );
    for _ in 0..outcome.passed {
        state.events.push(GameEvent::PipePassed);
        state.play_sound(SoundKey::Score);
    }
    if outcome.collided {
        state.end_game();
        return;
    }

    if state.phase == GamePhase::LevelPlaying {
        let consumed = match (state.level, state.current_level()) {
            (Some(run), Some(level)) => run.all_consumed(level),
            _ => true,
        };
        if consumed && state.pipes.is_empty() {
            state.end_level();
            return;
        }
    }

    accumulate_score(state);
}

fn spawn_pipe(state: &mut GameState, gap_top: Option<f32>) {
    let cfg = &state.config;
    let gap_top =
        gap_top.unwrap_or_else(|| random_gap_top(&mut state.rng, cfg.world_height, &cfg.pipe));
    state
        .pipes
        .push(Pipe::new(cfg.world_width, gap_top, &cfg.pipe));
}

fn accumulate_score(state: &mut GameState) {
    if state.scroll_speed <= 0.0 {
        return;
    }
    let scoring = &state.config.scoring;
    if state.frame_count % scoring.accumulate_every == 0 {
        state.score += state.scroll_speed * scoring.speed_factor;
    }

    if !state.epic && state.score >= scoring.epic_threshold {
        state.epic = true;
        log::info!("epic mode at score {:.1}", state.score);
        state.audio(AudioCommand::Stop(SoundKey::SpeedMusic));
        let volume = state.config.music.music_volume;
        state.play_music(SoundKey::EpicMusic, volume);
    }
}
