//! Punching enemies: wait off-screen, then charge left

use glam::Vec2;

use super::collision::Rect;
use crate::config::EnemyConfig;

/// Lifecycle, strictly forward: Idle -> Punching -> Done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Idle { timer: u32 },
    Punching,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyPose {
    Stand,
    Punch,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    /// Centre
    pub pos: Vec2,
    pub size: Vec2,
    pub state: EnemyState,
    pub pose: EnemyPose,
    /// Pixels per frame while punching
    pub speed: f32,
    idle_duration: u32,
    exit_margin: f32,
}

impl Enemy {
    /// New enemy just beyond the right edge, vertically centred
    pub fn spawn(world_width: f32, world_height: f32, cfg: &EnemyConfig) -> Self {
        let y = (world_height / 2.0)
            .min(world_height - cfg.vertical_margin)
            .max(cfg.vertical_margin);
        Self {
            pos: Vec2::new(world_width + cfg.width, y),
            size: Vec2::new(cfg.width, cfg.height),
            state: EnemyState::Idle { timer: 0 },
            pose: EnemyPose::Stand,
            speed: cfg.punch_speed,
            idle_duration: cfg.idle_duration_frames,
            exit_margin: cfg.exit_margin,
        }
    }

    pub fn update(&mut self) {
        match &mut self.state {
            EnemyState::Idle { timer } => {
                *timer += 1;
                if *timer >= self.idle_duration {
                    self.state = EnemyState::Punching;
                    self.pose = EnemyPose::Punch;
                }
            }
            EnemyState::Punching => {
                self.pos.x -= self.speed;
                if self.pos.x + self.size.x < -self.exit_margin {
                    self.state = EnemyState::Done;
                }
            }
            EnemyState::Done => {}
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == EnemyState::Done
    }

    pub fn collision_rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    /// Inclusive overlap test; the pose follows the result.
    pub fn check_collision(&mut self, player: &Rect) -> bool {
        let hit = self.collision_rect().touches(player);
        self.pose = if hit { EnemyPose::Punch } else { EnemyPose::Stand };
        hit
    }
}

/// Sync speed, update, collide and retire every enemy.
///
/// Returns true on the first hit, leaving the rest untouched.
pub fn update_enemies(enemies: &mut Vec<Enemy>, speed: f32, player: &Rect) -> bool {
    let mut i = enemies.len();
    while i > 0 {
        i -= 1;
        let enemy = &mut enemies[i];
        enemy.speed = speed;
        enemy.update();
        if enemy.check_collision(player) {
            return true;
        }
        if enemy.is_done() {
            enemies.remove(i);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn far_player() -> Rect {
        Rect::centered(Vec2::new(80.0, 40.0), Vec2::new(10.0, 10.0))
    }

    #[test]
    fn test_spawn_position() {
        let e = Enemy::spawn(320.0, 480.0, &EnemyConfig::default());
        assert_eq!(e.pos, Vec2::new(366.0, 240.0));
        assert_eq!(e.state, EnemyState::Idle { timer: 0 });
        assert_eq!(e.pose, EnemyPose::Stand);

        let short = Enemy::spawn(320.0, 60.0, &EnemyConfig::default());
        assert_eq!(short.pos.y, 40.0);
    }

    #[test]
    fn test_lifecycle_order() {
        let mut e = Enemy::spawn(320.0, 480.0, &EnemyConfig::default());
        for _ in 0..89 {
            e.update();
        }
        assert!(matches!(e.state, EnemyState::Idle { timer: 89 }));
        assert_eq!(e.pos.x, 366.0);

        e.update();
        assert_eq!(e.state, EnemyState::Punching);
        assert_eq!(e.pose, EnemyPose::Punch);

        let mut seen_done = false;
        for _ in 0..200 {
            e.update();
            if seen_done {
                assert_eq!(e.state, EnemyState::Done);
            }
            seen_done |= e.is_done();
        }
        assert!(seen_done);
        assert!(e.pos.x + e.size.x < -40.0);
    }

    #[test]
    fn test_collision_is_inclusive_and_sets_pose() {
        let mut e = Enemy::spawn(320.0, 480.0, &EnemyConfig::default());
        e.pos = Vec2::new(100.0, 240.0);
        // right edge of enemy at 123, player left edge exactly there
        let flush = Rect::new(123.0, 230.0, 140.0, 250.0);
        assert!(e.check_collision(&flush));
        assert_eq!(e.pose, EnemyPose::Punch);
        assert!(!e.check_collision(&far_player()));
        assert_eq!(e.pose, EnemyPose::Stand);
    }

    #[test]
    fn test_removed_only_when_done() {
        let cfg = EnemyConfig::default();
        let mut enemies = vec![Enemy::spawn(320.0, 480.0, &cfg)];
        enemies[0].state = EnemyState::Punching;
        enemies[0].pos.x = -100.0;
        enemies.push(Enemy::spawn(320.0, 480.0, &cfg));

        assert!(!update_enemies(&mut enemies, 4.0, &far_player()));
        assert_eq!(enemies.len(), 1);
        assert!(matches!(enemies[0].state, EnemyState::Idle { timer: 1 }));
        assert_eq!(enemies[0].speed, 4.0);
    }

    #[test]
    fn test_update_reports_hit() {
        let cfg = EnemyConfig::default();
        let mut e = Enemy::spawn(320.0, 480.0, &cfg);
        e.state = EnemyState::Punching;
        e.pos = Vec2::new(84.0, 240.0);
        let mut enemies = vec![e];
        let player = Rect::centered(Vec2::new(80.0, 240.0), Vec2::new(35.0, 50.0));
        assert!(update_enemies(&mut enemies, 2.0, &player));
        assert_eq!(enemies.len(), 1);
    }
}
