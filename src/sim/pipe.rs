//! Pipes: pairs of columns with a gap, scrolling left

use rand::Rng;

use super::collision::Rect;
use crate::config::PipeConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    pub gap_top: f32,
    pub gap: f32,
    pub width: f32,
    pub passed: bool,
}

impl Pipe {
    pub fn new(x: f32, gap_top: f32, cfg: &PipeConfig) -> Self {
        Self {
            x,
            gap_top,
            gap: cfg.gap,
            width: cfg.width(),
            passed: false,
        }
    }

    pub fn advance(&mut self, dx: f32) {
        self.x -= dx;
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.x + self.width, self.gap_top)
    }

    pub fn bottom_rect(&self, world_height: f32) -> Rect {
        Rect::new(self.x, self.gap_top + self.gap, self.x + self.width, world_height)
    }

    pub fn collides(&self, player: &Rect, world_height: f32) -> bool {
        player.intersects(&self.top_rect()) || player.intersects(&self.bottom_rect(world_height))
    }

    /// Marks the pipe passed the first time its right edge clears `camera_x`.
    /// Returns true only on that transition.
    pub fn check_passed(&mut self, camera_x: f32) -> bool {
        if !self.passed && self.x + self.width < camera_x {
            self.passed = true;
            true
        } else {
            false
        }
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }
}

/// Uniform gap top within `[margin, world_height - gap - margin]`; pins to the
/// margin when the range is empty.
pub fn random_gap_top<R: Rng>(rng: &mut R, world_height: f32, cfg: &PipeConfig) -> f32 {
    let lo = cfg.gap_margin;
    let hi = world_height - cfg.gap - cfg.gap_margin;
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

/// Result of one frame of pipe management
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipeOutcome {
    pub collided: bool,
    /// Pipes that crossed the camera this frame
    pub passed: u32,
}

/// Advance, collide, mark passed and retire every pipe.
///
/// Stops at the first collision, leaving the remaining pipes untouched.
pub fn update_pipes(
    pipes: &mut Vec<Pipe>,
    dx: f32,
    player: &Rect,
    world_height: f32,
    camera_x: f32,
) -> PipeOutcome {
    let mut outcome = PipeOutcome::default();
    let mut i = pipes.len();
    while i > 0 {
        i -= 1;
        let pipe = &mut pipes[i];
        pipe.advance(dx);
        if pipe.collides(player, world_height) {
            outcome.collided = true;
            return outcome;
        }
        if pipe.check_passed(camera_x) {
            outcome.passed += 1;
        }
        if pipe.is_off_screen() {
            pipes.remove(i);
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn cfg() -> PipeConfig {
        PipeConfig::default()
    }

    #[test]
    fn test_rects() {
        let p = Pipe::new(100.0, 120.0, &cfg());
        assert_eq!(p.top_rect(), Rect::new(100.0, 0.0, 196.0, 120.0));
        assert_eq!(p.bottom_rect(480.0), Rect::new(100.0, 320.0, 196.0, 480.0));
    }

    #[test]
    fn test_collision_is_exact() {
        let p = Pipe::new(100.0, 120.0, &cfg());
        // inside the gap
        let ok = Rect::new(110.0, 130.0, 150.0, 300.0);
        assert!(!p.collides(&ok, 480.0));
        // touching the gap edges only
        let flush = Rect::new(110.0, 120.0, 150.0, 320.0);
        assert!(!p.collides(&flush, 480.0));
        // one pixel into the top column
        let hit = Rect::new(110.0, 119.0, 150.0, 300.0);
        assert!(p.collides(&hit, 480.0));
        // left of the pipe
        let clear = Rect::new(0.0, 0.0, 100.0, 480.0);
        assert!(!p.collides(&clear, 480.0));
    }

    #[test]
    fn test_passed_fires_once() {
        let mut p = Pipe::new(100.0, 120.0, &cfg());
        assert!(!p.check_passed(160.0));
        p.advance(40.0);
        // right edge at 156
        assert!(p.check_passed(160.0));
        assert!(p.passed);
        p.advance(10.0);
        assert!(!p.check_passed(160.0));
    }

    #[test]
    fn test_update_retires_and_counts() {
        let c = cfg();
        let mut pipes = vec![Pipe::new(-90.0, 120.0, &c), Pipe::new(70.0, 120.0, &c)];
        let far = Rect::centered(Vec2::new(300.0, 240.0), Vec2::new(10.0, 10.0));
        let out = update_pipes(&mut pipes, 10.0, &far, 480.0, 160.0);
        assert!(!out.collided);
        assert_eq!(out.passed, 2);
        assert_eq!(pipes.len(), 1);
        assert_eq!(pipes[0].x, 60.0);
    }

    #[test]
    fn test_update_stops_on_collision() {
        let c = cfg();
        let mut pipes = vec![Pipe::new(-95.0, 120.0, &c), Pipe::new(60.0, 120.0, &c)];
        let player = Rect::centered(Vec2::new(80.0, 50.0), Vec2::new(20.0, 20.0));
        let out = update_pipes(&mut pipes, 2.0, &player, 480.0, 160.0);
        assert!(out.collided);
        // newest pipe is processed first, so the old one was never advanced
        assert_eq!(pipes.len(), 2);
        assert_eq!(pipes[0].x, -95.0);
        assert_eq!(pipes[1].x, 58.0);
    }

    #[test]
    fn test_gap_pins_when_range_empty() {
        let mut c = cfg();
        c.gap_margin = 300.0;
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(random_gap_top(&mut rng, 480.0, &c), 300.0);
    }

    proptest! {
        #[test]
        fn random_gap_within_margins(seed in any::<u64>()) {
            let c = cfg();
            let mut rng = Pcg32::seed_from_u64(seed);
            let y = random_gap_top(&mut rng, 480.0, &c);
            prop_assert!((75.0..=205.0).contains(&y));
        }
    }
}
