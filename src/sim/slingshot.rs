//! Slingshot launch: drag, clamp, release

use glam::Vec2;

use crate::config::SlingshotConfig;

/// Velocity and world scroll speed produced by a release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub velocity: Vec2,
    pub scroll_speed: f32,
}

/// Drag state while waiting to launch
#[derive(Debug, Clone, Default)]
pub struct Slingshot {
    pub dragging: bool,
    /// Current clamped offset from the anchor
    pub stretch: Vec2,
}

impl Slingshot {
    pub fn reset(&mut self) {
        self.dragging = false;
        self.stretch = Vec2::ZERO;
    }

    /// Begin a drag. The player snaps to the raw pointer position.
    pub fn begin_drag(&mut self, pointer: Vec2) -> Vec2 {
        self.dragging = true;
        pointer
    }

    /// Update the stretch from the pointer; returns where the player should sit.
    /// Ignored unless a drag is in progress.
    pub fn drag_to(&mut self, pointer: Vec2, cfg: &SlingshotConfig) -> Option<Vec2> {
        if !self.dragging {
            return None;
        }
        let anchor = Vec2::new(cfg.x, cfg.y);
        self.stretch = clamp_stretch(pointer - anchor, cfg.max_stretch);
        Some(anchor + self.stretch)
    }

    /// Finish a drag and compute the launch. `None` when no drag was active.
    pub fn release(&mut self, cfg: &SlingshotConfig, pipe_base_speed: f32) -> Option<Launch> {
        if !self.dragging {
            return None;
        }
        let velocity = launch_velocity(self.stretch, cfg.launch_power);
        let launch = Launch {
            velocity,
            scroll_speed: scroll_speed_for(velocity.x, pipe_base_speed, cfg),
        };
        self.reset();
        Some(launch)
    }
}

/// Clamp to `max` length, keeping the direction
pub fn clamp_stretch(offset: Vec2, max: f32) -> Vec2 {
    offset.clamp_length_max(max)
}

pub fn launch_velocity(stretch: Vec2, power: f32) -> Vec2 {
    -stretch * power
}

pub fn scroll_speed_for(vx: f32, pipe_base_speed: f32, cfg: &SlingshotConfig) -> f32 {
    (vx * pipe_base_speed / cfg.speed_divisor).max(cfg.min_scroll_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cfg() -> SlingshotConfig {
        SlingshotConfig::default()
    }

    #[test]
    fn test_launch_scenario() {
        let c = cfg();
        let mut s = Slingshot::default();
        s.begin_drag(Vec2::new(60.0, 135.0));
        let at = s.drag_to(Vec2::new(20.0, 105.0), &c).unwrap();
        assert_eq!(at, Vec2::new(20.0, 105.0));

        let launch = s.release(&c, 2.0).unwrap();
        assert!((launch.velocity.x - 6.0).abs() < 1e-5);
        assert!((launch.velocity.y - 4.5).abs() < 1e-5);
        assert!((launch.scroll_speed - 2.4).abs() < 1e-5);
        assert!(!s.dragging);
        assert_eq!(s.stretch, Vec2::ZERO);
    }

    #[test]
    fn test_forward_drag_hits_minimum_speed() {
        let c = cfg();
        let mut s = Slingshot::default();
        s.begin_drag(Vec2::new(60.0, 135.0));
        s.drag_to(Vec2::new(100.0, 135.0), &c);
        let launch = s.release(&c, 2.0).unwrap();
        assert!(launch.velocity.x < 0.0);
        assert_eq!(launch.scroll_speed, 1.0);
    }

    #[test]
    fn test_release_without_drag() {
        let mut s = Slingshot::default();
        assert!(s.release(&cfg(), 2.0).is_none());
        assert!(s.drag_to(Vec2::ZERO, &cfg()).is_none());
    }

    #[test]
    fn test_click_without_move_launches_at_minimum() {
        let mut s = Slingshot::default();
        s.begin_drag(Vec2::new(200.0, 300.0));
        let launch = s.release(&cfg(), 2.0).unwrap();
        assert_eq!(launch.velocity, Vec2::ZERO);
        assert_eq!(launch.scroll_speed, 1.0);
    }

    #[test]
    fn test_clamp_keeps_direction() {
        let c = clamp_stretch(Vec2::new(-300.0, -400.0), 80.0);
        assert!((c - Vec2::new(-48.0, -64.0)).length() < 1e-4);
    }

    proptest! {
        #[test]
        fn stretch_never_exceeds_max(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0) {
            let c = cfg();
            let mut s = Slingshot::default();
            s.begin_drag(Vec2::new(x, y));
            s.drag_to(Vec2::new(x, y), &c);
            prop_assert!(s.stretch.length() <= c.max_stretch + 1e-3);
            let launch = s.release(&c, 2.0).unwrap();
            prop_assert!(launch.scroll_speed >= 1.0);
        }

        #[test]
        fn velocity_is_deterministic(x in -80.0f32..80.0, y in -80.0f32..80.0) {
            let a = launch_velocity(Vec2::new(x, y), 0.15);
            let b = launch_velocity(Vec2::new(x, y), 0.15);
            prop_assert_eq!(a, b);
            prop_assert!((a + Vec2::new(x, y) * 0.15).length() < 1e-5);
        }
    }
}
