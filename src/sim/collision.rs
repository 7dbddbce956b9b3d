//! Axis-aligned rectangle collision
//!
//! Everything in the world collides as boxes: the player's padded hitbox,
//! the two halves of a pipe, and enemies. Screen coordinates, y grows down.

use glam::Vec2;

/// Axis-aligned box in world pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Box of `size` centred on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(
            center.x - half.x,
            center.y - half.y,
            center.x + half.x,
            center.y + half.y,
        )
    }

    /// Shrink by `padding` on every side
    pub fn inset(self, padding: f32) -> Self {
        Self::new(
            self.left + padding,
            self.top + padding,
            self.right - padding,
            self.bottom - padding,
        )
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Open-interval overlap: touching edges do not count.
    ///
    /// Used for pipes.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.right > other.left
            && self.left < other.right
            && self.bottom > other.top
            && self.top < other.bottom
    }

    /// Closed-interval overlap: touching edges count.
    ///
    /// Used for enemies, whose punch should land on contact.
    pub fn touches(&self, other: &Rect) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_centered_and_inset() {
        let r = Rect::centered(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0)).inset(5.0);
        assert_eq!(r, Rect::new(85.0, 45.0, 115.0, 55.0));
        assert_eq!(r.width(), 30.0);
        assert_eq!(r.height(), 10.0);
    }

    #[test]
    fn test_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.touches(&b));
    }

    #[test]
    fn test_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 20.0, 10.0, 30.0);
        assert!(!a.intersects(&b));
        assert!(!a.touches(&b));
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, x + w, y + h))
    }

    proptest! {
        #[test]
        fn intersection_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            prop_assert_eq!(a.touches(&b), b.touches(&a));
        }

        #[test]
        fn strict_overlap_implies_touch(a in arb_rect(), b in arb_rect()) {
            if a.intersects(&b) {
                prop_assert!(a.touches(&b));
            }
        }
    }
}
