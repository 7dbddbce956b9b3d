//! Low-resolution software canvas
//!
//! The whole scene is drawn into a fixed 320x480 RGBA buffer, which the
//! present pass uploads as a texture and scales up with nearest sampling.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// One sRGB texel, straight alpha
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour with a 0..1 opacity
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Source-over onto an opaque destination
    fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            255 => self,
            0 => dst,
            a => {
                let a = a as u32;
                let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
                Rgba {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: 255,
                }
            }
        }
    }
}

pub struct PixelCanvas {
    width: u32,
    height: u32,
    px: Vec<Rgba>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            px: vec![Rgba::rgb(0, 0, 0); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major, for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.px)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.px[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn clear(&mut self, c: Rgba) {
        self.px.fill(Rgba { a: 255, ..c });
    }

    fn blend(&mut self, x: i32, y: i32, c: Rgba) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            let i = (y as u32 * self.width + x as u32) as usize;
            self.px[i] = c.over(self.px[i]);
        }
    }

    /// Axis-aligned rectangle with its top-left at (x, y)
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, c: Rgba) {
        let x0 = x.round().max(0.0) as i32;
        let y0 = y.round().max(0.0) as i32;
        let x1 = (x + w).round().min(self.width as f32) as i32;
        let y1 = (y + h).round().min(self.height as f32) as i32;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, c);
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, c: Rgba) {
        let r2 = radius * radius;
        let x0 = (center.x - radius).floor() as i32;
        let x1 = (center.x + radius).ceil() as i32;
        let y0 = (center.y - radius).floor() as i32;
        let y1 = (center.y + radius).ceil() as i32;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let d = Vec2::new(px as f32 + 0.5, py as f32 + 0.5) - center;
                if d.length_squared() <= r2 {
                    self.blend(px, py, c);
                }
            }
        }
    }

    /// Line segment of the given thickness
    pub fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, c: Rgba) {
        let half = width * 0.5;
        let lo = a.min(b) - Vec2::splat(half);
        let hi = a.max(b) + Vec2::splat(half);
        let ab = b - a;
        let len2 = ab.length_squared();
        for py in lo.y.floor() as i32..=hi.y.ceil() as i32 {
            for px in lo.x.floor() as i32..=hi.x.ceil() as i32 {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let t = if len2 > 0.0 {
                    ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                if (a + ab * t - p).length_squared() <= half * half {
                    self.blend(px, py, c);
                }
            }
        }
    }

    /// Rectangle of `size` centred on `center`, rotated by `angle` radians
    pub fn fill_rotated_rect(&mut self, center: Vec2, size: Vec2, angle: f32, c: Rgba) {
        let half = size * 0.5;
        let reach = half.length();
        let rot = Vec2::from_angle(-angle);
        for py in (center.y - reach).floor() as i32..=(center.y + reach).ceil() as i32 {
            for px in (center.x - reach).floor() as i32..=(center.x + reach).ceil() as i32 {
                let local = rot.rotate(Vec2::new(px as f32 + 0.5, py as f32 + 0.5) - center);
                if local.x.abs() <= half.x && local.y.abs() <= half.y {
                    self.blend(px, py, c);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::rgb(255, 0, 0);
    const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    #[test]
    fn test_fill_rect_clips() {
        let mut c = PixelCanvas::new(8, 8);
        c.fill_rect(-4.0, 6.0, 6.0, 10.0, RED);
        assert_eq!(c.pixel(0, 7), Some(RED));
        assert_eq!(c.pixel(1, 6), Some(RED));
        assert_eq!(c.pixel(2, 6), Some(Rgba::rgb(0, 0, 0)));
        assert_eq!(c.pixel(8, 0), None);
    }

    #[test]
    fn test_alpha_blend() {
        let mut c = PixelCanvas::new(2, 1);
        c.clear(WHITE);
        c.fill_rect(0.0, 0.0, 1.0, 1.0, Rgba::rgb(0, 0, 50).with_alpha(0.4));
        let p = c.pixel(0, 0).unwrap();
        assert_eq!(p.a, 255);
        assert_eq!(p.r, 153);
        assert_eq!(p.b, 173);
        assert_eq!(c.pixel(1, 0), Some(WHITE));
    }

    #[test]
    fn test_circle_and_line() {
        let mut c = PixelCanvas::new(32, 32);
        c.fill_circle(Vec2::new(16.0, 16.0), 4.0, RED);
        assert_eq!(c.pixel(16, 16), Some(RED));
        assert_ne!(c.pixel(16, 24), Some(RED));

        c.stroke_line(Vec2::new(0.0, 2.0), Vec2::new(31.0, 2.0), 2.0, WHITE);
        assert_eq!(c.pixel(10, 2), Some(WHITE));
        assert_ne!(c.pixel(10, 5), Some(WHITE));
    }

    #[test]
    fn test_rotated_rect() {
        let mut c = PixelCanvas::new(40, 40);
        // tall thin bar turned on its side
        c.fill_rotated_rect(
            Vec2::new(20.0, 20.0),
            Vec2::new(4.0, 30.0),
            std::f32::consts::FRAC_PI_2,
            RED,
        );
        assert_eq!(c.pixel(8, 20), Some(RED));
        assert_ne!(c.pixel(20, 8), Some(RED));
    }

    #[test]
    fn test_bytes_layout() {
        let mut c = PixelCanvas::new(2, 2);
        c.clear(Rgba::rgb(1, 2, 3));
        assert_eq!(c.as_bytes().len(), 16);
        assert_eq!(&c.as_bytes()[..4], &[1, 2, 3, 255]);
    }
}
