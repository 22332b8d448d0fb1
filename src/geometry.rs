use glam::Vec2;

/// How the coordinates of an incoming point are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordSpace {
    /// Fractions of the viewport, both axes in [0, 1]
    Normalized,
    /// Absolute pixels, y growing downward
    Pixels,
}

/// Pixel dimensions of the surface the menu is drawn on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Convert a point into pixel space.
    pub fn to_pixels(&self, point: Vec2, space: CoordSpace) -> Vec2 {
        match space {
            CoordSpace::Pixels => point,
            CoordSpace::Normalized => point * self.size(),
        }
    }

    /// Convert a pixel point into normalized space.
    /// A degenerate axis maps to 0 instead of dividing by zero.
    pub fn to_normalized(&self, point: Vec2) -> Vec2 {
        let x = if self.width > 0.0 { point.x / self.width } else { 0.0 };
        let y = if self.height > 0.0 { point.y / self.height } else { 0.0 };
        Vec2::new(x, y)
    }

    /// Anchor of the menu: centre of the bottom edge.
    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height)
    }
}

/// Polar to Cartesian, standard maths orientation (y up).
pub fn polar_to_cartesian(magnitude: f32, angle: f32) -> Vec2 {
    Vec2::new(magnitude * angle.cos(), magnitude * angle.sin())
}

/// Polar offset around `center` on a y-down screen, so positive angles
/// open toward the top of the surface.
pub fn polar_to_screen(center: Vec2, magnitude: f32, angle: f32) -> Vec2 {
    let rel = polar_to_cartesian(magnitude, angle);
    Vec2::new(center.x + rel.x, center.y - rel.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalized_to_pixels() {
        let viewport = Viewport::new(1000.0, 800.0);

        let p = viewport.to_pixels(Vec2::new(0.5, 0.25), CoordSpace::Normalized);
        assert!((p.x - 500.0).abs() < 0.01);
        assert!((p.y - 200.0).abs() < 0.01);

        // Pixel input passes through untouched
        let q = viewport.to_pixels(Vec2::new(12.0, 34.0), CoordSpace::Pixels);
        assert_eq!(q, Vec2::new(12.0, 34.0));
    }

    #[test]
    fn test_roundtrip_conversion() {
        let viewport = Viewport::new(1280.0, 720.0);

        let pixel = Vec2::new(123.45, 678.90);
        let back = viewport.to_pixels(viewport.to_normalized(pixel), CoordSpace::Normalized);

        assert!((back.x - pixel.x).abs() < 0.01);
        assert!((back.y - pixel.y).abs() < 0.01);
    }

    #[test]
    fn test_degenerate_viewport_normalizes_to_zero() {
        let viewport = Viewport::new(0.0, 0.0);
        assert_eq!(viewport.to_normalized(Vec2::new(10.0, 10.0)), Vec2::ZERO);
    }

    #[test]
    fn test_bottom_center() {
        let viewport = Viewport::new(1000.0, 800.0);
        assert_eq!(viewport.bottom_center(), Vec2::new(500.0, 800.0));
    }

    #[test]
    fn test_polar_to_screen_opens_upward() {
        let center = Vec2::new(500.0, 800.0);

        let top = polar_to_screen(center, 100.0, FRAC_PI_2);
        assert!((top.x - 500.0).abs() < 0.01);
        assert!((top.y - 700.0).abs() < 0.01);

        let left = polar_to_screen(center, 100.0, PI);
        assert!((left.x - 400.0).abs() < 0.01);
        assert!((left.y - 800.0).abs() < 0.01);
    }
}
