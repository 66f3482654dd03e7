use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }

    pub fn lerp(self, target: Vec2, t: f32) -> Vec2 {
        Vec2::new(
            self.x + (target.x - self.x) * t,
            self.y + (target.y - self.y) * t,
        )
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let d = self.sub(other);
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

/// Axis-aligned rectangle in stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Rect {
    pub fn from_center_size(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            half_extents: Vec2::new(width * 0.5, height * 0.5),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half_extents.x
            && (point.y - self.center.y).abs() <= self.half_extents.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Stage space convention:
/// - origin is the screen center, x grows right, y grows up.
/// - screen pixels have their origin top-left with y growing down.
pub fn screen_to_stage(screen_px: Vec2, screen: ScreenSize) -> Vec2 {
    Vec2::new(
        screen_px.x - screen.width as f32 * 0.5,
        screen.height as f32 * 0.5 - screen_px.y,
    )
}

pub fn stage_to_screen(stage: Vec2, screen: ScreenSize) -> Vec2 {
    Vec2::new(
        stage.x + screen.width as f32 * 0.5,
        screen.height as f32 * 0.5 - stage.y,
    )
}

/// Quarter-sine easing used by every positional animation; `t` is clamped to `[0, 1]`.
pub fn ease_sine(t: f32) -> f32 {
    (t.clamp(0.0, 1.0) * FRAC_PI_2).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_center_maps_to_stage_origin() {
        let screen = ScreenSize {
            width: 800,
            height: 600,
        };
        let stage = screen_to_stage(Vec2::new(400.0, 300.0), screen);
        assert_eq!(stage, Vec2::ZERO);
    }

    #[test]
    fn stage_y_grows_upward() {
        let screen = ScreenSize::default();
        let top = screen_to_stage(Vec2::new(640.0, 0.0), screen);
        assert_eq!(top, Vec2::new(0.0, 360.0));
        assert_eq!(stage_to_screen(top, screen), Vec2::new(640.0, 0.0));
    }

    #[test]
    fn rect_contains_is_inclusive_at_edges() {
        let rect = Rect::from_center_size(Vec2::new(10.0, 10.0), 4.0, 2.0);
        assert!(rect.contains(Vec2::new(12.0, 11.0)));
        assert!(!rect.contains(Vec2::new(12.1, 10.0)));
    }

    #[test]
    fn ease_sine_clamps_and_hits_endpoints() {
        assert_eq!(ease_sine(-1.0), 0.0);
        assert!((ease_sine(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_sine(4.0) - 1.0).abs() < 1e-6);
        assert!(ease_sine(0.5) > 0.5);
    }
}
