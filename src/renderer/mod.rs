//! Rendering module
//!
//! The simulation never touches a drawing API directly. Everything goes
//! through [`Surface`], a small 2D capability: clear, filled shapes, and
//! rotated sprite blits. On wasm it is backed by a Canvas 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod frame;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use frame::{Drawable, Scene, draw_frame};

use glam::Vec2;

use crate::sim::Rect;

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From 0xRRGGBB
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// CSS `rgba()` string with `alpha` clamped to [0, 1]
    pub fn css(&self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }
}

/// Face bitmaps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Face,
    /// Shown while the board is agitated
    AlarmedFace,
}

/// 2D drawing capability
pub trait Surface {
    /// Drawable size in pixels
    fn size(&self) -> Vec2;

    /// Clear the whole surface to transparent
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32);

    /// Draw `sprite` as a `size` square centered on `center`, rotated by `angle`.
    ///
    /// Returns false (and draws nothing) while the bitmap is still loading.
    fn draw_sprite(&mut self, sprite: Sprite, center: Vec2, size: f32, angle: f32) -> bool;
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Rect {
        rect: Rect,
        color: Color,
        alpha: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: f32,
    },
    Sprite {
        sprite: Sprite,
        center: Vec2,
        size: f32,
        angle: f32,
    },
}

/// Surface that records draw calls instead of drawing (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub size: Vec2,
    pub calls: Vec<DrawCall>,
    /// When false, sprites report "not loaded" and are skipped
    pub sprites_ready: bool,
}

impl RecordingSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            calls: Vec::new(),
            sprites_ready: true,
        }
    }

    /// Forget everything recorded so far
    pub fn reset(&mut self) {
        self.calls.clear();
    }

    pub fn sprites(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Sprite { .. }))
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32) {
        self.calls.push(DrawCall::Rect { rect, color, alpha });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn draw_sprite(&mut self, sprite: Sprite, center: Vec2, size: f32, angle: f32) -> bool {
        if !self.sprites_ready {
            return false;
        }
        self.calls.push(DrawCall::Sprite {
            sprite,
            center,
            size,
            angle,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex_and_css() {
        let c = Color::from_hex(0xffccaa);
        assert_eq!(c, Color::rgb(255, 204, 170));
        assert_eq!(c.css(0.5), "rgba(255, 204, 170, 0.5)");
        assert_eq!(c.css(-1.0), "rgba(255, 204, 170, 0)");
    }
}
