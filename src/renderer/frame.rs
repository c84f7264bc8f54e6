//! Per-frame draw pass
//!
//! Order, back to front: targets (creation order, newest on top), particles,
//! pointer trail, pointer dot.

use glam::Vec2;

use super::{Color, Sprite, Surface};
use crate::angle_toward;
use crate::sim::{BoardState, Particle, Rect, Target, TrailPoint};

/// Trail color (soft red)
pub const TRAIL_COLOR: Color = Color::rgb(231, 76, 60);
/// Pointer dot color
pub const POINTER_COLOR: Color = Color::rgb(255, 0, 0);
pub const POINTER_RADIUS: f32 = 4.0;
pub const POINTER_GLOW_RADIUS: f32 = 8.0;
pub const POINTER_GLOW_ALPHA: f32 = 0.3;

/// Frame-wide values entities need to draw themselves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub pointer: Vec2,
    /// Board is agitated: faces switch to the alarmed sprite
    pub alarmed: bool,
}

impl Scene {
    pub fn of(state: &BoardState) -> Self {
        Self {
            pointer: state.pointer,
            alarmed: state.is_agitated(),
        }
    }
}

/// Anything that can put itself on a [`Surface`]
pub trait Drawable {
    fn draw(&self, surface: &mut dyn Surface, scene: &Scene);
}

impl Drawable for Target {
    /// Face turned toward the pointer
    fn draw(&self, surface: &mut dyn Surface, scene: &Scene) {
        let center = self.center();
        let sprite = if scene.alarmed {
            Sprite::AlarmedFace
        } else {
            Sprite::Face
        };
        // Unloaded bitmaps are skipped; the next frame tries again
        surface.draw_sprite(sprite, center, self.size, angle_toward(center, scene.pointer));
    }
}

impl Drawable for Particle {
    fn draw(&self, surface: &mut dyn Surface, _scene: &Scene) {
        surface.fill_rect(
            Rect::square(self.pos, self.size),
            Color::from_hex(self.color),
            self.alpha(),
        );
    }
}

impl Drawable for TrailPoint {
    fn draw(&self, surface: &mut dyn Surface, _scene: &Scene) {
        surface.fill_circle(self.pos, POINTER_RADIUS * self.life, TRAIL_COLOR, self.life * 0.5);
    }
}

/// Draw the pointer dot and its glow
pub fn draw_pointer(surface: &mut dyn Surface, pointer: Vec2) {
    surface.fill_circle(pointer, POINTER_RADIUS, POINTER_COLOR, 1.0);
    surface.fill_circle(pointer, POINTER_GLOW_RADIUS, POINTER_COLOR, POINTER_GLOW_ALPHA);
}

/// Render the whole board
pub fn draw_frame(state: &BoardState, surface: &mut dyn Surface) {
    let scene = Scene::of(state);
    surface.clear();

    for target in &state.targets {
        target.draw(surface, &scene);
    }
    for particle in &state.particles {
        particle.draw(surface, &scene);
    }
    for point in &state.trail {
        point.draw(surface, &scene);
    }
    draw_pointer(surface, state.pointer);
}
