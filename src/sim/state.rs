//! Board state and entity types
//!
//! Everything the frame tick and the input callbacks share lives in
//! [`BoardState`]. Callers own it and pass it by reference; there are no
//! globals.

use glam::Vec2;
use rand::Rng;

use super::collision::point_within;
use super::rect::Rect;
use crate::tuning::Tuning;

/// Lock state of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Targets guard the controls
    #[default]
    Locked,
    /// Every target is gone. Terminal.
    Unlocked,
}

/// Something the page layer should react to
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// The grid was (re)built
    BoardBuilt {
        columns: u32,
        rows: u32,
        targets: usize,
    },
    /// A control's blocked flag flipped
    ControlBlocked { index: usize, blocked: bool },
    /// The last target is gone
    Unlocked,
}

/// A grid-cell face the player must click
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: u32,
    /// Side length
    pub size: f32,
    /// Top-left corner used for drawing and hit tests
    pub pos: Vec2,
    /// Home position from the layout; never changes
    pub anchor: Vec2,
}

impl Target {
    pub fn new(id: u32, anchor: Vec2, size: f32) -> Self {
        Self {
            id,
            size,
            pos: anchor,
            anchor,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Snap to the anchor, or jitter around it while agitated.
    ///
    /// Each call draws a fresh offset; the previous jitter is forgotten.
    pub fn update<R: Rng>(&mut self, agitated: bool, jitter: f32, rng: &mut R) {
        if agitated && jitter > 0.0 {
            let dx = (rng.random::<f32>() * 2.0 - 1.0) * jitter;
            let dy = (rng.random::<f32>() * 2.0 - 1.0) * jitter;
            self.pos = self.anchor + Vec2::new(dx, dy);
        } else {
            self.pos = self.anchor;
        }
    }

    /// True if `point` is strictly closer to the center than half the size plus `margin`
    pub fn is_hit(&self, point: Vec2, margin: f32) -> bool {
        point_within(point, self.center(), self.size / 2.0 + margin)
    }
}

/// Burst palette (0xRRGGBB). White holds two slots.
pub const PARTICLE_PALETTE: [u32; 5] = [0xffffff, 0x111111, 0xffccaa, 0xffffff, 0x333333];

/// A square fragment thrown out when a target is destroyed
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
    /// 1.0 at spawn, removed once <= 0
    pub life: f32,
}

impl Particle {
    /// Spawn at `pos` with a random velocity, size and palette color
    pub fn spawn<R: Rng>(pos: Vec2, tuning: &Tuning, rng: &mut R) -> Self {
        let size_span = (tuning.particle_max_size - tuning.particle_min_size).max(0.0);
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * tuning.particle_speed,
            (rng.random::<f32>() - 0.5) * tuning.particle_speed,
        );
        let color = PARTICLE_PALETTE[rng.random_range(0..PARTICLE_PALETTE.len())];
        Self {
            pos,
            vel,
            size: tuning.particle_min_size + rng.random::<f32>() * size_span,
            color,
            life: 1.0,
        }
    }

    /// Euler step plus life decay
    pub fn update(&mut self, decay: f32) {
        self.pos += self.vel;
        self.life -= decay;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Draw opacity, floored at zero
    pub fn alpha(&self) -> f32 {
        self.life.max(0.0)
    }
}

/// A fading point of the pointer trail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub life: f32,
}

/// A page control as the simulation sees it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Control {
    /// Cached bounding rectangle (refreshed on resize/scroll)
    pub rect: Rect,
    /// True while a live target overlaps the control
    pub blocked: bool,
}

impl Control {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            blocked: false,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct BoardState {
    pub tuning: Tuning,
    pub phase: Phase,
    /// Viewport size in CSS pixels
    pub viewport: Vec2,
    /// Live targets in creation order
    pub targets: Vec<Target>,
    /// Live particles
    pub particles: Vec<Particle>,
    /// Cached page controls
    pub controls: Vec<Control>,
    /// Frames of agitation left (0 = calm)
    pub agitation_frames: u32,
    /// Last known pointer position
    pub pointer: Vec2,
    /// Pointer trail, oldest first
    pub trail: Vec<TrailPoint>,
    /// Frames ticked so far
    pub frame: u64,
    next_id: u32,
}

impl BoardState {
    /// Empty locked board; the pointer starts at the viewport center
    pub fn new(tuning: Tuning, viewport: Vec2) -> Self {
        Self {
            tuning,
            phase: Phase::Locked,
            viewport,
            targets: Vec::new(),
            particles: Vec::new(),
            controls: Vec::new(),
            agitation_frames: 0,
            pointer: viewport / 2.0,
            trail: Vec::new(),
            frame: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_unlocked(&self) -> bool {
        self.phase == Phase::Unlocked
    }

    pub fn is_agitated(&self) -> bool {
        self.agitation_frames > 0
    }

    pub fn remaining(&self) -> usize {
        self.targets.len()
    }

    /// Index of the target under `point`, newest first
    pub fn target_at(&self, point: Vec2) -> Option<usize> {
        let margin = self.tuning.hit_margin;
        self.targets.iter().rposition(|t| t.is_hit(point, margin))
    }

    /// Remove a target, burst it into particles and agitate the board
    pub fn destroy_target<R: Rng>(&mut self, index: usize, rng: &mut R) -> Option<Target> {
        if index >= self.targets.len() {
            return None;
        }
        let target = self.targets.remove(index);
        self.spawn_burst(target.center(), rng);
        self.agitation_frames = self.tuning.agitation_frames;
        Some(target)
    }

    /// Spawn one burst of particles at `center`
    pub fn spawn_burst<R: Rng>(&mut self, center: Vec2, rng: &mut R) {
        self.particles.reserve(self.tuning.burst_size);
        for _ in 0..self.tuning.burst_size {
            self.particles.push(Particle::spawn(center, &self.tuning, rng));
        }
    }
}
