//! Target Lock - a canvas overlay that guards page controls
//!
//! A grid of faces covers the page. Every control underneath a live face is
//! locked until the player clicks every face away.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout, entities, gating, input, tick)
//! - `renderer`: Drawing surface abstraction and the per-frame draw pass
//! - `platform`: Page collaborators (DOM on wasm, headless elsewhere)
//! - `game`: Session driver wiring the simulation to its collaborators
//! - `tuning`: Data-driven gameplay constants

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, StopHandle};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Gameplay defaults (overridable through [`Tuning`])
pub mod consts {
    /// Side length of a target face in CSS pixels
    pub const TARGET_SIZE: f32 = 48.0;
    /// Minimum distance between grid cells
    pub const GRID_SPACING: f32 = 80.0;
    /// Density cap: the board never holds more targets than this
    pub const MAX_TARGETS: usize = 100;
    /// Extra radius around a face that still counts as a hit
    pub const HIT_MARGIN: f32 = 5.0;

    /// Frames the board stays agitated after a hit
    pub const AGITATION_FRAMES: u32 = 40;
    /// Max jitter offset per axis while agitated
    pub const JITTER: f32 = 3.0;

    /// Particles spawned per destroyed target
    pub const BURST_SIZE: usize = 20;
    /// Full span of the per-axis particle velocity (centered on zero)
    pub const PARTICLE_SPEED: f32 = 15.0;
    pub const PARTICLE_MIN_SIZE: f32 = 4.0;
    pub const PARTICLE_MAX_SIZE: f32 = 10.0;
    /// Life lost per frame (life starts at 1.0)
    pub const PARTICLE_DECAY: f32 = 0.05;

    /// Life lost per frame by a pointer trail point
    pub const TRAIL_DECAY: f32 = 0.1;
}

/// Angle (radians) of the ray from `from` toward `to`
#[inline]
pub fn angle_toward(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
