//! Data-driven gameplay tuning
//!
//! Every knob the simulation reads lives here so a page can rebalance the
//! board without a rebuild.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay constants consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Side length of a target
    pub target_size: f32,
    /// Base spacing between grid cells
    pub grid_spacing: f32,
    /// Density cap for the board
    pub max_targets: usize,
    /// Hit radius bonus over half the target size
    pub hit_margin: f32,
    /// Agitation duration in frames
    pub agitation_frames: u32,
    /// Jitter amplitude per axis
    pub jitter: f32,
    /// Particles per burst
    pub burst_size: usize,
    pub particle_speed: f32,
    pub particle_min_size: f32,
    pub particle_max_size: f32,
    pub particle_decay: f32,
    pub trail_decay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_size: TARGET_SIZE,
            grid_spacing: GRID_SPACING,
            max_targets: MAX_TARGETS,
            hit_margin: HIT_MARGIN,
            agitation_frames: AGITATION_FRAMES,
            jitter: JITTER,
            burst_size: BURST_SIZE,
            particle_speed: PARTICLE_SPEED,
            particle_min_size: PARTICLE_MIN_SIZE,
            particle_max_size: PARTICLE_MAX_SIZE,
            particle_decay: PARTICLE_DECAY,
            trail_decay: TRAIL_DECAY,
        }
    }
}

impl Tuning {
    /// Replace values the simulation cannot run on with their defaults.
    ///
    /// Sizes, spacing and decay rates must be finite and positive; margins
    /// and jitter must be finite and non-negative.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |value: f32, default: f32| {
            if value.is_finite() && value > 0.0 { value } else { default }
        };
        let non_negative = |value: f32, default: f32| {
            if value.is_finite() && value >= 0.0 { value } else { default }
        };

        Self {
            target_size: positive(self.target_size, defaults.target_size),
            grid_spacing: positive(self.grid_spacing, defaults.grid_spacing),
            hit_margin: non_negative(self.hit_margin, defaults.hit_margin),
            jitter: non_negative(self.jitter, defaults.jitter),
            particle_decay: positive(self.particle_decay, defaults.particle_decay),
            trail_decay: positive(self.trail_decay, defaults.trail_decay),
            ..self
        }
    }
}
