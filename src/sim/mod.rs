//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - Frame-counted timers only
//! - Injected RNG only
//! - Stable iteration order (creation order)
//! - No rendering or DOM dependencies

pub mod collision;
pub mod input;
pub mod layout;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{gate_controls, point_within, rect_covered, release_controls};
pub use input::{PointerEvent, PointerKind, PointerOutcome, route_pointer};
pub use layout::{GridPlan, build_board};
pub use rect::Rect;
pub use state::{
    BoardEvent, BoardState, Control, PARTICLE_PALETTE, Particle, Phase, Target, TrailPoint,
};
pub use tick::{advance_trail, check_unlock, tick};
