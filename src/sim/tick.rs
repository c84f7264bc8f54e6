//! Per-frame simulation tick and the lock state machine
//!
//! One tick per display frame. The caller paces it with the display's frame
//! callback, so everything here counts frames, not seconds.

use rand::Rng;

use super::collision::{gate_controls, release_controls};
use super::state::{BoardEvent, BoardState, Phase, TrailPoint};

/// Advance the board by one frame
pub fn tick<R: Rng>(state: &mut BoardState, rng: &mut R) -> Vec<BoardEvent> {
    let mut events = Vec::new();
    state.frame += 1;

    state.agitation_frames = state.agitation_frames.saturating_sub(1);

    if !state.is_unlocked() {
        for index in gate_controls(&mut state.controls, &state.targets) {
            events.push(BoardEvent::ControlBlocked {
                index,
                blocked: state.controls[index].blocked,
            });
        }
    }

    let agitated = state.is_agitated();
    let jitter = state.tuning.jitter;
    for target in &mut state.targets {
        target.update(agitated, jitter, rng);
    }

    let decay = state.tuning.particle_decay;
    state.particles.retain_mut(|particle| {
        particle.update(decay);
        particle.is_alive()
    });

    advance_trail(state);

    events
}

/// Age the pointer trail, drop spent points and append the current pointer
pub fn advance_trail(state: &mut BoardState) {
    let decay = state.tuning.trail_decay;
    state.trail.retain_mut(|point| {
        point.life -= decay;
        point.life > 0.0
    });
    state.trail.push(TrailPoint {
        pos: state.pointer,
        life: 1.0,
    });
}

/// Fire the Locked -> Unlocked transition if the board is clear.
///
/// Fires at most once per session; every blocked control is released.
pub fn check_unlock(state: &mut BoardState) -> Vec<BoardEvent> {
    if state.is_unlocked() || !state.targets.is_empty() {
        return Vec::new();
    }

    state.phase = Phase::Unlocked;
    log::info!("Board cleared after {} frames, controls unlocked", state.frame);

    let mut events: Vec<BoardEvent> = release_controls(&mut state.controls)
        .into_iter()
        .map(|index| BoardEvent::ControlBlocked {
            index,
            blocked: false,
        })
        .collect();
    events.push(BoardEvent::Unlocked);
    events
}
