//! Pointer input routing
//!
//! Mouse and touch events are reduced to one position plus an activation
//! flag. An activation first tries to destroy a target; only when nothing is
//! hit does the page get a chance to click the control underneath.

use glam::Vec2;
use rand::Rng;

use super::state::BoardState;

/// Source of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    MouseMove,
    MouseDown,
    TouchStart,
    TouchMove,
    /// Touch release. Acts as the click for touch input.
    TouchEnd,
}

impl PointerKind {
    /// Press for mouse, release for touch
    pub fn is_activation(self) -> bool {
        matches!(self, PointerKind::MouseDown | PointerKind::TouchEnd)
    }
}

/// A platform pointer event, flattened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Mouse client position (unused for touch)
    pub client: Vec2,
    /// First entry of the active touch list
    pub touch: Option<Vec2>,
    /// First entry of the changed touch list
    pub changed_touch: Option<Vec2>,
}

impl PointerEvent {
    pub fn mouse(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            client: Vec2::new(x, y),
            touch: None,
            changed_touch: None,
        }
    }

    pub fn touch(kind: PointerKind, touch: Option<Vec2>, changed_touch: Option<Vec2>) -> Self {
        Self {
            kind,
            client: Vec2::ZERO,
            touch,
            changed_touch,
        }
    }

    /// Position of the event.
    ///
    /// A touch release reads the changed list because the active list is
    /// already empty. None when the relevant touch list is empty.
    pub fn position(&self) -> Option<Vec2> {
        match self.kind {
            PointerKind::MouseMove | PointerKind::MouseDown => Some(self.client),
            PointerKind::TouchStart | PointerKind::TouchMove => self.touch,
            PointerKind::TouchEnd => self.changed_touch,
        }
    }

    /// Whether the page's default action must be cancelled.
    ///
    /// While locked, touch moves must not scroll or zoom the page and touch
    /// releases must not turn into ghost mouse clicks.
    pub fn prevents_default(&self, unlocked: bool) -> bool {
        !unlocked && matches!(self.kind, PointerKind::TouchMove | PointerKind::TouchEnd)
    }
}

/// What an event did to the board
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// No usable position
    Ignored,
    /// Pointer moved (or activation after unlock)
    Moved,
    /// An activation destroyed a target
    Destroyed { center: Vec2, remaining: usize },
    /// An activation hit no target; the page may click the control at `at`
    Missed { at: Vec2 },
}

impl PointerOutcome {
    pub fn is_activation(&self) -> bool {
        matches!(
            self,
            PointerOutcome::Destroyed { .. } | PointerOutcome::Missed { .. }
        )
    }
}

/// Route one pointer event into the board.
///
/// The pointer always moves first. An activation on a locked board destroys
/// at most one target, newest first.
pub fn route_pointer<R: Rng>(
    state: &mut BoardState,
    event: &PointerEvent,
    rng: &mut R,
) -> PointerOutcome {
    let Some(at) = event.position().filter(|p| p.is_finite()) else {
        return PointerOutcome::Ignored;
    };
    state.pointer = at;

    if !event.kind.is_activation() || state.is_unlocked() {
        return PointerOutcome::Moved;
    }

    let hit = state
        .target_at(at)
        .and_then(|index| state.destroy_target(index, rng));
    match hit {
        Some(target) => PointerOutcome::Destroyed {
            center: target.center(),
            remaining: state.remaining(),
        },
        None => PointerOutcome::Missed { at },
    }
}
