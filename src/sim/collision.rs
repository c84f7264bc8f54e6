//! Hit testing and the control gate
//!
//! The gate is a plain O(controls x targets) sweep. Both sides are small
//! (the density cap bounds targets, pages carry a handful of controls), so
//! there is no spatial index.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Control, Target};

/// True if `point` lies strictly inside the circle at `center` with `radius`
#[inline]
pub fn point_within(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// True if any target's rectangle overlaps `rect` (stops at the first match)
pub fn rect_covered(rect: &Rect, targets: &[Target]) -> bool {
    targets.iter().any(|t| t.rect().intersects(rect))
}

/// Recompute every control's blocked flag against the live targets.
///
/// Returns the indices whose flag flipped, in control order.
pub fn gate_controls(controls: &mut [Control], targets: &[Target]) -> Vec<usize> {
    let mut flipped = Vec::new();
    for (index, control) in controls.iter_mut().enumerate() {
        let blocked = rect_covered(&control.rect, targets);
        if blocked != control.blocked {
            control.blocked = blocked;
            flipped.push(index);
        }
    }
    flipped
}

/// Clear every blocked flag. Returns the indices that were blocked.
pub fn release_controls(controls: &mut [Control]) -> Vec<usize> {
    let mut flipped = Vec::new();
    for (index, control) in controls.iter_mut().enumerate() {
        if control.blocked {
            control.blocked = false;
            flipped.push(index);
        }
    }
    flipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_at(x: f32, y: f32) -> Target {
        Target::new(0, Vec2::new(x, y), 48.0)
    }

    #[test]
    fn test_point_within_is_strict() {
        assert!(point_within(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.01));
        assert!(!point_within(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.0));
    }

    #[test]
    fn test_gate_blocks_only_overlapped_controls() {
        let mut controls = vec![
            // Fully under the first target
            Control::new(Rect::new(110.0, 110.0, 20.0, 10.0)),
            // Far away from everything
            Control::new(Rect::new(500.0, 500.0, 80.0, 30.0)),
            // Straddles the second target's edge
            Control::new(Rect::new(290.0, 100.0, 40.0, 20.0)),
        ];
        let targets = vec![target_at(100.0, 100.0), target_at(300.0, 90.0)];

        let flipped = gate_controls(&mut controls, &targets);
        assert_eq!(flipped, vec![0, 2]);
        assert!(controls[0].blocked);
        assert!(!controls[1].blocked);
        assert!(controls[2].blocked);

        // Stable across frames: nothing flips again
        assert!(gate_controls(&mut controls, &targets).is_empty());
        assert!(controls[0].blocked && controls[2].blocked);
    }

    #[test]
    fn test_gate_unblocks_when_target_leaves() {
        let mut controls = vec![Control::new(Rect::new(110.0, 110.0, 20.0, 10.0))];
        let mut targets = vec![target_at(100.0, 100.0)];
        gate_controls(&mut controls, &targets);
        assert!(controls[0].blocked);

        targets.clear();
        assert_eq!(gate_controls(&mut controls, &targets), vec![0]);
        assert!(!controls[0].blocked);
    }

    #[test]
    fn test_edge_contact_does_not_block() {
        let mut controls = vec![Control::new(Rect::new(148.0, 100.0, 20.0, 20.0))];
        gate_controls(&mut controls, &[target_at(100.0, 100.0)]);
        assert!(!controls[0].blocked);
    }

    #[test]
    fn test_release_controls() {
        let mut controls = vec![
            Control {
                rect: Rect::default(),
                blocked: true,
            },
            Control::default(),
        ];
        assert_eq!(release_controls(&mut controls), vec![0]);
        assert!(controls.iter().all(|c| !c.blocked));
    }
}
