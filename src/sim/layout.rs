//! Board layout
//!
//! Lays targets out on a centered square grid that covers the viewport.
//! Spacing is `max(grid_spacing, sqrt(area / max_targets))`, so large
//! viewports spread the grid out instead of adding targets.

use glam::Vec2;

use super::rect::Rect;
use super::state::{BoardEvent, BoardState, Target};
use crate::tuning::Tuning;

/// Grid geometry for one viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPlan {
    pub spacing: f32,
    pub columns: u32,
    pub rows: u32,
    /// Top-left corner of the target in cell (0, 0)
    pub offset: Vec2,
}

impl GridPlan {
    /// Plan a grid for `viewport`. None for a degenerate viewport or a zero cap.
    pub fn for_viewport(viewport: Vec2, tuning: &Tuning) -> Option<Self> {
        if !viewport.is_finite() || viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        if tuning.max_targets == 0 {
            return None;
        }

        let area = viewport.x * viewport.y;
        let density_spacing = (area / tuning.max_targets as f32).sqrt();
        let mut spacing = tuning.grid_spacing.max(density_spacing).max(1.0);
        let (mut columns, mut rows) = Self::cells(viewport, spacing);

        // Ceiling rounding can overshoot the cap by a row or column
        while columns as usize * rows as usize > tuning.max_targets {
            spacing += 1.0;
            (columns, rows) = Self::cells(viewport, spacing);
        }

        let grid = Vec2::new(columns as f32, rows as f32) * spacing;
        let offset = (viewport - grid) / 2.0 + Vec2::splat(spacing / 2.0 - tuning.target_size / 2.0);

        Some(Self {
            spacing,
            columns,
            rows,
            offset,
        })
    }

    fn cells(viewport: Vec2, spacing: f32) -> (u32, u32) {
        (
            (viewport.x / spacing).ceil() as u32,
            (viewport.y / spacing).ceil() as u32,
        )
    }

    /// Top-left corner of the target in cell (column, row)
    pub fn cell_origin(&self, column: u32, row: u32) -> Vec2 {
        self.offset + Vec2::new(column as f32, row as f32) * self.spacing
    }
}

/// Replace the whole target set with a fresh grid for `viewport`.
///
/// No-op once unlocked, and for degenerate viewports (the current board is
/// kept). Particles and the agitation timer are left alone.
pub fn build_board(state: &mut BoardState, viewport: Vec2) -> Option<BoardEvent> {
    if state.is_unlocked() {
        return None;
    }
    let Some(plan) = GridPlan::for_viewport(viewport, &state.tuning) else {
        log::warn!("Skipping layout for degenerate viewport {viewport:?}");
        return None;
    };

    state.viewport = viewport;
    state.targets.clear();

    let size = state.tuning.target_size;
    let view = Rect::new(0.0, 0.0, viewport.x, viewport.y);
    for row in 0..plan.rows {
        for column in 0..plan.columns {
            let origin = plan.cell_origin(column, row);
            if !Rect::square(origin, size).intersects(&view) {
                continue;
            }
            let id = state.next_entity_id();
            state.targets.push(Target::new(id, origin, size));
        }
    }

    log::info!(
        "Board built: {}x{} grid, spacing {:.1}, {} targets",
        plan.columns,
        plan.rows,
        plan.spacing,
        state.targets.len()
    );

    Some(BoardEvent::BoardBuilt {
        columns: plan.columns,
        rows: plan.rows,
        targets: state.targets.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Phase;
    use proptest::prelude::*;

    fn fresh(viewport: Vec2) -> BoardState {
        BoardState::new(Tuning::default(), viewport)
    }

    #[test]
    fn test_800x600_grid() {
        let viewport = Vec2::new(800.0, 600.0);
        let plan = GridPlan::for_viewport(viewport, &Tuning::default()).unwrap();
        assert_eq!(plan.spacing, 80.0);
        assert_eq!((plan.columns, plan.rows), (10, 8));
        assert_eq!(plan.offset, Vec2::new(16.0, -4.0));

        let mut state = fresh(viewport);
        let event = build_board(&mut state, viewport);
        assert_eq!(
            event,
            Some(BoardEvent::BoardBuilt {
                columns: 10,
                rows: 8,
                targets: 80
            })
        );
        assert_eq!(state.targets.len(), 80);
        assert_eq!(state.targets[0].anchor, Vec2::new(16.0, -4.0));
        assert_eq!(state.targets[79].anchor, Vec2::new(736.0, 556.0));
    }

    #[test]
    fn test_large_viewport_spreads_spacing() {
        let viewport = Vec2::new(2000.0, 2000.0);
        let plan = GridPlan::for_viewport(viewport, &Tuning::default()).unwrap();
        assert_eq!(plan.spacing, 200.0);
        assert_eq!((plan.columns, plan.rows), (10, 10));
    }

    #[test]
    fn test_cap_enforced_when_ceiling_overshoots() {
        // sqrt(1010*1000/100) = 100.5 -> 11x10 before correction
        let viewport = Vec2::new(1010.0, 1000.0);
        let plan = GridPlan::for_viewport(viewport, &Tuning::default()).unwrap();
        assert!(plan.columns * plan.rows <= 100);

        let mut state = fresh(viewport);
        build_board(&mut state, viewport);
        assert!(state.targets.len() <= 100);
    }

    #[test]
    fn test_rebuild_replaces_targets() {
        let mut state = fresh(Vec2::new(800.0, 600.0));
        build_board(&mut state, Vec2::new(800.0, 600.0));
        let first_ids: Vec<u32> = state.targets.iter().map(|t| t.id).collect();

        build_board(&mut state, Vec2::new(400.0, 300.0));
        assert_eq!(state.viewport, Vec2::new(400.0, 300.0));
        assert!(state.targets.iter().all(|t| !first_ids.contains(&t.id)));
        assert_eq!(state.targets.len(), 5 * 4);
    }

    #[test]
    fn test_unlocked_board_never_rebuilds() {
        let mut state = fresh(Vec2::new(800.0, 600.0));
        state.phase = Phase::Unlocked;
        assert_eq!(build_board(&mut state, Vec2::new(800.0, 600.0)), None);
        assert!(state.targets.is_empty());
    }

    #[test]
    fn test_degenerate_viewport_keeps_board() {
        let mut state = fresh(Vec2::new(800.0, 600.0));
        build_board(&mut state, Vec2::new(800.0, 600.0));
        assert_eq!(build_board(&mut state, Vec2::new(0.0, 600.0)), None);
        assert_eq!(build_board(&mut state, Vec2::new(f32::NAN, 600.0)), None);
        assert_eq!(state.targets.len(), 80);
        assert_eq!(state.viewport, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_zero_cap_plans_nothing() {
        let tuning = Tuning {
            max_targets: 0,
            ..Tuning::default()
        };
        assert!(GridPlan::for_viewport(Vec2::new(800.0, 600.0), &tuning).is_none());
    }

    proptest! {
        #[test]
        fn prop_board_respects_cap_and_viewport(
            width in 1.0f32..4000.0,
            height in 1.0f32..4000.0,
            max_targets in 1usize..200,
        ) {
            let tuning = Tuning { max_targets, ..Tuning::default() };
            let viewport = Vec2::new(width, height);
            let mut state = BoardState::new(tuning, viewport);
            build_board(&mut state, viewport);

            let view = Rect::new(0.0, 0.0, width, height);
            prop_assert!(state.targets.len() <= max_targets);
            prop_assert!(!state.targets.is_empty());
            for target in &state.targets {
                prop_assert!(target.rect().intersects(&view));
                prop_assert_eq!(target.pos, target.anchor);
            }
        }
    }
}
