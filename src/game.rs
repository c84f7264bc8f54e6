//! Game session
//!
//! Owns the board, the RNG and the page collaborators. Platform callbacks
//! (frame, pointer, resize, scroll) all funnel through here. Everything runs
//! on one thread, one callback at a time.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::platform::{Feedback, Page};
use crate::renderer::{Surface, draw_frame};
use crate::sim::{
    BoardEvent, BoardState, Control, PointerEvent, PointerOutcome, build_board, check_unlock,
    route_pointer, tick,
};
use crate::tuning::Tuning;

/// Shared stop flag for the frame loop.
///
/// Lives outside the game so it can be raised while the game is borrowed,
/// e.g. by page script running inside a forwarded click.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Game instance holding all state
pub struct Game<P: Page, F: Feedback> {
    pub state: BoardState,
    page: P,
    feedback: F,
    rng: Pcg32,
    /// Page handles, parallel to `state.controls`
    elements: Vec<P::Element>,
    /// Count currently on the status line
    shown_remaining: Option<usize>,
    stop: StopHandle,
}

impl<P: Page, F: Feedback> Game<P, F> {
    /// Build the first board for `viewport` and pick up the page controls
    pub fn new(tuning: Tuning, viewport: Vec2, page: P, feedback: F, seed: u64) -> Self {
        let mut game = Self {
            state: BoardState::new(tuning, viewport),
            page,
            feedback,
            rng: Pcg32::seed_from_u64(seed),
            elements: Vec::new(),
            shown_remaining: None,
            stop: StopHandle::default(),
        };
        game.resize(viewport);
        game
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    /// Handle that stops this game without borrowing it
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Stop the frame loop; the platform stops rescheduling frames
    pub fn stop(&mut self) {
        if self.is_running() {
            log::info!("Overlay stopped at frame {}", self.state.frame);
        }
        self.stop.stop();
    }

    /// Viewport changed: rebuild the board (while locked) and re-read controls
    pub fn resize(&mut self, viewport: Vec2) {
        let built = build_board(&mut self.state, viewport);
        self.refresh_controls();
        self.apply(built.into_iter().collect());
        self.sync_status();
    }

    /// Re-read control rectangles. Known controls keep their blocked flag.
    pub fn refresh_controls(&mut self) {
        let fresh = self.page.controls();
        let mut elements = Vec::with_capacity(fresh.len());
        let mut controls = Vec::with_capacity(fresh.len());

        for (element, rect) in fresh {
            let blocked = self.blocked_flag(&element);
            elements.push(element);
            controls.push(Control { rect, blocked });
        }

        self.elements = elements;
        self.state.controls = controls;
    }

    /// Handle one pointer event. Returns true if the page default must be cancelled.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let prevent = event.prevents_default(self.state.is_unlocked());
        let outcome = route_pointer(&mut self.state, event, &mut self.rng);

        match outcome {
            PointerOutcome::Destroyed { center, remaining } => {
                log::debug!("Target destroyed at {center:?}, {remaining} left");
                self.feedback.target_destroyed();
            }
            PointerOutcome::Missed { at } => self.click_through(at),
            PointerOutcome::Moved | PointerOutcome::Ignored => {}
        }

        if outcome.is_activation() {
            let events = check_unlock(&mut self.state);
            self.apply(events);
            self.sync_status();
        }
        prevent
    }

    /// Advance one display frame and draw it
    pub fn frame(&mut self, surface: &mut dyn Surface) {
        let events = tick(&mut self.state, &mut self.rng);
        self.apply(events);
        draw_frame(&self.state, surface);
    }

    /// Forward an activation that missed every target to the control below
    fn click_through(&mut self, at: Vec2) {
        let Some(element) = self.page.element_below(at) else {
            log::debug!("Nothing clickable at {at:?}");
            return;
        };
        if self.blocked_flag(&element) {
            log::debug!("Click at {at:?} absorbed by a covered control");
            return;
        }
        log::debug!("Forwarding click at {at:?}");
        self.page.activate(&element);
    }

    /// Blocked flag for a known control; untracked elements are never blocked
    fn blocked_flag(&self, element: &P::Element) -> bool {
        self.elements
            .iter()
            .position(|e| e == element)
            .and_then(|i| self.state.controls.get(i))
            .is_some_and(|c| c.blocked)
    }

    fn apply(&mut self, events: Vec<BoardEvent>) {
        for event in events {
            match event {
                BoardEvent::ControlBlocked { index, blocked } => {
                    if let Some(element) = self.elements.get(index) {
                        self.page.set_blocked(element, blocked);
                    }
                }
                BoardEvent::Unlocked => self.page.show_unlocked(),
                BoardEvent::BoardBuilt { .. } => {}
            }
        }
    }

    /// Push the remaining count to the page when it changed
    fn sync_status(&mut self) {
        if self.state.is_unlocked() {
            return;
        }
        let remaining = self.state.remaining();
        if self.shown_remaining != Some(remaining) {
            self.page.show_remaining(remaining);
            self.shown_remaining = Some(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessPage, PageCall, SilentFeedback};
    use crate::renderer::RecordingSurface;
    use crate::sim::{Phase, PointerKind, Rect, Target};

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn game_with(rects: Vec<Rect>) -> Game<HeadlessPage, SilentFeedback> {
        Game::new(
            Tuning::default(),
            VIEWPORT,
            HeadlessPage::new(rects),
            SilentFeedback::default(),
            42,
        )
    }

    fn click(game: &mut Game<HeadlessPage, SilentFeedback>, at: Vec2) -> bool {
        game.handle_pointer(&PointerEvent::mouse(PointerKind::MouseDown, at.x, at.y))
    }

    /// Leave a single target on the board at `anchor`
    fn single_target(game: &mut Game<HeadlessPage, SilentFeedback>, anchor: Vec2) {
        let id = game.state.next_entity_id();
        game.state.targets = vec![Target::new(id, anchor, 48.0)];
    }

    #[test]
    fn test_new_game_builds_board_and_shows_count() {
        let game = game_with(Vec::new());
        assert_eq!(game.state.targets.len(), 80);
        assert_eq!(game.page().last_remaining(), Some(80));
        assert!(game.is_running());
    }

    #[test]
    fn test_last_target_unlocks_board() {
        let mut game = game_with(Vec::new());
        single_target(&mut game, Vec2::new(100.0, 100.0));

        click(&mut game, Vec2::new(124.0, 124.0));

        assert!(game.state.targets.is_empty());
        assert_eq!(game.state.particles.len(), 20);
        assert!(game.state.particles.iter().all(|p| p.pos == Vec2::new(124.0, 124.0)));
        assert_eq!(game.state.phase, Phase::Unlocked);
        assert!(game.page().is_unlocked());
        assert_eq!(game.feedback().cues, 1);

        // Nothing left to hit; the transition never repeats
        click(&mut game, Vec2::new(124.0, 124.0));
        let unlocks = game
            .page()
            .calls
            .iter()
            .filter(|c| **c == PageCall::Unlocked)
            .count();
        assert_eq!(unlocks, 1);
    }

    #[test]
    fn test_covered_control_absorbs_click() {
        // Control sits in the top-left corner of the face, outside the hit radius
        let mut game = game_with(vec![Rect::new(100.0, 100.0, 10.0, 10.0)]);
        single_target(&mut game, Vec2::new(100.0, 100.0));
        let mut surface = RecordingSurface::new(VIEWPORT);
        game.frame(&mut surface);

        assert!(game.state.controls[0].blocked);
        assert_eq!(game.page().blocked, vec![true]);

        click(&mut game, Vec2::new(102.0, 102.0));
        assert!(game.page().activated().is_empty());
        assert_eq!(game.state.targets.len(), 1);
        assert_eq!(game.feedback().cues, 0);
    }

    #[test]
    fn test_uncovered_control_receives_click() {
        let mut game = game_with(vec![Rect::new(600.0, 500.0, 80.0, 30.0)]);
        single_target(&mut game, Vec2::new(100.0, 100.0));
        let mut surface = RecordingSurface::new(VIEWPORT);
        game.frame(&mut surface);
        assert!(!game.state.controls[0].blocked);

        click(&mut game, Vec2::new(610.0, 510.0));
        assert_eq!(game.page().activated(), vec![0]);
        assert_eq!(game.state.phase, Phase::Locked);
    }

    #[test]
    fn test_unlock_releases_blocked_controls() {
        let mut game = game_with(vec![Rect::new(100.0, 100.0, 10.0, 10.0)]);
        single_target(&mut game, Vec2::new(100.0, 100.0));
        let mut surface = RecordingSurface::new(VIEWPORT);
        game.frame(&mut surface);
        assert_eq!(game.page().blocked, vec![true]);

        click(&mut game, Vec2::new(124.0, 124.0));
        assert_eq!(game.page().blocked, vec![false]);

        // Synthetic targets after unlock never re-block
        single_target(&mut game, Vec2::new(100.0, 100.0));
        for _ in 0..3 {
            game.frame(&mut surface);
        }
        assert!(!game.state.controls[0].blocked);
        assert_eq!(game.page().blocked, vec![false]);

        // The page owns clicks from here on; nothing is forwarded or absorbed
        click(&mut game, Vec2::new(102.0, 102.0));
        assert!(game.page().activated().is_empty());
        assert_eq!(game.state.targets.len(), 1);
    }

    #[test]
    fn test_status_tracks_hits() {
        let mut game = game_with(Vec::new());
        let center = game.state.targets[0].center();
        click(&mut game, center);
        assert_eq!(game.page().last_remaining(), Some(79));

        // A miss does not re-render an unchanged count
        let before = game.page().calls.len();
        click(&mut game, Vec2::new(-50.0, -50.0));
        assert_eq!(game.page().calls.len(), before);
    }

    #[test]
    fn test_clearing_full_board() {
        let mut game = game_with(vec![Rect::new(380.0, 280.0, 40.0, 40.0)]);
        let mut surface = RecordingSurface::new(VIEWPORT);
        let anchors: Vec<Vec2> = game
            .state
            .targets
            .iter()
            .map(|t| t.anchor + Vec2::splat(24.0))
            .collect();

        for at in anchors {
            game.frame(&mut surface);
            assert_eq!(game.state.phase, Phase::Locked);
            click(&mut game, at);
        }

        assert_eq!(game.state.phase, Phase::Unlocked);
        assert_eq!(game.feedback().cues, 80);
        assert_eq!(game.page().blocked, vec![false]);
        assert!(game.page().is_unlocked());
    }

    #[test]
    fn test_resize_rebuilds_only_while_locked() {
        let mut game = game_with(Vec::new());
        game.resize(Vec2::new(400.0, 300.0));
        assert_eq!(game.state.targets.len(), 20);
        assert_eq!(game.page().last_remaining(), Some(20));

        game.state.targets.clear();
        click(&mut game, Vec2::new(5.0, 5.0));
        assert_eq!(game.state.phase, Phase::Unlocked);

        game.resize(Vec2::new(800.0, 600.0));
        assert!(game.state.targets.is_empty());
    }

    #[test]
    fn test_refresh_keeps_blocked_flags() {
        let mut game = game_with(vec![Rect::new(100.0, 100.0, 10.0, 10.0)]);
        single_target(&mut game, Vec2::new(100.0, 100.0));
        let mut surface = RecordingSurface::new(VIEWPORT);
        game.frame(&mut surface);

        game.refresh_controls();
        assert!(game.state.controls[0].blocked);
    }

    #[test]
    fn test_touch_prevent_default_policy() {
        let mut game = game_with(Vec::new());
        let touch_move = PointerEvent::touch(PointerKind::TouchMove, Some(Vec2::new(1.0, 1.0)), None);
        assert!(game.handle_pointer(&touch_move));
        assert_eq!(game.state.pointer, Vec2::new(1.0, 1.0));

        game.state.phase = Phase::Unlocked;
        assert!(!game.handle_pointer(&touch_move));
    }

    #[test]
    fn test_stop() {
        let mut game = game_with(Vec::new());
        game.stop();
        assert!(!game.is_running());
        game.stop();
        assert!(!game.is_running());
    }

    #[test]
    fn test_stop_handle_works_while_game_is_borrowed() {
        use std::cell::RefCell;

        let game = Rc::new(RefCell::new(game_with(Vec::new())));
        let handle = game.borrow().stop_handle();
        {
            // A callback is mid-flight holding the game
            let mut busy = game.borrow_mut();
            assert!(game.try_borrow_mut().is_err());
            handle.stop();
            assert!(!busy.is_running());
            let center = busy.state.targets[0].center();
            click(&mut busy, center);
        }
        assert!(!game.borrow().is_running());
        assert!(handle.is_stopped());
    }
}
