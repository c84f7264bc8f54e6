//! In-memory page for native runs and tests

use glam::Vec2;

use super::{Feedback, Page};
use crate::sim::Rect;

/// Something the overlay did to the page
#[derive(Debug, Clone, PartialEq)]
pub enum PageCall {
    Blocked { control: usize, blocked: bool },
    Activated(usize),
    Remaining(usize),
    Unlocked,
}

/// A page with fixed controls identified by index
#[derive(Debug, Clone, Default)]
pub struct HeadlessPage {
    /// Control rectangles; the element handle is the index
    pub rects: Vec<Rect>,
    /// Current blocked look per control
    pub blocked: Vec<bool>,
    /// Every call, in order
    pub calls: Vec<PageCall>,
}

impl HeadlessPage {
    pub fn new(rects: Vec<Rect>) -> Self {
        let blocked = vec![false; rects.len()];
        Self {
            rects,
            blocked,
            calls: Vec::new(),
        }
    }

    /// Controls clicked so far
    pub fn activated(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PageCall::Activated(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    /// Last remaining count shown
    pub fn last_remaining(&self) -> Option<usize> {
        self.calls.iter().rev().find_map(|c| match c {
            PageCall::Remaining(n) => Some(*n),
            _ => None,
        })
    }

    pub fn is_unlocked(&self) -> bool {
        self.calls.contains(&PageCall::Unlocked)
    }
}

impl Page for HeadlessPage {
    type Element = usize;

    fn controls(&self) -> Vec<(usize, Rect)> {
        self.rects.iter().copied().enumerate().collect()
    }

    fn set_blocked(&mut self, element: &usize, blocked: bool) {
        if let Some(flag) = self.blocked.get_mut(*element) {
            *flag = blocked;
        }
        self.calls.push(PageCall::Blocked {
            control: *element,
            blocked,
        });
    }

    /// Topmost (last) control containing the point
    fn element_below(&mut self, at: Vec2) -> Option<usize> {
        self.rects.iter().rposition(|r| r.contains(at))
    }

    fn activate(&mut self, element: &usize) {
        self.calls.push(PageCall::Activated(*element));
    }

    fn show_remaining(&mut self, remaining: usize) {
        self.calls.push(PageCall::Remaining(remaining));
    }

    fn show_unlocked(&mut self) {
        self.calls.push(PageCall::Unlocked);
    }
}

/// Feedback that only counts cues
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback {
    pub cues: usize,
}

impl Feedback for SilentFeedback {
    fn target_destroyed(&mut self) {
        self.cues += 1;
    }
}
