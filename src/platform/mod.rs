//! Platform abstraction layer
//!
//! The simulation talks to the page only through these traits:
//! - [`Page`]: guarded controls, peek-through lookup, status surfaces
//! - [`Feedback`]: fire-and-forget hit cue
//!
//! `web` wires them to the DOM on wasm; `headless` keeps them in memory for
//! native runs and tests.

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::{HeadlessPage, PageCall, SilentFeedback};

use glam::Vec2;

use crate::sim::Rect;

/// The page the overlay sits on
pub trait Page {
    /// Handle to a clickable page element
    type Element: Clone + PartialEq;

    /// Every guarded control with its current bounding rectangle
    fn controls(&self) -> Vec<(Self::Element, Rect)>;

    /// Show or clear the blocked look on a control
    fn set_blocked(&mut self, element: &Self::Element, blocked: bool);

    /// Nearest clickable element under `at`, looking through the overlay
    fn element_below(&mut self, at: Vec2) -> Option<Self::Element>;

    /// Run the element's default click action
    fn activate(&mut self, element: &Self::Element);

    /// Render the remaining-target count
    fn show_remaining(&mut self, remaining: usize);

    /// Hide the status text, reveal the win banner, restore the system cursor
    fn show_unlocked(&mut self);
}

/// Player feedback for a successful hit. Must never fail.
pub trait Feedback {
    fn target_destroyed(&mut self);
}

/// Status line for a locked board
pub fn remaining_text(remaining: usize) -> String {
    format!("TARGETS LEFT: {remaining}")
}
