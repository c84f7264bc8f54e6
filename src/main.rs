//! Target Lock entry point
//!
//! Handles platform-specific initialization. On wasm the overlay boots on the
//! host page; natively a headless session clears a board and reports.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    if let Err(e) = target_lock::platform::web::start() {
        log::error!("Overlay failed to start: {e:?}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use target_lock::platform::{HeadlessPage, SilentFeedback};
    use target_lock::renderer::RecordingSurface;
    use target_lock::sim::{PointerEvent, PointerKind, Rect};
    use target_lock::{Game, Settings};

    env_logger::init();
    log::info!("Target Lock (native) starting...");

    let settings = Settings::load();
    let viewport = Vec2::new(1280.0, 720.0);
    let page = HeadlessPage::new(vec![
        Rect::new(560.0, 320.0, 160.0, 48.0),
        Rect::new(40.0, 640.0, 120.0, 40.0),
    ]);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut game = Game::new(
        settings.tuning,
        viewport,
        page,
        SilentFeedback::default(),
        seed,
    );
    let mut surface = RecordingSurface::new(viewport);

    // One click on a control before any face is gone; a covered control swallows it
    game.frame(&mut surface);
    let blocked_click = PointerEvent::mouse(PointerKind::MouseDown, 562.0, 322.0);
    game.handle_pointer(&blocked_click);

    // Clear the board one face per frame, newest first
    while let Some(center) = game.state.targets.last().map(|t| t.anchor + t.size / 2.0) {
        surface.reset();
        game.frame(&mut surface);
        game.handle_pointer(&PointerEvent::mouse(PointerKind::MouseDown, center.x, center.y));
    }

    // Let the last burst play out
    while !game.state.particles.is_empty() {
        surface.reset();
        game.frame(&mut surface);
    }

    let page = game.page();
    println!(
        "Cleared in {} frames: {} hits, {} controls clicked through, unlocked: {}",
        game.state.frame,
        game.feedback().cues,
        page.activated().len(),
        page.is_unlocked(),
    );
}
