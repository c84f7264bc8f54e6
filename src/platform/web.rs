//! Browser platform: DOM page, listeners and the frame loop

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, HtmlCanvasElement, HtmlElement, MouseEvent,
    TouchEvent, TouchList, Window,
};

use super::{Page, remaining_text};
use crate::audio::AudioManager;
use crate::game::{Game, StopHandle};
use crate::renderer::CanvasSurface;
use crate::settings::Settings;
use crate::sim::{PointerEvent, PointerKind, Rect};

/// Delay before re-reading control rectangles after a rebuild (ms)
const LATE_REFRESH_MS: i32 = 100;

/// Clickable ancestors, nearest kind first
const CLICKABLE: [&str; 2] = ["a", "button"];

/// The host document as a [`Page`]
pub struct DomPage {
    document: Document,
    canvas: HtmlCanvasElement,
    status: Option<Element>,
    banner: Option<Element>,
    control_selector: String,
    blocked_class: String,
    hidden_class: String,
}

impl DomPage {
    pub fn new(document: Document, canvas: HtmlCanvasElement, settings: &Settings) -> Self {
        let status = document.get_element_by_id(&settings.status_id);
        if status.is_none() {
            log::warn!("Status element #{} not found", settings.status_id);
        }
        let banner = document.get_element_by_id(&settings.banner_id);
        if banner.is_none() {
            log::warn!("Banner element #{} not found", settings.banner_id);
        }

        let _ = canvas.style().set_property("cursor", "none");

        Self {
            document,
            canvas,
            status,
            banner,
            control_selector: settings.control_selector.clone(),
            blocked_class: settings.blocked_class.clone(),
            hidden_class: settings.hidden_class.clone(),
        }
    }

    fn set_canvas_visible(&self, visible: bool) {
        let value = if visible { "visible" } else { "hidden" };
        let _ = self.canvas.style().set_property("visibility", value);
    }
}

impl Page for DomPage {
    type Element = Element;

    fn controls(&self) -> Vec<(Element, Rect)> {
        let Ok(nodes) = self.document.query_selector_all(&self.control_selector) else {
            log::warn!("Bad control selector {:?}", self.control_selector);
            return Vec::new();
        };

        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| {
                let r = el.get_bounding_client_rect();
                let rect = Rect::from_edges(
                    r.left() as f32,
                    r.top() as f32,
                    r.right() as f32,
                    r.bottom() as f32,
                );
                (el, rect)
            })
            .collect()
    }

    fn set_blocked(&mut self, element: &Element, blocked: bool) {
        let classes = element.class_list();
        let _ = if blocked {
            classes.add_1(&self.blocked_class)
        } else {
            classes.remove_1(&self.blocked_class)
        };
    }

    fn element_below(&mut self, at: Vec2) -> Option<Element> {
        self.set_canvas_visible(false);
        let hit = self.document.element_from_point(at.x, at.y);
        self.set_canvas_visible(true);

        let hit = hit?;
        CLICKABLE
            .iter()
            .find_map(|selector| hit.closest(selector).ok().flatten())
    }

    fn activate(&mut self, element: &Element) {
        if let Some(el) = element.dyn_ref::<HtmlElement>() {
            el.click();
        }
    }

    fn show_remaining(&mut self, remaining: usize) {
        if let Some(status) = &self.status {
            status.set_text_content(Some(&remaining_text(remaining)));
        }
    }

    fn show_unlocked(&mut self) {
        if let Some(status) = self.status.as_ref().and_then(|s| s.dyn_ref::<HtmlElement>()) {
            let _ = status.style().set_property("display", "none");
        }
        if let Some(banner) = &self.banner {
            let _ = banner.class_list().remove_1(&self.hidden_class);
        }
        let style = self.canvas.style();
        let _ = style.set_property("cursor", "auto");
        let _ = style.set_property("pointer-events", "none");
    }
}

/// Everything the browser callbacks share
struct Runtime {
    game: Game<DomPage, AudioManager>,
    surface: CanvasSurface,
}

thread_local! {
    static STOP: RefCell<Option<StopHandle>> = const { RefCell::new(None) };
}

fn viewport(window: &Window) -> Vec2 {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Vec2::new(w as f32, h as f32)
}

fn first_touch(list: &TouchList) -> Option<Vec2> {
    list.get(0)
        .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
}

fn touch_event(kind: PointerKind, event: &TouchEvent) -> PointerEvent {
    PointerEvent::touch(
        kind,
        first_touch(&event.touches()),
        first_touch(&event.changed_touches()),
    )
}

fn mouse_event(kind: PointerKind, event: &MouseEvent) -> PointerEvent {
    PointerEvent::mouse(kind, event.client_x() as f32, event.client_y() as f32)
}

/// Boot the overlay on the current page
pub fn start() -> Result<(), JsValue> {
    let settings = Settings::load();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(&settings.canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no #{} canvas", settings.canvas_id)))?
        .dyn_into()?;

    let size = viewport(&window);
    let surface = CanvasSurface::new(
        canvas.clone(),
        &settings.face_src,
        &settings.alarmed_face_src,
    )?;
    surface.resize(size.x as u32, size.y as u32);

    let page = DomPage::new(document.clone(), canvas.clone(), &settings);
    let feedback = AudioManager::new(settings.effective_volume());
    let seed = js_sys::Date::now() as u64;
    let game = Game::new(settings.tuning.clone(), size, page, feedback, seed);

    log::info!("Overlay starting with seed {seed}");

    let handle = game.stop_handle();
    STOP.with(|slot| *slot.borrow_mut() = Some(handle));
    let runtime = Rc::new(RefCell::new(Runtime { game, surface }));

    setup_viewport_handlers(&window, runtime.clone());
    setup_pointer_handlers(&window, runtime.clone())?;
    schedule_late_refresh(&window, runtime.clone());
    request_animation_frame(runtime);

    Ok(())
}

/// End the frame loop (page teardown). Safe to call from page script
/// running inside an overlay callback.
#[wasm_bindgen]
pub fn stop() {
    STOP.with(|slot| match slot.borrow().as_ref() {
        Some(handle) => {
            if !handle.is_stopped() {
                log::info!("Overlay stop requested");
            }
            handle.stop();
        }
        None => log::warn!("stop() called before the overlay started"),
    });
}

fn schedule_late_refresh(window: &Window, runtime: Rc<RefCell<Runtime>>) {
    let callback = Closure::once_into_js(move || {
        if let Ok(mut rt) = runtime.try_borrow_mut() {
            rt.game.refresh_controls();
        }
    });
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        LATE_REFRESH_MS,
    );
}

fn setup_viewport_handlers(window: &Window, runtime: Rc<RefCell<Runtime>>) {
    // Resize: new backing store, new board, fresh control rects
    {
        let runtime = runtime.clone();
        let win = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let size = viewport(&win);
            {
                let mut rt = runtime.borrow_mut();
                rt.surface.resize(size.x as u32, size.y as u32);
                rt.game.resize(size);
            }
            schedule_late_refresh(&win, runtime.clone());
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Scroll moves controls under the fixed overlay
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            runtime.borrow_mut().game.refresh_controls();
        });
        let _ = window.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn setup_pointer_handlers(window: &Window, runtime: Rc<RefCell<Runtime>>) -> Result<(), JsValue> {
    for (name, kind) in [
        ("mousemove", PointerKind::MouseMove),
        ("mousedown", PointerKind::MouseDown),
    ] {
        let runtime = runtime.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let pointer = mouse_event(kind, &event);
            runtime.borrow_mut().game.handle_pointer(&pointer);
        });
        window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Touch start never cancels anything; keep it passive
    {
        let runtime = runtime.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            let pointer = touch_event(PointerKind::TouchStart, &event);
            runtime.borrow_mut().game.handle_pointer(&pointer);
        });
        window.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Move and release cancel scrolling and ghost clicks, so they cannot be passive
    let options = AddEventListenerOptions::new();
    options.set_passive(false);

    for (name, kind) in [
        ("touchmove", PointerKind::TouchMove),
        ("touchend", PointerKind::TouchEnd),
    ] {
        let runtime = runtime.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            let pointer = touch_event(kind, &event);
            let prevent = runtime.borrow_mut().game.handle_pointer(&pointer);
            if prevent {
                event.prevent_default();
            }
        });
        window.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        closure.forget();
    }

    Ok(())
}

fn request_animation_frame(runtime: Rc<RefCell<Runtime>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |_time: f64| {
        game_loop(runtime);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(runtime: Rc<RefCell<Runtime>>) {
    {
        let mut rt = runtime.borrow_mut();
        if !rt.game.is_running() {
            return;
        }
        let Runtime { game, surface } = &mut *rt;
        game.frame(surface);
    }

    request_animation_frame(runtime);
}
