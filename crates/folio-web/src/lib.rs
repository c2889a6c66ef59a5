//! wasm-bindgen surface for the page engine.
//!
//! The host calls `page_init` once, forwards DOM events through the
//! `page_*` input functions, calls `page_frame` from `requestAnimationFrame`,
//! then reads the header, instance and particle buffers straight out of
//! linear memory via the pointer exports.

pub mod host;
pub mod runner;

pub use host::{HostRenderer, HostScene};
pub use runner::PageRunner;

use std::cell::RefCell;

use folio_engine::{ElementId, InputEvent, PageManifest, Rect, Viewport};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<PageRunner>> = RefCell::new(None);
}

fn with_runner<F, R>(f: F) -> R
where
    F: FnOnce(&mut PageRunner) -> R,
{
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Page not initialized. Call page_init() first.");
        f(runner)
    })
}

fn push(event: InputEvent) {
    with_runner(|r| r.push_input(event));
}

/// Build the page from a JSON manifest and start the loading gate.
/// A manifest that fails to parse boots an empty page.
#[wasm_bindgen]
pub fn page_init(manifest_json: &str, document_complete: bool, width: f32, height: f32) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"folio: logger already installed".into());
    }

    let manifest = match PageManifest::from_json(manifest_json) {
        Ok(manifest) => manifest,
        Err(err) => {
            log::error!("page_init: bad manifest: {}", err);
            PageManifest::default()
        }
    };
    // An explicit config keeps its seed; otherwise every load looks different
    let seed = if manifest.config.is_some() {
        None
    } else {
        Some((js_sys::Math::random() * u32::MAX as f64) as u64)
    };

    let mut runner = PageRunner::new(&manifest, Viewport::new(width, height), seed);
    runner.boot(document_complete);
    log::info!(
        "page_init: {} elements, state {}",
        manifest.elements.len(),
        runner.load_state()
    );
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
}

#[wasm_bindgen]
pub fn page_frame(timestamp_ms: f64) {
    with_runner(|r| r.frame(timestamp_ms));
}

// ---- Input ----

#[wasm_bindgen]
pub fn page_pointer_move(x: f32, y: f32) {
    push(InputEvent::PointerMove { x, y });
}

#[wasm_bindgen]
pub fn page_element_enter(id: u32) {
    push(InputEvent::ElementEnter { element: ElementId(id) });
}

#[wasm_bindgen]
pub fn page_element_hover(id: u32, x: f32, y: f32) {
    push(InputEvent::ElementHover { element: ElementId(id), x, y });
}

#[wasm_bindgen]
pub fn page_element_leave(id: u32) {
    push(InputEvent::ElementLeave { element: ElementId(id) });
}

/// Report an element's layout box in document coordinates.
#[wasm_bindgen]
pub fn page_element_rect(id: u32, x: f32, y: f32, width: f32, height: f32) {
    push(InputEvent::ElementRect {
        element: ElementId(id),
        rect: Rect::new(x, y, width, height),
    });
}

#[wasm_bindgen]
pub fn page_resize(width: f32, height: f32) {
    push(InputEvent::Resize { width, height });
}

#[wasm_bindgen]
pub fn page_wheel(delta_y: f32) {
    push(InputEvent::Wheel { delta_y });
}

/// Returns true when the host must call `preventDefault` on the click.
#[wasm_bindgen]
pub fn page_anchor_click(href: &str) -> bool {
    with_runner(|r| r.anchor_click(href))
}

// ---- Buffers ----

#[wasm_bindgen]
pub fn page_header_ptr() -> *const f32 {
    with_runner(|r| r.header_ptr())
}

#[wasm_bindgen]
pub fn page_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr())
}

#[wasm_bindgen]
pub fn page_instance_count() -> u32 {
    with_runner(|r| r.instance_count())
}

#[wasm_bindgen]
pub fn page_positions_ptr() -> *const f32 {
    with_runner(|r| r.positions_ptr())
}

#[wasm_bindgen]
pub fn page_positions_len() -> u32 {
    with_runner(|r| r.positions_len())
}

/// 16 floats, column-major view-projection.
#[wasm_bindgen]
pub fn page_camera_ptr() -> *const f32 {
    with_runner(|r| r.camera_ptr())
}

#[wasm_bindgen]
pub fn page_max_elements() -> u32 {
    with_runner(|r| r.max_elements())
}

#[wasm_bindgen]
pub fn page_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats())
}

// ---- Readouts ----

#[wasm_bindgen]
pub fn page_progress() -> u8 {
    with_runner(|r| r.progress())
}

#[wasm_bindgen]
pub fn page_counter_label() -> String {
    with_runner(|r| r.counter_label())
}

#[wasm_bindgen]
pub fn page_load_state() -> u8 {
    with_runner(|r| r.load_state())
}
