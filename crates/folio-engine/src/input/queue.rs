use crate::api::types::{ElementId, Rect};

/// Input events the page understands.
/// Coordinates are CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The pointer moved anywhere in the window.
    PointerMove { x: f32, y: f32 },
    /// The pointer entered an element.
    ElementEnter { element: ElementId },
    /// The pointer moved while over an element.
    ElementHover { element: ElementId, x: f32, y: f32 },
    /// The pointer left an element.
    ElementLeave { element: ElementId },
    /// An element's layout box changed (document coordinates).
    ElementRect { element: ElementId, rect: Rect },
    /// The viewport was resized.
    Resize { width: f32, height: f32 },
    /// Wheel or trackpad scroll, in pixels.
    Wheel { delta_y: f32 },
}

/// A queue of input events.
/// The host writes events as DOM listeners fire; the page drains them at the
/// start of each frame, in arrival order.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
