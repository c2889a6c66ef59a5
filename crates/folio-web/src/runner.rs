use std::cell::RefCell;
use std::rc::Rc;

use folio_engine::bridge::protocol::HEADER_FLOATS;
use folio_engine::{
    build_instance_buffer, encode_header, InputEvent, InputQueue, InstanceBuffer, Page, PageManifest,
    ProtocolLayout, Viewport,
};

use crate::host::{HostRenderer, HostScene};

/// Wires a `Page` to the host: queues DOM events, runs frames, and keeps the
/// flat buffers the host reads from linear memory.
///
/// The crate exports free functions via `#[wasm_bindgen]` around one
/// `thread_local!` runner, because wasm-bindgen cannot export this struct's
/// borrowed-pointer accessors directly.
pub struct PageRunner {
    page: Page,
    input: InputQueue,
    instances: InstanceBuffer,
    header: [f32; HEADER_FLOATS],
    layout: ProtocolLayout,
    scene: Rc<RefCell<HostScene>>,
}

impl PageRunner {
    /// `seed` overrides the manifest's RNG seed when given.
    pub fn new(manifest: &PageManifest, viewport: Viewport, seed: Option<u64>) -> Self {
        let mut config = manifest.config.clone().unwrap_or_default();
        if let Some(seed) = seed {
            config.seed = seed;
        }
        let layout = ProtocolLayout::from_config(&config);
        let scene = Rc::new(RefCell::new(HostScene::default()));
        let renderer = Box::new(HostRenderer::new(scene.clone()));
        let page = Page::new(config, manifest.build_store(), viewport, Some(renderer));

        Self {
            page,
            input: InputQueue::new(),
            instances: InstanceBuffer::new(),
            header: [0.0; HEADER_FLOATS],
            layout,
            scene,
        }
    }

    /// Start the page. Call once after construction.
    pub fn boot(&mut self, document_complete: bool) {
        self.page.boot(document_complete);
        self.rebuild_buffers();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// One animation frame: drain input, advance the page, rebuild buffers.
    pub fn frame(&mut self, timestamp_ms: f64) {
        self.apply_pending_input();
        self.page.frame(timestamp_ms);
        self.rebuild_buffers();
    }

    /// Handle a link click synchronously. Returns true when the host should
    /// prevent the browser's default navigation.
    pub fn anchor_click(&mut self, href: &str) -> bool {
        // Earlier events must land first so the click sees current state
        self.apply_pending_input();
        self.page.anchor_click(href).prevents_default()
    }

    fn apply_pending_input(&mut self) {
        for event in self.input.drain() {
            self.page.apply_input(event);
        }
    }

    fn rebuild_buffers(&mut self) {
        let max = self.layout.max_elements;
        let elements = &self.page.context().elements;
        if elements.len() > max {
            log::warn!("runner: {} elements exceed buffer capacity {}", elements.len(), max);
        }
        build_instance_buffer(elements.iter().take(max), &mut self.instances);
        self.header = encode_header(&self.page.summary());
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    // ---- Pointer accessors for host reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn header(&self) -> &[f32; HEADER_FLOATS] {
        &self.header
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.instance_count()
    }

    pub fn positions_ptr(&self) -> *const f32 {
        self.scene.borrow().positions.as_ptr()
    }

    pub fn positions_len(&self) -> u32 {
        self.scene.borrow().positions.len() as u32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.scene.borrow().view_projection.as_ptr()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        let scene = self.scene.borrow();
        (scene.width, scene.height)
    }

    pub fn progress(&self) -> u8 {
        self.page.progress()
    }

    pub fn counter_label(&self) -> String {
        self.page.counter_label()
    }

    pub fn load_state(&self) -> u8 {
        self.page.load_state().code()
    }

    // ---- Capacity accessors ----

    pub fn max_elements(&self) -> u32 {
        self.layout.max_elements as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
