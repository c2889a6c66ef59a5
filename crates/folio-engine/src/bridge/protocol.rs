/// Linear-memory layout shared with the host page.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Elements: max_elements × 8 floats]
/// ```
///
/// Particle positions live in a separate buffer owned by the host renderer,
/// since their count is fixed and they are uploaded as a vertex attribute.

use crate::api::page::PageConfig;
use crate::renderer::instance::ElementInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_LOAD_STATE: usize = 2;
pub const HEADER_PROGRESS: usize = 3;
pub const HEADER_ELEMENT_COUNT: usize = 4;
pub const HEADER_PARTICLE_COUNT: usize = 5;
pub const HEADER_CAMERA_X: usize = 6;
pub const HEADER_CAMERA_Y: usize = 7;
pub const HEADER_CAMERA_Z: usize = 8;
pub const HEADER_ASPECT: usize = 9;
pub const HEADER_ROTATION_Y: usize = 10;
pub const HEADER_POSITIONS_DIRTY: usize = 11;
pub const HEADER_RENDER_COUNT: usize = 12;
pub const HEADER_SCROLL_OFFSET: usize = 13;
pub const HEADER_VIEWPORT_WIDTH: usize = 14;
pub const HEADER_VIEWPORT_HEIGHT: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per element instance (wire format, never changes).
pub const INSTANCE_FLOATS: usize = ElementInstance::FLOATS;

/// Everything the header reports for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSummary {
    pub frame: u64,
    pub load_state: u8,
    pub progress: u8,
    pub element_count: u32,
    pub particle_count: u32,
    pub camera: [f32; 3],
    pub aspect: f32,
    pub rotation_y: f32,
    pub positions_dirty: bool,
    pub renders: u64,
    pub scroll_offset: f32,
    pub viewport: [f32; 2],
}

/// Encode a summary into header floats.
pub fn encode_header(summary: &FrameSummary) -> [f32; HEADER_FLOATS] {
    let mut h = [0.0; HEADER_FLOATS];
    h[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    h[HEADER_FRAME_COUNTER] = summary.frame as f32;
    h[HEADER_LOAD_STATE] = summary.load_state as f32;
    h[HEADER_PROGRESS] = summary.progress as f32;
    h[HEADER_ELEMENT_COUNT] = summary.element_count as f32;
    h[HEADER_PARTICLE_COUNT] = summary.particle_count as f32;
    h[HEADER_CAMERA_X] = summary.camera[0];
    h[HEADER_CAMERA_Y] = summary.camera[1];
    h[HEADER_CAMERA_Z] = summary.camera[2];
    h[HEADER_ASPECT] = summary.aspect;
    h[HEADER_ROTATION_Y] = summary.rotation_y;
    h[HEADER_POSITIONS_DIRTY] = if summary.positions_dirty { 1.0 } else { 0.0 };
    h[HEADER_RENDER_COUNT] = summary.renders as f32;
    h[HEADER_SCROLL_OFFSET] = summary.scroll_offset;
    h[HEADER_VIEWPORT_WIDTH] = summary.viewport[0];
    h[HEADER_VIEWPORT_HEIGHT] = summary.viewport[1];
    h
}

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum element instances.
    pub max_elements: usize,
    /// Size of element data section in floats.
    pub element_data_floats: usize,
    /// Offset (in floats) where element data begins.
    pub element_data_offset: usize,
    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_elements: usize) -> Self {
        let element_data_floats = max_elements * INSTANCE_FLOATS;
        let element_data_offset = HEADER_FLOATS;
        let buffer_total_floats = element_data_offset + element_data_floats;
        Self {
            max_elements,
            element_data_floats,
            element_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &PageConfig) -> Self {
        Self::new(config.max_elements)
    }
}
