//! Scene renderer contract for the particle field.
//!
//! The engine never draws. Each frame it hands the current cloud and camera
//! to a `SceneRenderer`; the web crate implements it by exposing the data to
//! the host's WebGL scene.

use crate::particles::camera::CameraUniform;

/// Name of the per-point position attribute (3 floats per point).
pub const POSITION_ATTRIBUTE: &str = "position";

/// Everything a backend needs to draw one frame of the particle field.
pub struct SceneFrame<'a> {
    /// Flat xyz positions, 3 floats per point.
    pub positions: &'a [f32],
    /// Positions changed since the last frame and must be re-uploaded.
    pub positions_dirty: bool,
    /// Rotation of the whole cloud about the vertical axis, radians.
    pub rotation_y: f32,
    pub camera: CameraUniform,
    pub camera_position: [f32; 3],
    pub point_count: u32,
}

/// Renderer backend for the particle scene.
pub trait SceneRenderer {
    /// Backend identifier (e.g. "webgl", "headless").
    fn backend(&self) -> &'static str;

    /// Register or replace a named vertex attribute.
    fn set_attribute(&mut self, name: &str, data: &[f32], item_size: u32);

    /// Draw one frame.
    fn render(&mut self, frame: &SceneFrame);

    /// Resize the output surface. May be called between any two frames.
    fn resize(&mut self, width: u32, height: u32);
}

/// Renderer that keeps counters only. Used when no host surface exists and
/// in tests.
#[derive(Debug, Default, Clone)]
pub struct HeadlessRenderer {
    pub renders: u64,
    pub uploads: u64,
    pub attributes: Vec<(String, usize, u32)>,
    pub size: (u32, u32),
    pub last_rotation: f32,
    pub last_camera: [f32; 3],
}

impl SceneRenderer for HeadlessRenderer {
    fn backend(&self) -> &'static str {
        "headless"
    }

    fn set_attribute(&mut self, name: &str, data: &[f32], item_size: u32) {
        self.attributes.retain(|(n, _, _)| n != name);
        self.attributes.push((name.to_string(), data.len(), item_size));
    }

    fn render(&mut self, frame: &SceneFrame) {
        self.renders += 1;
        if frame.positions_dirty {
            self.uploads += 1;
        }
        self.last_rotation = frame.rotation_y;
        self.last_camera = frame.camera_position;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}
