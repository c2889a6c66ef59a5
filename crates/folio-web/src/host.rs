use std::cell::RefCell;
use std::rc::Rc;

use folio_engine::{SceneFrame, SceneRenderer};
use glam::Mat4;

/// Particle scene data the host's WebGL layer reads by pointer each frame.
#[derive(Debug, Default)]
pub struct HostScene {
    /// Flat xyz positions, re-copied only when the engine marks them dirty.
    pub positions: Vec<f32>,
    pub item_size: u32,
    /// Column-major view-projection matrix.
    pub view_projection: [f32; 16],
    pub camera_position: [f32; 3],
    pub rotation_y: f32,
    pub width: u32,
    pub height: u32,
    pub uploads: u64,
    pub renders: u64,
}

/// `SceneRenderer` that publishes into a shared [`HostScene`].
///
/// The particle field owns the renderer once the page is interactive, so the
/// runner keeps its own handle on the scene to hand out pointers.
pub struct HostRenderer {
    scene: Rc<RefCell<HostScene>>,
}

impl HostRenderer {
    pub fn new(scene: Rc<RefCell<HostScene>>) -> Self {
        Self { scene }
    }
}

impl SceneRenderer for HostRenderer {
    fn backend(&self) -> &'static str {
        "webgl-host"
    }

    fn set_attribute(&mut self, name: &str, data: &[f32], item_size: u32) {
        if name != folio_engine::renderer::POSITION_ATTRIBUTE {
            log::warn!("host: unknown attribute '{}' ignored", name);
            return;
        }
        let mut scene = self.scene.borrow_mut();
        scene.positions.clear();
        scene.positions.extend_from_slice(data);
        scene.item_size = item_size;
    }

    fn render(&mut self, frame: &SceneFrame) {
        let mut scene = self.scene.borrow_mut();
        if frame.positions_dirty {
            scene.positions.clear();
            scene.positions.extend_from_slice(frame.positions);
            scene.uploads += 1;
        }
        scene.view_projection = Mat4::from_cols_array_2d(&frame.camera.view_projection).to_cols_array();
        scene.camera_position = frame.camera_position;
        scene.rotation_y = frame.rotation_y;
        scene.renders += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        let mut scene = self.scene.borrow_mut();
        scene.width = width;
        scene.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_engine::PerspectiveCamera;

    #[test]
    fn render_copies_dirty_positions_only() {
        let scene = Rc::new(RefCell::new(HostScene::default()));
        let mut renderer = HostRenderer::new(scene.clone());
        renderer.set_attribute("position", &[0.0; 6], 3);
        assert_eq!(scene.borrow().positions.len(), 6);

        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0, 3.0);
        let positions = [1.0, 2.0, 3.0];
        let mut frame = SceneFrame {
            positions: &positions,
            positions_dirty: true,
            rotation_y: 0.5,
            camera: camera.uniform(),
            camera_position: [0.0, 0.0, 3.0],
            point_count: 1,
        };
        renderer.render(&frame);
        frame.positions_dirty = false;
        renderer.render(&frame);

        let s = scene.borrow();
        assert_eq!(s.positions, vec![1.0, 2.0, 3.0]);
        assert_eq!(s.uploads, 1);
        assert_eq!(s.renders, 2);
        assert_eq!(s.rotation_y, 0.5);
    }

    #[test]
    fn unknown_attribute_is_ignored() {
        let scene = Rc::new(RefCell::new(HostScene::default()));
        let mut renderer = HostRenderer::new(scene.clone());
        renderer.set_attribute("color", &[1.0; 3], 3);
        assert!(scene.borrow().positions.is_empty());
    }
}
