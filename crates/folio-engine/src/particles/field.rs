//! Particle field: a fixed cloud of points rippled by a travelling wave,
//! slowly spinning, viewed by a camera that drifts with the pointer.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::api::page::PageContext;
use crate::api::types::Viewport;
use crate::core::clock::{ClockTick, FrameSubscriber};
use crate::core::rng::Rng;
use crate::core::time::FrameTimer;
use crate::motion::follower::damp_factor;
use crate::particles::camera::PerspectiveCamera;
use crate::renderer::traits::{SceneFrame, SceneRenderer, POSITION_ATTRIBUTE};

/// Per-tick wave and spin constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Added to the elapsed accumulator each tick, regardless of frame delta.
    pub time_step: f32,
    pub rotation_step: f32,
    pub amplitude: f32,
    pub frequency: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            time_step: 0.001,
            rotation_step: 0.0005,
            amplitude: 0.002,
            frequency: 0.5,
        }
    }
}

/// Fixed-size point cloud. The point count never changes after construction.
#[derive(Debug, Clone)]
pub struct ParticleCloud {
    positions: Vec<f32>,
    rotation_y: f32,
    elapsed: f32,
}

impl ParticleCloud {
    /// `count` points uniformly distributed in a cube of `half_width` around
    /// the origin.
    pub fn random(count: usize, half_width: f32, rng: &mut Rng) -> Self {
        let positions = (0..count * 3).map(|_| rng.centered(half_width)).collect();
        Self {
            positions,
            rotation_y: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        Self {
            positions: points.iter().flat_map(|p| p.to_array()).collect(),
            rotation_y: 0.0,
            elapsed: 0.0,
        }
    }

    /// One wave tick. Only the y coordinates move.
    pub fn advance(&mut self, wave: &WaveParams) {
        self.elapsed += wave.time_step;
        self.rotation_y = (self.rotation_y + wave.rotation_step) % TAU;
        let t = self.elapsed;
        for point in self.positions.chunks_exact_mut(3) {
            point[1] += wave.amplitude * (t + point[0] * wave.frequency).sin();
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn point(&self, index: usize) -> Option<Vec3> {
        self.positions
            .get(index * 3..index * 3 + 3)
            .map(Vec3::from_slice)
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// What the particle field last drew, for the host header.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneStats {
    pub particle_count: u32,
    pub camera: [f32; 3],
    pub aspect: f32,
    pub rotation_y: f32,
    pub positions_dirty: bool,
    pub renders: u64,
}

/// Clock subscriber owning the cloud, its camera and the renderer.
pub struct ParticleField {
    cloud: ParticleCloud,
    wave: WaveParams,
    camera: PerspectiveCamera,
    camera_damping: f32,
    renderer: Box<dyn SceneRenderer>,
    timer: FrameTimer,
    viewport: Viewport,
    renders: u64,
}

impl ParticleField {
    pub fn new(
        cloud: ParticleCloud,
        wave: WaveParams,
        camera: PerspectiveCamera,
        camera_damping: f32,
        mut renderer: Box<dyn SceneRenderer>,
        timer: FrameTimer,
        viewport: Viewport,
    ) -> Self {
        renderer.set_attribute(POSITION_ATTRIBUTE, cloud.positions(), 3);
        renderer.resize(viewport.width as u32, viewport.height as u32);
        let mut field = Self {
            cloud,
            wave,
            camera,
            camera_damping,
            renderer,
            timer,
            viewport,
            renders: 0,
        };
        field.camera.set_aspect(viewport.aspect());
        field.camera.update_projection();
        field
    }

    /// Apply a viewport change: aspect, projection and output size.
    /// Safe to call at any point between frames; repeated sizes are no-ops.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport || viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        self.camera.update_projection();
        self.renderer
            .resize(viewport.width as u32, viewport.height as u32);
        log::debug!("particle field resized to {}x{}", viewport.width, viewport.height);
    }

    pub fn cloud(&self) -> &ParticleCloud {
        &self.cloud
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn stats(&self, positions_dirty: bool) -> SceneStats {
        SceneStats {
            particle_count: self.cloud.len() as u32,
            camera: self.camera.position.to_array(),
            aspect: self.camera.aspect,
            rotation_y: self.cloud.rotation_y(),
            positions_dirty,
            renders: self.renders,
        }
    }
}

impl FrameSubscriber<PageContext> for ParticleField {
    fn name(&self) -> &'static str {
        "particle-field"
    }

    fn on_frame(&mut self, tick: ClockTick, ctx: &mut PageContext) {
        // Resizes arrive as events; apply the latest before drawing.
        self.resize(ctx.viewport);

        let ratio = self.timer.delta_ratio(tick.timestamp_ms);
        self.cloud.advance(&self.wave);

        let target = ctx.pointer().camera_target();
        self.camera
            .follow(target, damp_factor(self.camera_damping, ratio));

        let frame = SceneFrame {
            positions: self.cloud.positions(),
            positions_dirty: true,
            rotation_y: self.cloud.rotation_y(),
            camera: self.camera.uniform(),
            camera_position: self.camera.position.to_array(),
            point_count: self.cloud.len() as u32,
        };
        self.renderer.render(&frame);
        self.renders += 1;
        ctx.scene = Some(self.stats(true));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::traits::HeadlessRenderer;

    #[test]
    fn count_is_fixed_and_only_y_moves() {
        let mut rng = Rng::new(7);
        let mut cloud = ParticleCloud::random(500, 7.5, &mut rng);
        let before = cloud.positions().to_vec();
        let wave = WaveParams::default();
        for _ in 0..100 {
            let prev = cloud.positions().to_vec();
            cloud.advance(&wave);
            assert_eq!(cloud.len(), 500);
            for (now, was) in cloud.positions().chunks(3).zip(prev.chunks(3)) {
                assert_eq!(now[0], was[0]);
                assert_eq!(now[2], was[2]);
                assert!((now[1] - was[1]).abs() <= wave.amplitude + 1e-6);
            }
        }
        assert_ne!(cloud.positions(), &before[..]);
    }

    #[test]
    fn random_cloud_stays_in_cube() {
        let mut rng = Rng::new(99);
        let cloud = ParticleCloud::random(3000, 7.5, &mut rng);
        assert_eq!(cloud.len(), 3000);
        assert!(cloud.positions().iter().all(|c| c.abs() <= 7.5));
    }

    #[test]
    fn wave_keyed_by_x_coordinate() {
        let mut cloud = ParticleCloud::from_points(&[Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]);
        let wave = WaveParams::default();
        cloud.advance(&wave);
        let a = cloud.point(0).unwrap().y;
        let b = cloud.point(1).unwrap().y;
        assert!((a - 0.002 * 0.001_f32.sin()).abs() < 1e-9);
        assert!((b - 0.002 * (0.001_f32 + 1.0).sin()).abs() < 1e-7);
    }

    #[test]
    fn rotation_and_elapsed_advance_monotonically() {
        let mut cloud = ParticleCloud::from_points(&[Vec3::ZERO]);
        let wave = WaveParams::default();
        let mut last = 0.0;
        for _ in 0..10 {
            cloud.advance(&wave);
            assert!(cloud.elapsed() > last);
            last = cloud.elapsed();
        }
        assert!((cloud.rotation_y() - 0.005).abs() < 1e-6);
    }

    #[test]
    fn rotation_wraps_at_full_turn() {
        let mut cloud = ParticleCloud::from_points(&[Vec3::ZERO]);
        let wave = WaveParams {
            rotation_step: 1.0,
            ..WaveParams::default()
        };
        for _ in 0..10 {
            cloud.advance(&wave);
            assert!(cloud.rotation_y() < TAU);
        }
    }

    #[test]
    fn construction_uploads_positions_and_sizes_surface() {
        let cloud = ParticleCloud::from_points(&[Vec3::ZERO; 4]);
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0, 3.0);
        let field = ParticleField::new(
            cloud,
            WaveParams::default(),
            camera,
            0.05,
            Box::new(HeadlessRenderer::default()),
            FrameTimer::default(),
            Viewport::new(800.0, 400.0),
        );
        assert!((field.camera().aspect - 2.0).abs() < 1e-6);
        assert_eq!(field.stats(false).particle_count, 4);
    }

    #[test]
    fn resize_ignores_empty_and_repeated_sizes() {
        let cloud = ParticleCloud::from_points(&[Vec3::ZERO]);
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0, 3.0);
        let mut field = ParticleField::new(
            cloud,
            WaveParams::default(),
            camera,
            0.05,
            Box::new(HeadlessRenderer::default()),
            FrameTimer::default(),
            Viewport::new(100.0, 100.0),
        );
        field.resize(Viewport::new(0.0, 0.0));
        assert!((field.camera().aspect - 1.0).abs() < 1e-6);
        field.resize(Viewport::new(300.0, 100.0));
        field.resize(Viewport::new(300.0, 100.0));
        assert!((field.camera().aspect - 3.0).abs() < 1e-6);
    }
}
