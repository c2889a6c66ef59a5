use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Perspective camera looking down -Z at the particle cloud.
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Mat4,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32, z: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, z),
            fov_degrees,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Recompute the projection after `aspect`, `fov_degrees`, `near` or
    /// `far` changed.
    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: (self.projection * self.view_matrix()).to_cols_array_2d(),
        }
    }

    /// Move x/y a fraction `factor` of the way toward `target`. Depth is
    /// left alone.
    pub fn follow(&mut self, target: Vec2, factor: f32) {
        let factor = factor.clamp(0.0, 1.0);
        self.position.x += (target.x - self.position.x) * factor;
        self.position.y += (target.y - self.position.y) * factor;
    }
}
