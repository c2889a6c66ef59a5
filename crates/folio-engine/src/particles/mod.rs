pub mod camera;
pub mod field;

pub use camera::{CameraUniform, PerspectiveCamera};
pub use field::{ParticleCloud, ParticleField, SceneStats, WaveParams};
