pub mod follower;
pub mod magnetic;

pub use follower::{damp_factor, CursorFollower, DampedFollower};
pub use magnetic::{attraction, HoverSkinToggle, MagneticConfig, MagneticController, MagneticElement};
