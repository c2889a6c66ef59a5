pub mod instance;
pub mod traits;

pub use instance::{ElementInstance, InstanceBuffer};
pub use traits::{HeadlessRenderer, SceneFrame, SceneRenderer, POSITION_ATTRIBUTE};
