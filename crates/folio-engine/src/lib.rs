pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;
pub mod motion;
pub mod particles;
pub mod scroll;

// Re-export key types at crate root for convenience
pub use api::page::{Page, PageConfig, PageContext};
pub use api::types::{ElementId, Rect, Viewport};
pub use core::clock::{ClockTick, FrameClock, FrameSubscriber};
pub use core::elements::{Element, ElementStore, HoverSkin, Property, Role};
pub use core::loading::{GateEvent, LoadState, LoadingConfig, LoadingGate, Readiness};
pub use core::time::{FrameDelta, FrameTimer, IntervalTimer};
pub use renderer::instance::{ElementInstance, InstanceBuffer};
pub use renderer::traits::{HeadlessRenderer, SceneFrame, SceneRenderer};
pub use input::pointer::{PointerSnapshot, PointerTracker};
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::{ElementDescriptor, PageManifest};
pub use bridge::protocol::{encode_header, FrameSummary, ProtocolLayout};
pub use motion::{DampedFollower, HoverSkinToggle, MagneticController};
pub use particles::{ParticleCloud, ParticleField, PerspectiveCamera};
pub use scroll::{AnchorOutcome, MomentumScroll, ScrollRequest, ScrollVirtualizer};
pub use systems::build_instance_buffer;

// Extensions: the tween engine and its easing curves
pub use extensions::{
    Easing, lerp, ease,
    Animator, Position, Timeline, TweenState, Tween, TweenId, TweenSpec, TweenLoop, TimelineId, Tweener,
};
