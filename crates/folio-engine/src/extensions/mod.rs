// extensions/mod.rs
//
// Animation extensions: easing curves, the tween engine and timelines.
// The choreography only sees the `Tweener` trait; `TweenState` is the
// in-crate engine that satisfies it.

pub mod easing;
pub mod timeline;
pub mod tween;

pub use easing::{Easing, lerp, ease};
pub use timeline::{Timeline, TimelineStep, Position};
pub use tween::{Animator, TweenState, Tween, TweenId, TweenSpec, TweenLoop, TimelineId, Tweener};
