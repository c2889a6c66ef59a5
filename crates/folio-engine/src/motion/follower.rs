//! Damped pointer follower.
//!
//! Each tick moves `current` a fraction of the way toward `target`. The
//! fraction is `1 - (1 - s)^r`, where `r` is the frame's delta relative to a
//! 60 Hz reference frame: two 120 Hz frames move the follower exactly as far
//! as one 60 Hz frame, so the lag feels the same on every display.

use glam::Vec2;

use crate::api::page::PageContext;
use crate::api::types::ElementId;
use crate::core::clock::{ClockTick, FrameSubscriber};
use crate::core::elements::Property;
use crate::core::time::FrameTimer;
use crate::extensions::tween::Tweener;

/// Frame-rate independent interpolation factor for smoothing `s` over a
/// frame of `delta_ratio` reference frames. Always in [0, 1).
#[inline]
pub fn damp_factor(smoothing: f32, delta_ratio: f32) -> f32 {
    if delta_ratio <= 0.0 {
        return 0.0;
    }
    1.0 - (1.0 - smoothing).powf(delta_ratio)
}

/// Exponentially smoothed 2-D position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedFollower {
    pub target: Vec2,
    current: Vec2,
    smoothing: f32,
}

impl DampedFollower {
    /// `smoothing` is clamped into the open interval (0, 1).
    pub fn new(smoothing: f32) -> Self {
        Self {
            target: Vec2::ZERO,
            current: Vec2::ZERO,
            smoothing: smoothing.clamp(1e-4, 1.0 - 1e-4),
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.current = position;
        self
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    /// Advance by one frame of `delta_ratio` reference frames.
    pub fn step(&mut self, delta_ratio: f32) -> Vec2 {
        let k = damp_factor(self.smoothing, delta_ratio);
        self.current += (self.target - self.current) * k;
        self.current
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }
}

/// Clock subscriber that drives the follower ring from the pointer snapshot.
pub struct CursorFollower {
    follower: DampedFollower,
    timer: FrameTimer,
    ring: ElementId,
    /// Half the ring's size, so the ring is centred on the follower point.
    ring_offset: f32,
}

impl CursorFollower {
    pub fn new(ring: ElementId, smoothing: f32, ring_offset: f32, timer: FrameTimer) -> Self {
        Self {
            follower: DampedFollower::new(smoothing),
            timer,
            ring,
            ring_offset,
        }
    }

    pub fn follower(&self) -> &DampedFollower {
        &self.follower
    }
}

impl FrameSubscriber<PageContext> for CursorFollower {
    fn name(&self) -> &'static str {
        "cursor-follower"
    }

    fn on_frame(&mut self, tick: ClockTick, ctx: &mut PageContext) {
        let ratio = self.timer.delta_ratio(tick.timestamp_ms);
        self.follower.set_target(ctx.pointer().position);
        let p = self.follower.step(ratio);
        let offset = self.ring_offset;
        ctx.animator().set_immediate(
            self.ring,
            &[(Property::X, p.x - offset), (Property::Y, p.y - offset)],
        );
    }
}
