//! Momentum scroll virtualizer.
//!
//! Owns the page's scroll offset and eases it toward a requested target.
//! It has no timer of its own: the frame clock feeds it timestamps.

use crate::api::types::ElementId;

/// Command to bring an element's top edge to the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub element: ElementId,
    /// Element top in document coordinates.
    pub top: f32,
}

/// Interface the scroll adapter drives.
pub trait ScrollVirtualizer {
    /// Advance to `time_ms` on the shared clock.
    fn tick(&mut self, time_ms: f64);

    fn scroll_to_element(&mut self, request: ScrollRequest);

    /// Relative scroll from wheel input.
    fn scroll_by(&mut self, delta: f32);

    /// Largest reachable offset (content height minus viewport height).
    fn set_limit(&mut self, limit: f32);

    fn offset(&self) -> f32;

    fn limit(&self) -> f32;
}

/// `min(1, 1.001 - 2^(-10 t))`: fast start, long tail.
#[inline]
pub fn momentum_ease(t: f32) -> f32 {
    (1.001 - 2f32.powf(-10.0 * t)).min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Glide {
    from: f32,
    to: f32,
    /// Set on the first tick after the request.
    started_ms: Option<f64>,
}

/// Eased scroller. Every request restarts the glide from the current offset.
#[derive(Debug, Clone)]
pub struct MomentumScroll {
    offset: f32,
    limit: f32,
    duration_ms: f64,
    glide: Option<Glide>,
    /// Most recent `scroll_to_element` request.
    last_request: Option<ScrollRequest>,
}

impl MomentumScroll {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            offset: 0.0,
            limit: 0.0,
            duration_ms: (duration_secs.max(0.0) as f64) * 1000.0,
            glide: None,
            last_request: None,
        }
    }

    pub fn scroll_to(&mut self, target: f32) {
        let to = target.clamp(0.0, self.limit);
        self.glide = Some(Glide {
            from: self.offset,
            to,
            started_ms: None,
        });
    }

    /// Final offset of the glide in progress, or the current offset.
    pub fn target(&self) -> f32 {
        self.glide.map_or(self.offset, |g| g.to)
    }

    pub fn is_scrolling(&self) -> bool {
        self.glide.is_some()
    }

    pub fn last_request(&self) -> Option<ScrollRequest> {
        self.last_request
    }
}

impl Default for MomentumScroll {
    fn default() -> Self {
        Self::new(1.2)
    }
}

impl ScrollVirtualizer for MomentumScroll {
    fn tick(&mut self, time_ms: f64) {
        let Some(glide) = self.glide.as_mut() else {
            return;
        };
        let started = *glide.started_ms.get_or_insert(time_ms);
        let t = if self.duration_ms > 0.0 {
            ((time_ms - started) / self.duration_ms) as f32
        } else {
            1.0
        };
        if t >= 1.0 {
            self.offset = glide.to;
            self.glide = None;
            return;
        }
        let k = momentum_ease(t.max(0.0));
        self.offset = glide.from + (glide.to - glide.from) * k;
    }

    fn scroll_to_element(&mut self, request: ScrollRequest) {
        self.last_request = Some(request);
        self.scroll_to(request.top);
    }

    fn scroll_by(&mut self, delta: f32) {
        let base = self.target();
        self.scroll_to(base + delta);
    }

    fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        self.offset = self.offset.min(self.limit);
        if let Some(glide) = self.glide.as_mut() {
            glide.to = glide.to.min(self.limit);
        }
    }

    fn offset(&self) -> f32 {
        self.offset
    }

    fn limit(&self) -> f32 {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroller(limit: f32) -> MomentumScroll {
        let mut s = MomentumScroll::new(1.2);
        s.set_limit(limit);
        s
    }

    #[test]
    fn ease_saturates_at_one() {
        assert!(momentum_ease(0.0) < 0.01);
        assert_eq!(momentum_ease(1.0), 1.0);
        assert!(momentum_ease(0.5) > 0.9);
    }

    #[test]
    fn glide_reaches_target_after_duration() {
        let mut s = scroller(5000.0);
        s.scroll_to(1000.0);
        let mut t = 0.0;
        let mut last = 0.0;
        while s.is_scrolling() {
            s.tick(t);
            assert!(s.offset() >= last);
            last = s.offset();
            t += 16.0;
        }
        assert_eq!(s.offset(), 1000.0);
        assert!(t >= 1200.0);
    }

    #[test]
    fn targets_are_clamped_to_limit() {
        let mut s = scroller(300.0);
        s.scroll_to(1000.0);
        s.tick(0.0);
        s.tick(2000.0);
        assert_eq!(s.offset(), 300.0);
        s.scroll_by(-1000.0);
        s.tick(3000.0);
        s.tick(5000.0);
        assert_eq!(s.offset(), 0.0);
    }

    #[test]
    fn wheel_deltas_accumulate_on_target() {
        let mut s = scroller(1000.0);
        s.scroll_by(100.0);
        s.scroll_by(100.0);
        assert_eq!(s.target(), 200.0);
    }

    #[test]
    fn element_request_replaces_the_previous_one() {
        let mut s = scroller(1000.0);
        let first = ScrollRequest { element: ElementId(4), top: 640.0 };
        let second = ScrollRequest { element: ElementId(5), top: 320.0 };
        s.scroll_to_element(first);
        assert_eq!(s.last_request(), Some(first));
        assert_eq!(s.target(), 640.0);
        for _ in 0..50 {
            s.scroll_to_element(second);
        }
        assert_eq!(s.last_request(), Some(second));
        assert_eq!(s.target(), 320.0);
    }

    #[test]
    fn idle_tick_is_noop() {
        let mut s = scroller(1000.0);
        s.tick(10.0);
        assert_eq!(s.offset(), 0.0);
        assert!(!s.is_scrolling());
    }
}
