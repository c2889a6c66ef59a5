use crate::api::page::PageContext;
use crate::api::types::ElementId;
use crate::core::clock::{ClockTick, FrameSubscriber};
use crate::core::elements::{ElementStore, Property};
use crate::extensions::easing::Easing;
use crate::extensions::tween::{TweenSpec, Tweener};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Reveal once the element top is above this fraction of the viewport.
    pub threshold: f32,
    /// Starting downward shift in pixels.
    pub distance: f32,
    pub duration: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            distance: 50.0,
            duration: 1.2,
        }
    }
}

/// Fades elements up into place the first time they scroll into view.
pub struct RevealTriggers {
    pending: Vec<ElementId>,
    revealed: Vec<ElementId>,
    config: RevealConfig,
}

impl RevealTriggers {
    pub fn new(ids: Vec<ElementId>, config: RevealConfig) -> Self {
        Self {
            pending: ids,
            revealed: Vec::new(),
            config,
        }
    }

    /// Put every pending element in its hidden starting pose.
    pub fn prime(&self, elements: &mut ElementStore) {
        for &id in &self.pending {
            if let Some(element) = elements.get_mut(id) {
                element.transform.set(Property::Y, self.config.distance);
                element.transform.set(Property::Opacity, 0.0);
            }
        }
    }

    pub fn revealed(&self) -> &[ElementId] {
        &self.revealed
    }

    pub fn pending(&self) -> &[ElementId] {
        &self.pending
    }

    /// Elements whose top has crossed the trigger line at scroll `offset`.
    fn due(&self, elements: &ElementStore, offset: f32, viewport_height: f32) -> Vec<ElementId> {
        let line = self.config.threshold * viewport_height;
        self.pending
            .iter()
            .copied()
            .filter(|&id| {
                elements
                    .get(id)
                    .is_some_and(|e| e.rect.y - offset <= line)
            })
            .collect()
    }
}

impl FrameSubscriber<PageContext> for RevealTriggers {
    fn name(&self) -> &'static str {
        "scroll-reveal"
    }

    fn on_frame(&mut self, _tick: ClockTick, ctx: &mut PageContext) {
        if self.pending.is_empty() {
            return;
        }
        let due = self.due(&ctx.elements, ctx.scroll_offset(), ctx.viewport.height);
        if due.is_empty() {
            return;
        }
        let spec = TweenSpec::new(self.config.duration, Easing::QuartOut);
        let mut animator = ctx.animator();
        for &id in &due {
            animator.animate_to(id, &[(Property::Y, 0.0), (Property::Opacity, 1.0)], spec);
        }
        self.pending.retain(|id| !due.contains(id));
        self.revealed.extend(due);
    }
}
