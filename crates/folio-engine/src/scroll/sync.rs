use crate::api::page::PageContext;
use crate::api::types::ElementId;
use crate::core::clock::{ClockTick, FrameSubscriber};
use crate::core::elements::ElementStore;
use crate::scroll::virtualizer::{ScrollRequest, ScrollVirtualizer};

/// Forwards every clock tick to the scroll virtualizer, exactly once per
/// frame, so scroll position and compositing share one timeline.
pub struct ScrollSync {
    /// Clock milliseconds to virtualizer time units.
    time_scale: f64,
}

impl ScrollSync {
    pub fn new(time_scale: f64) -> Self {
        Self { time_scale }
    }
}

impl FrameSubscriber<PageContext> for ScrollSync {
    fn name(&self) -> &'static str {
        "scroll-sync"
    }

    fn on_frame(&mut self, tick: ClockTick, ctx: &mut PageContext) {
        ctx.scroll.tick(tick.timestamp_ms * self.time_scale);
    }
}

/// Result of a click on a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorOutcome {
    /// Not a same-page anchor (or the page isn't interactive yet); the host
    /// navigates normally.
    Ignored,
    /// Bare `#`. Default suppressed, nothing scrolls.
    Root,
    /// Fragment names no element. Default suppressed, nothing scrolls.
    Unresolved,
    Scrolled(ElementId),
}

impl AnchorOutcome {
    pub fn prevents_default(self) -> bool {
        !matches!(self, AnchorOutcome::Ignored)
    }
}

/// Resolve a same-page anchor and issue at most one scroll command.
pub fn handle_anchor_click(
    href: &str,
    elements: &ElementStore,
    scroll: &mut dyn ScrollVirtualizer,
) -> AnchorOutcome {
    let Some(fragment) = href.strip_prefix('#') else {
        return AnchorOutcome::Ignored;
    };
    if fragment.is_empty() {
        return AnchorOutcome::Root;
    }
    match elements.find_by_dom_id(fragment) {
        Some(element) => {
            scroll.scroll_to_element(ScrollRequest {
                element: element.id,
                top: element.rect.y,
            });
            AnchorOutcome::Scrolled(element.id)
        }
        None => {
            log::debug!("anchor {} resolves to no element", href);
            AnchorOutcome::Unresolved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Rect;
    use crate::core::elements::Element;
    use crate::scroll::virtualizer::MomentumScroll;

    fn store() -> ElementStore {
        let mut s = ElementStore::new();
        s.insert(
            Element::new(ElementId(2))
                .with_dom_id("section2")
                .with_rect(Rect::new(0.0, 900.0, 1280.0, 600.0)),
        );
        s
    }

    fn scroller() -> MomentumScroll {
        let mut m = MomentumScroll::default();
        m.set_limit(5000.0);
        m
    }

    #[test]
    fn known_fragment_scrolls_once() {
        let elements = store();
        let mut scroll = scroller();
        let outcome = handle_anchor_click("#section2", &elements, &mut scroll);
        assert_eq!(outcome, AnchorOutcome::Scrolled(ElementId(2)));
        assert!(outcome.prevents_default());
        assert_eq!(
            scroll.last_request(),
            Some(ScrollRequest { element: ElementId(2), top: 900.0 })
        );
    }

    #[test]
    fn root_and_unknown_are_silent() {
        let elements = store();
        let mut scroll = scroller();
        assert_eq!(handle_anchor_click("#", &elements, &mut scroll), AnchorOutcome::Root);
        assert_eq!(handle_anchor_click("#nope", &elements, &mut scroll), AnchorOutcome::Unresolved);
        assert!(scroll.last_request().is_none());
        assert!(!scroll.is_scrolling());
    }

    #[test]
    fn external_links_pass_through() {
        let elements = store();
        let mut scroll = scroller();
        let outcome = handle_anchor_click("https://example.com/#section2", &elements, &mut scroll);
        assert_eq!(outcome, AnchorOutcome::Ignored);
        assert!(!outcome.prevents_default());
        assert!(scroll.last_request().is_none());
    }
}
