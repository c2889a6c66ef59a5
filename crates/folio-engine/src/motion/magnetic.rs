//! Magnetic hover and the follower's hover skin.
//!
//! A magnetic element leans toward the pointer while hovered and springs
//! back to its rest offset when the pointer leaves. The controller only
//! computes offsets and issues tween requests; the tween engine does the
//! actual motion.

use glam::Vec2;

use crate::api::types::{ElementId, Rect};
use crate::core::elements::{ElementStore, HoverSkin, Property};
use crate::extensions::easing::Easing;
use crate::extensions::tween::{TweenSpec, Tweener};

/// Timings and strengths for the magnetic effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticConfig {
    /// Fraction of the pointer-to-centre distance the element travels.
    pub strength: f32,
    pub follow_duration: f32,
    pub return_duration: f32,
    /// Follower ring scale and opacity while a magnetic element is hovered.
    pub ring_scale: f32,
    pub ring_opacity: f32,
    pub ring_duration: f32,
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            strength: 0.3,
            follow_duration: 0.5,
            return_duration: 0.8,
            ring_scale: 1.5,
            ring_opacity: 0.5,
            ring_duration: 0.3,
        }
    }
}

/// Offset pulling an element of box `rect` toward `pointer`, a fraction
/// `strength` of the way from its centre.
#[inline]
pub fn attraction(pointer: Vec2, rect: Rect, strength: f32) -> Vec2 {
    (pointer - rect.center()) * strength
}

/// Per-element hover session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticElement {
    pub id: ElementId,
    /// Offset the element returns to when released.
    pub rest: Vec2,
    /// Last offset requested from the tween engine.
    pub offset: Vec2,
    pub hovered: bool,
}

impl MagneticElement {
    fn new(id: ElementId) -> Self {
        Self {
            id,
            rest: Vec2::ZERO,
            offset: Vec2::ZERO,
            hovered: false,
        }
    }
}

pub struct MagneticController {
    elements: Vec<MagneticElement>,
    /// The follower ring that grows while a magnetic element is hovered.
    ring: ElementId,
    config: MagneticConfig,
}

impl MagneticController {
    pub fn new(ids: &[ElementId], ring: ElementId, config: MagneticConfig) -> Self {
        Self {
            elements: ids.iter().map(|&id| MagneticElement::new(id)).collect(),
            ring,
            config: MagneticConfig {
                strength: config.strength.clamp(0.0, 1.0),
                ..config
            },
        }
    }

    /// Pointer moved over `id`, whose current box is `rect` (viewport
    /// coordinates). Returns the requested offset, or `None` if `id` is not
    /// magnetic.
    pub fn hover_move(
        &mut self,
        id: ElementId,
        pointer: Vec2,
        rect: Rect,
        tweens: &mut dyn Tweener,
    ) -> Option<Vec2> {
        let config = self.config;
        let ring = self.ring;
        let element = self.elements.iter_mut().find(|e| e.id == id)?;

        let offset = element.rest + attraction(pointer, rect, config.strength);
        element.offset = offset;
        element.hovered = true;

        tweens.animate_to(
            id,
            &[(Property::X, offset.x), (Property::Y, offset.y)],
            TweenSpec::new(config.follow_duration, Easing::CubicOut),
        );
        tweens.animate_to(
            ring,
            &[(Property::Scale, config.ring_scale), (Property::Opacity, config.ring_opacity)],
            TweenSpec::new(config.ring_duration, Easing::QuadOut),
        );
        Some(offset)
    }

    /// Pointer left `id`. Springs it back to rest and restores the ring.
    /// Returns the requested offset (always the rest offset).
    pub fn hover_leave(&mut self, id: ElementId, tweens: &mut dyn Tweener) -> Option<Vec2> {
        let config = self.config;
        let ring = self.ring;
        let element = self.elements.iter_mut().find(|e| e.id == id)?;

        element.offset = element.rest;
        element.hovered = false;
        let rest = element.rest;

        tweens.animate_to(
            id,
            &[(Property::X, rest.x), (Property::Y, rest.y)],
            TweenSpec::new(config.return_duration, Easing::ElasticOut),
        );
        tweens.animate_to(
            ring,
            &[(Property::Scale, 1.0), (Property::Opacity, 1.0)],
            TweenSpec::new(config.ring_duration, Easing::QuadOut),
        );
        Some(rest)
    }

    pub fn get(&self, id: ElementId) -> Option<&MagneticElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn is_magnetic(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Swaps the follower's skin while the pointer is over any hover trigger.
///
/// Boolean, not a counter: entering twice then leaving once returns to the
/// default skin, and repeated enters or leaves change nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverSkinToggle {
    ring: ElementId,
    dot: ElementId,
    skin: HoverSkin,
}

impl HoverSkinToggle {
    pub fn new(ring: ElementId, dot: ElementId) -> Self {
        Self {
            ring,
            dot,
            skin: HoverSkin::Default,
        }
    }

    /// Returns true if the skin changed.
    pub fn enter(&mut self, elements: &mut ElementStore) -> bool {
        self.apply(HoverSkin::HoverActive, elements)
    }

    /// Returns true if the skin changed.
    pub fn leave(&mut self, elements: &mut ElementStore) -> bool {
        self.apply(HoverSkin::Default, elements)
    }

    fn apply(&mut self, skin: HoverSkin, elements: &mut ElementStore) -> bool {
        let changed = self.skin != skin;
        self.skin = skin;
        // Written every time so a stale element state is corrected
        if let Some(ring) = elements.get_mut(self.ring) {
            ring.skin = skin;
        }
        if let Some(dot) = elements.get_mut(self.dot) {
            dot.hidden = skin == HoverSkin::HoverActive;
        }
        changed
    }

    pub fn skin(&self) -> HoverSkin {
        self.skin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::elements::Element;
    use crate::core::rng::Rng;
    use crate::extensions::timeline::Timeline;
    use crate::extensions::tween::{TimelineId, TweenId};

    /// Records every request instead of animating.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(ElementId, Vec<(Property, f32)>, TweenSpec)>,
    }

    impl Recorder {
        fn last_for(&self, id: ElementId, property: Property) -> Option<f32> {
            self.calls
                .iter()
                .rev()
                .filter(|(e, _, _)| *e == id)
                .find_map(|(_, props, _)| props.iter().find(|(p, _)| *p == property).map(|(_, v)| *v))
        }
    }

    impl Tweener for Recorder {
        fn set_immediate(&mut self, _target: ElementId, _props: &[(Property, f32)]) {}

        fn animate_to(&mut self, target: ElementId, props: &[(Property, f32)], spec: TweenSpec) -> TweenId {
            self.calls.push((target, props.to_vec(), spec));
            TweenId(self.calls.len() as u32)
        }

        fn play(&mut self, _timeline: Timeline) -> TimelineId {
            TimelineId(0)
        }
    }

    const BUTTON: ElementId = ElementId(1);
    const RING: ElementId = ElementId(2);
    const DOT: ElementId = ElementId(3);

    fn button_rect() -> Rect {
        Rect::new(100.0, 100.0, 100.0, 40.0)
    }

    #[test]
    fn attraction_is_fraction_of_distance() {
        let offset = attraction(Vec2::new(200.0, 120.0), button_rect(), 0.3);
        assert!((offset.x - 15.0).abs() < 1e-5);
        assert!(offset.y.abs() < 1e-5);
    }

    #[test]
    fn hover_pulls_partway_and_grows_ring() {
        let mut rec = Recorder::default();
        let mut mc = MagneticController::new(&[BUTTON], RING, MagneticConfig::default());
        let offset = mc.hover_move(BUTTON, Vec2::new(190.0, 140.0), button_rect(), &mut rec).unwrap();
        assert!((offset - Vec2::new(12.0, 6.0)).length() < 1e-5);
        assert_eq!(rec.last_for(RING, Property::Scale), Some(1.5));
        assert_eq!(rec.last_for(RING, Property::Opacity), Some(0.5));
        assert!(mc.get(BUTTON).unwrap().hovered);
    }

    #[test]
    fn leave_requests_exact_rest_with_elastic_return() {
        let mut rec = Recorder::default();
        let mut mc = MagneticController::new(&[BUTTON], RING, MagneticConfig::default());
        mc.hover_move(BUTTON, Vec2::new(500.0, -300.0), button_rect(), &mut rec);
        assert_eq!(mc.hover_leave(BUTTON, &mut rec), Some(Vec2::ZERO));
        let (_, props, spec) = rec.calls.iter().rev().find(|(e, _, _)| *e == BUTTON).unwrap();
        assert_eq!(props, &vec![(Property::X, 0.0), (Property::Y, 0.0)]);
        assert_eq!(spec.easing, Easing::ElasticOut);
        assert!(spec.duration > MagneticConfig::default().follow_duration);
        assert_eq!(rec.last_for(RING, Property::Scale), Some(1.0));
        assert_eq!(rec.last_for(RING, Property::Opacity), Some(1.0));
    }

    #[test]
    fn random_hover_sessions_always_end_at_rest() {
        let mut rng = Rng::new(1234);
        for _ in 0..100 {
            let mut rec = Recorder::default();
            let mut mc = MagneticController::new(&[BUTTON], RING, MagneticConfig::default());
            for _ in 0..rng.range_inclusive(1, 40) {
                match rng.next_int(3) {
                    0 | 1 => {
                        let p = Vec2::new(rng.centered(800.0), rng.centered(800.0));
                        mc.hover_move(BUTTON, p, button_rect(), &mut rec);
                    }
                    _ => {
                        mc.hover_leave(BUTTON, &mut rec);
                    }
                }
            }
            mc.hover_leave(BUTTON, &mut rec);
            assert_eq!(mc.get(BUTTON).unwrap().offset, Vec2::ZERO);
            assert_eq!(rec.last_for(BUTTON, Property::X), Some(0.0));
            assert_eq!(rec.last_for(BUTTON, Property::Y), Some(0.0));
        }
    }

    #[test]
    fn unknown_element_is_ignored() {
        let mut rec = Recorder::default();
        let mut mc = MagneticController::new(&[BUTTON], RING, MagneticConfig::default());
        assert!(mc.hover_move(ElementId(99), Vec2::ZERO, button_rect(), &mut rec).is_none());
        assert!(mc.hover_leave(ElementId(99), &mut rec).is_none());
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn skin_toggle_is_idempotent() {
        let mut store = ElementStore::new();
        store.insert(Element::new(RING));
        store.insert(Element::new(DOT));
        let mut toggle = HoverSkinToggle::new(RING, DOT);

        assert!(toggle.enter(&mut store));
        assert!(!toggle.enter(&mut store));
        assert_eq!(store.get(RING).unwrap().skin, HoverSkin::HoverActive);
        assert!(store.get(DOT).unwrap().hidden);

        assert!(toggle.leave(&mut store));
        assert!(!toggle.leave(&mut store));
        assert_eq!(store.get(RING).unwrap().skin, HoverSkin::Default);
        assert!(!store.get(DOT).unwrap().hidden);
    }
}
