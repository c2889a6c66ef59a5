//! Entrance choreography played when loading reaches 100.

use crate::core::elements::{ElementStore, Property, Role};
use crate::extensions::easing::Easing;
use crate::extensions::timeline::{Position, Timeline};

/// Completion event of the entrance timeline.
pub const ENTRANCE_COMPLETE_EVENT: u32 = 1;

/// Push the hero text into its hidden starting pose.
pub fn prime_entrance(elements: &mut ElementStore) {
    for element in elements.iter_mut() {
        if element.has_role(Role::HeroSmall) {
            element.transform.set(Property::YPercent, 100.0);
        }
        if element.has_role(Role::HeroLarge) {
            element.transform.set(Property::YPercent, 110.0);
        }
        if element.has_role(Role::HeroSub) {
            element.transform.set(Property::Opacity, 0.0);
        }
    }
}

/// Counter out, preloader up, hero text in. Missing elements leave their
/// step empty; the timing of the rest is unchanged.
pub fn entrance_timeline(elements: &ElementStore) -> Timeline {
    let counter = elements.ids_with_role(Role::Counter);
    let preloader = elements.ids_with_role(Role::Preloader);
    let small = elements.ids_with_role(Role::HeroSmall);
    let large = elements.ids_with_role(Role::HeroLarge);
    let sub = elements.ids_with_role(Role::HeroSub);

    Timeline::new()
        .to(
            &counter,
            &[(Property::Y, -50.0), (Property::Opacity, 0.0)],
            0.5,
            Easing::CubicIn,
            Position::End,
        )
        .to(
            &preloader,
            &[(Property::YPercent, -100.0)],
            1.2,
            Easing::QuintInOut,
            Position::End,
        )
        .to(
            &small,
            &[(Property::YPercent, 0.0)],
            1.0,
            Easing::QuartOut,
            Position::Relative(-0.5),
        )
        .to_staggered(
            &large,
            &[(Property::YPercent, 0.0)],
            1.5,
            Easing::QuintOut,
            0.1,
            Position::Relative(-0.8),
        )
        .to(
            &sub,
            &[(Property::Opacity, 1.0)],
            1.0,
            Easing::CubicOut,
            Position::Relative(-0.5),
        )
        .on_complete(ENTRANCE_COMPLETE_EVENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ElementId;
    use crate::core::elements::Element;

    fn page() -> ElementStore {
        let mut s = ElementStore::new();
        s.insert(Element::new(ElementId(0)).with_role(Role::Counter));
        s.insert(Element::new(ElementId(1)).with_role(Role::Preloader));
        s.insert(Element::new(ElementId(2)).with_role(Role::HeroSmall));
        s.insert(Element::new(ElementId(3)).with_role(Role::HeroLarge));
        s.insert(Element::new(ElementId(4)).with_role(Role::HeroLarge));
        s.insert(Element::new(ElementId(5)).with_role(Role::HeroSub));
        s
    }

    #[test]
    fn prime_sets_starting_pose() {
        let mut s = page();
        prime_entrance(&mut s);
        assert_eq!(s.get(ElementId(2)).unwrap().transform.y_percent, 100.0);
        assert_eq!(s.get(ElementId(4)).unwrap().transform.y_percent, 110.0);
        assert_eq!(s.get(ElementId(5)).unwrap().transform.opacity, 0.0);
        assert_eq!(s.get(ElementId(0)).unwrap().transform.opacity, 1.0);
    }

    #[test]
    fn steps_overlap_as_choreographed() {
        let tl = entrance_timeline(&page());
        let starts: Vec<f32> = tl.steps().iter().map(|s| s.start).collect();
        // 0, 0.5, 1.7 - 0.5, 2.2 - 0.8, then 1.4 + 1.5 + 0.1 - 0.5
        let expected = [0.0, 0.5, 1.2, 1.4, 2.5];
        for (got, want) in starts.iter().zip(expected) {
            assert!((got - want).abs() < 1e-5, "{} vs {}", got, want);
        }
        assert!((tl.duration() - 3.5).abs() < 1e-5);
        assert_eq!(tl.completion_event(), Some(ENTRANCE_COMPLETE_EVENT));
    }

    #[test]
    fn empty_page_keeps_timing() {
        let tl = entrance_timeline(&ElementStore::new());
        assert_eq!(tl.steps().len(), 5);
        // No stagger tail without hero lines
        assert!((tl.duration() - 3.4).abs() < 1e-5);
    }
}
