use crate::api::types::ElementId;
use crate::core::elements::Property;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{TweenId, TweenLoop, TweenSpec, Tweener};

/// Endless linear slide of the marquee strip. The strip holds two copies of
/// its content, so shifting by half its width loops seamlessly.
pub fn start_marquee(
    tweens: &mut dyn Tweener,
    marquee: ElementId,
    shift_percent: f32,
    period: f32,
) -> TweenId {
    tweens.animate_to(
        marquee,
        &[(Property::XPercent, shift_percent)],
        TweenSpec::new(period, Easing::Linear).with_loop(TweenLoop::Loop),
    )
}
