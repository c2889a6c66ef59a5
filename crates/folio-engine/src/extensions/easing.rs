// extensions/easing.rs
//
// The easing curves the page choreography uses.
// Timeline `powerN` curves are polynomials of degree N+1: `power2.out` is
// `CubicOut`, `power4.inOut` is `QuintInOut`.

use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// `power1.out`: ring scale and fade on magnetic hover.
    QuadOut,
    /// `power2.in`: the counter leaving.
    CubicIn,
    /// `power2.out`: magnetic pull, hero subtitle.
    CubicOut,
    /// `power3.out`: small hero line, scroll reveals.
    QuartOut,
    /// `power4.out`: large hero lines.
    QuintOut,
    /// `power4.inOut`: the preloader curtain.
    QuintInOut,
    /// `elastic.out(1, 0.3)`: magnetic release.
    ElasticOut,
}

impl Easing {
    /// Map normalized time in [0, 1] through the curve. Input outside the
    /// range is clamped; `ElasticOut` overshoots 1 on the way.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => power_out(t, 2),
            Easing::CubicIn => t.powi(3),
            Easing::CubicOut => power_out(t, 3),
            Easing::QuartOut => power_out(t, 4),
            Easing::QuintOut => power_out(t, 5),
            Easing::QuintInOut => power_in_out(t, 5),
            Easing::ElasticOut => elastic_out(t, 0.3),
        }
    }
}

#[inline]
fn power_out(t: f32, degree: i32) -> f32 {
    1.0 - (1.0 - t).powi(degree)
}

#[inline]
fn power_in_out(t: f32, degree: i32) -> f32 {
    if t < 0.5 {
        (2.0 * t).powi(degree) / 2.0
    } else {
        1.0 - (2.0 - 2.0 * t).powi(degree) / 2.0
    }
}

/// Amplitude-1 elastic release with the given period.
#[inline]
fn elastic_out(t: f32, period: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }
    let phase = period / 4.0;
    2.0_f32.powf(-10.0 * t) * ((t - phase) * TAU / period).sin() + 1.0
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate `a..b` with the eased fraction of `t`.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}
