//! Ease-in shapes for each curve family. Out and in-out variants are derived
//! from these by reflection in `Easing::apply`.

use std::f32::consts::{FRAC_PI_2, PI};

pub(crate) const BACK_OVERSHOOT: f32 = 1.70158;
pub(crate) const ELASTIC_AMPLITUDE: f32 = 1.0;
pub(crate) const ELASTIC_PERIOD: f32 = 0.3;

#[inline]
pub(crate) fn power_in(t: f32, power: u8) -> f32 {
    t.powi(i32::from(power) + 1)
}

#[inline]
pub(crate) fn sine_in(t: f32) -> f32 {
    1.0 - (t * FRAC_PI_2).cos()
}

#[inline]
pub(crate) fn expo_in(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else {
        2f32.powf(10.0 * (t - 1.0))
    }
}

#[inline]
pub(crate) fn circ_in(t: f32) -> f32 {
    1.0 - (1.0 - t * t).max(0.0).sqrt()
}

#[inline]
pub(crate) fn back_in(t: f32, overshoot: f32) -> f32 {
    t * t * ((overshoot + 1.0) * t - overshoot)
}

/// Elastic is specified on its out side; amplitude below 1 is treated as 1.
#[inline]
pub(crate) fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let a = amplitude.max(1.0);
    let p = if period > 0.0 { period } else { ELASTIC_PERIOD };
    let s = p / (2.0 * PI) * (1.0 / a).asin();
    a * 2f32.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / p).sin() + 1.0
}

#[inline]
pub(crate) fn elastic_in(t: f32, amplitude: f32, period: f32) -> f32 {
    1.0 - elastic_out(1.0 - t, amplitude, period)
}

#[inline]
pub(crate) fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

#[inline]
pub(crate) fn bounce_in(t: f32) -> f32 {
    1.0 - bounce_out(1.0 - t)
}
