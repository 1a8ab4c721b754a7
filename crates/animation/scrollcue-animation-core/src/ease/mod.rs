//! Easing curves addressed by name.
//!
//! Accepted names (case-insensitive):
//! - `none`, `linear`, `power0`
//! - `power1`..`power4`, aliases `quad`, `cubic`, `quart`, `quint`/`strong`
//! - `sine`, `expo`, `circ`, `bounce`
//! - `back(overshoot)`, `elastic(amplitude, period)`
//! - `cubic-bezier(x1, y1, x2, y2)` and the CSS keywords `ease`, `ease-in`,
//!   `ease-out`, `ease-in-out`
//!
//! Families take a `.in`, `.out` or `.inOut` suffix (`-` works as separator
//! too, so `cubic-out` == `cubic.out`); a bare family defaults to `.out`.

mod curves;
pub mod functions;

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AnimationError;
use functions::bezier_ease_t;

/// Which side of the curve carries the shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EaseKind {
    In,
    Out,
    InOut,
}

/// Curve family. The shape is defined on the ease-in side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    /// `t^(power + 1)`; power 1 is quadratic, power 4 quintic.
    Power(u8),
    Sine,
    Expo,
    Circ,
    Back(f32),
    Elastic { amplitude: f32, period: f32 },
    Bounce,
}

impl Curve {
    #[inline]
    fn ease_in(&self, t: f32) -> f32 {
        match *self {
            Curve::Power(p) => curves::power_in(t, p),
            Curve::Sine => curves::sine_in(t),
            Curve::Expo => curves::expo_in(t),
            Curve::Circ => curves::circ_in(t),
            Curve::Back(overshoot) => curves::back_in(t, overshoot),
            Curve::Elastic { amplitude, period } => curves::elastic_in(t, amplitude, period),
            Curve::Bounce => curves::bounce_in(t),
        }
    }
}

/// A named interpolation curve mapping linear progress to eased progress.
///
/// Every curve maps 0 to 0 and 1 to 1; back and elastic may leave [0, 1] in
/// between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    Curve { curve: Curve, kind: EaseKind },
    CubicBezier([f32; 4]),
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Linear
    }
}

impl Easing {
    /// Shorthand for `Easing::Curve { curve, kind: EaseKind::Out }`.
    pub const fn out(curve: Curve) -> Self {
        Easing::Curve {
            curve,
            kind: EaseKind::Out,
        }
    }

    /// Eased progress for linear progress `t`. Input is clamped to [0, 1].
    pub fn apply(&self, t: f32) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::CubicBezier([x1, y1, x2, y2]) => bezier_ease_t(t, *x1, *y1, *x2, *y2),
            Easing::Curve { curve, kind } => match kind {
                EaseKind::In => curve.ease_in(t),
                EaseKind::Out => 1.0 - curve.ease_in(1.0 - t),
                EaseKind::InOut => {
                    if t < 0.5 {
                        0.5 * curve.ease_in(2.0 * t)
                    } else {
                        1.0 - 0.5 * curve.ease_in(2.0 * (1.0 - t))
                    }
                }
            },
        }
    }

    /// Parse an easing name; see the module docs for the grammar.
    pub fn parse(input: &str) -> Result<Self, AnimationError> {
        let lower = input.trim().to_ascii_lowercase();
        let unknown = || AnimationError::UnknownEasing {
            name: input.to_string(),
        };

        match lower.as_str() {
            "none" | "linear" | "power0" => return Ok(Easing::Linear),
            "ease" => return Ok(Easing::CubicBezier([0.25, 0.1, 0.25, 1.0])),
            "ease-in" => return Ok(Easing::CubicBezier([0.42, 0.0, 1.0, 1.0])),
            "ease-out" => return Ok(Easing::CubicBezier([0.0, 0.0, 0.58, 1.0])),
            "ease-in-out" => return Ok(Easing::CubicBezier([0.42, 0.0, 0.58, 1.0])),
            _ => {}
        }

        let (head, params) = split_params(&lower, input)?;
        let bad_params = |reason: &str| AnimationError::InvalidEasingParams {
            name: input.to_string(),
            reason: reason.to_string(),
        };

        if head == "cubic-bezier" {
            return match params.as_slice() {
                [x1, y1, x2, y2] => Ok(Easing::CubicBezier([*x1, *y1, *x2, *y2])),
                _ => Err(bad_params("cubic-bezier expects 4 control values")),
            };
        }

        let (family, kind) = match head.find(|c: char| c == '.' || c == '-') {
            Some(idx) => (&head[..idx], &head[idx + 1..]),
            None => (head, "out"),
        };
        let kind = match kind {
            "in" => EaseKind::In,
            "out" => EaseKind::Out,
            "inout" | "in-out" => EaseKind::InOut,
            _ => return Err(unknown()),
        };

        let no_params = |curve: Curve| {
            if params.is_empty() {
                Ok(Easing::Curve { curve, kind })
            } else {
                Err(bad_params("this curve takes no parameters"))
            }
        };

        match family {
            "none" | "linear" | "power0" => {
                if params.is_empty() {
                    Ok(Easing::Linear)
                } else {
                    Err(bad_params("linear takes no parameters"))
                }
            }
            "power1" | "quad" => no_params(Curve::Power(1)),
            "power2" | "cubic" => no_params(Curve::Power(2)),
            "power3" | "quart" => no_params(Curve::Power(3)),
            "power4" | "quint" | "strong" => no_params(Curve::Power(4)),
            "sine" => no_params(Curve::Sine),
            "expo" => no_params(Curve::Expo),
            "circ" => no_params(Curve::Circ),
            "bounce" => no_params(Curve::Bounce),
            "back" => match params.as_slice() {
                [] => Ok(Easing::Curve {
                    curve: Curve::Back(curves::BACK_OVERSHOOT),
                    kind,
                }),
                [overshoot] => Ok(Easing::Curve {
                    curve: Curve::Back(*overshoot),
                    kind,
                }),
                _ => Err(bad_params("back takes at most one overshoot value")),
            },
            "elastic" => {
                let (amplitude, period) = match params.as_slice() {
                    [] => (curves::ELASTIC_AMPLITUDE, curves::ELASTIC_PERIOD),
                    [a] => (*a, curves::ELASTIC_PERIOD),
                    [a, p] => (*a, *p),
                    _ => return Err(bad_params("elastic takes amplitude and period")),
                };
                if period <= 0.0 {
                    return Err(bad_params("elastic period must be positive"));
                }
                Ok(Easing::Curve {
                    curve: Curve::Elastic { amplitude, period },
                    kind,
                })
            }
            _ => Err(unknown()),
        }
    }
}

/// Split `name(a, b)` into `("name", [a, b])`.
fn split_params<'a>(lower: &'a str, original: &str) -> Result<(&'a str, Vec<f32>), AnimationError> {
    let Some(open) = lower.find('(') else {
        return Ok((lower, Vec::new()));
    };
    let bad = |reason: &str| AnimationError::InvalidEasingParams {
        name: original.to_string(),
        reason: reason.to_string(),
    };
    if !lower.ends_with(')') {
        return Err(bad("missing closing parenthesis"));
    }
    let inner = &lower[open + 1..lower.len() - 1];
    let mut params = Vec::new();
    for raw in inner.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let v: f32 = raw.parse().map_err(|_| bad("parameters must be numbers"))?;
        params.push(v);
    }
    Ok((lower[..open].trim(), params))
}

impl fmt::Display for EaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EaseKind::In => "in",
            EaseKind::Out => "out",
            EaseKind::InOut => "inOut",
        })
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("none"),
            Easing::CubicBezier([x1, y1, x2, y2]) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            Easing::Curve { curve, kind } => match curve {
                Curve::Power(p) => write!(f, "power{p}.{kind}"),
                Curve::Sine => write!(f, "sine.{kind}"),
                Curve::Expo => write!(f, "expo.{kind}"),
                Curve::Circ => write!(f, "circ.{kind}"),
                Curve::Bounce => write!(f, "bounce.{kind}"),
                Curve::Back(o) => write!(f, "back.{kind}({o})"),
                Curve::Elastic { amplitude, period } => {
                    write!(f, "elastic.{kind}({amplitude}, {period})")
                }
            },
        }
    }
}

impl FromStr for Easing {
    type Err = AnimationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::parse(s)
    }
}

// Serde support: serialize as the canonical name, deserialize through `parse`
impl Serialize for Easing {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Easing {
    fn deserialize<D>(deserializer: D) -> Result<Easing, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Easing::parse(&s).map_err(de::Error::custom)
    }
}
