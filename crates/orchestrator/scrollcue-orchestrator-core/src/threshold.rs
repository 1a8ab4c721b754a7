//! Trigger thresholds: `"<element anchor> <viewport anchor>"`.
//!
//! An anchor is `top` (0), `center` (0.5), `bottom` (1), a percentage
//! (`80%`) or a pixel count (`120`), optionally followed by a pixel offset
//! (`top+=100`, `bottom-=20`). `"top 80%"` reads as "when the element's top
//! reaches 80% down the viewport".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::OrchestratorError;
use crate::geometry::Rect;

/// A point along an element or the viewport: `fraction` of its height plus a
/// pixel `offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub fraction: f32,
    pub offset: f32,
}

impl Anchor {
    pub const TOP: Anchor = Anchor::at(0.0);
    pub const CENTER: Anchor = Anchor::at(0.5);
    pub const BOTTOM: Anchor = Anchor::at(1.0);

    pub const fn at(fraction: f32) -> Self {
        Self {
            fraction,
            offset: 0.0,
        }
    }

    /// Absolute position along a span of `length` starting at `origin`.
    #[inline]
    pub fn along(&self, origin: f32, length: f32) -> f32 {
        origin + self.fraction * length + self.offset
    }

    fn parse(token: &str, whole: &str) -> Result<Self, OrchestratorError> {
        let err = |reason: &str| OrchestratorError::ThresholdParse {
            input: whole.to_string(),
            reason: reason.to_string(),
        };
        let (base, offset) = match token.find("+=").or_else(|| token.find("-=")) {
            Some(idx) => {
                let sign = if token[idx..].starts_with('-') { -1.0 } else { 1.0 };
                let px: f32 = token[idx + 2..]
                    .trim_end_matches("px")
                    .parse()
                    .map_err(|_| err("offset must be a number of pixels"))?;
                (&token[..idx], sign * px)
            }
            None => (token, 0.0),
        };
        let mut anchor = match base {
            "top" => Anchor::TOP,
            "center" => Anchor::CENTER,
            "bottom" => Anchor::BOTTOM,
            pct if pct.ends_with('%') => {
                let v: f32 = pct[..pct.len() - 1]
                    .parse()
                    .map_err(|_| err("percentage must be numeric"))?;
                Anchor::at(v / 100.0)
            }
            px => {
                let v: f32 = px
                    .trim_end_matches("px")
                    .parse()
                    .map_err(|_| err("unknown anchor keyword"))?;
                Anchor {
                    fraction: 0.0,
                    offset: v,
                }
            }
        };
        if !anchor.fraction.is_finite() || !offset.is_finite() {
            return Err(err("anchor must be finite"));
        }
        anchor.offset += offset;
        Ok(anchor)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fraction {
            x if x == 0.0 => f.write_str("top")?,
            x if x == 0.5 => f.write_str("center")?,
            x if x == 1.0 => f.write_str("bottom")?,
            x => write!(f, "{}%", (x * 100_000.0).round() / 1000.0)?,
        }
        if self.offset > 0.0 {
            write!(f, "+={}", self.offset)
        } else if self.offset < 0.0 {
            write!(f, "-={}", -self.offset)
        } else {
            Ok(())
        }
    }
}

/// Element anchor meets viewport anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threshold {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl Threshold {
    /// `"top bottom"`: the element's top enters the bottom of the viewport.
    pub const DEFAULT_START: Threshold = Threshold {
        element: Anchor::TOP,
        viewport: Anchor::BOTTOM,
    };
    /// `"bottom top"`: the element's bottom leaves the top of the viewport.
    pub const DEFAULT_END: Threshold = Threshold {
        element: Anchor::BOTTOM,
        viewport: Anchor::TOP,
    };

    pub fn parse(input: &str) -> Result<Self, OrchestratorError> {
        let lower = input.trim().to_ascii_lowercase();
        let mut parts = lower.split_whitespace();
        let (Some(el), Some(vp), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(OrchestratorError::ThresholdParse {
                input: input.to_string(),
                reason: "expected '<element anchor> <viewport anchor>'".to_string(),
            });
        };
        Ok(Self {
            element: Anchor::parse(el, input)?,
            viewport: Anchor::parse(vp, input)?,
        })
    }

    /// Scroll offset at which this threshold is met for `rect`.
    #[inline]
    pub fn scroll_position(&self, rect: &Rect, viewport_height: f32) -> f32 {
        self.element.along(rect.y, rect.height) - self.viewport.along(0.0, viewport_height)
    }

    /// True when `self` (as a start) lies after `end` for every element size
    /// and viewport size.
    pub fn statically_after(&self, end: &Threshold) -> bool {
        self.element.fraction > end.element.fraction
            && self.viewport.fraction < end.viewport.fraction
            && self.element.offset - self.viewport.offset >= end.element.offset - end.viewport.offset
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::DEFAULT_START
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

impl FromStr for Threshold {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Threshold::parse(s)
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Threshold::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parses_keywords_and_percentages() {
        let t = Threshold::parse("top 80%").unwrap();
        assert_eq!(t.element, Anchor::TOP);
        assert_abs_diff_eq!(t.viewport.fraction, 0.8, epsilon = 1e-6);

        let t = Threshold::parse("30% top").unwrap();
        assert_abs_diff_eq!(t.element.fraction, 0.3, epsilon = 1e-6);
        assert_eq!(t.viewport, Anchor::TOP);

        let t = Threshold::parse("Center CENTER").unwrap();
        assert_eq!(t.element, Anchor::CENTER);
        assert_eq!(t.viewport, Anchor::CENTER);
    }

    #[test]
    fn parses_pixel_offsets() {
        let t = Threshold::parse("top+=100 80%").unwrap();
        assert_eq!(t.element.fraction, 0.0);
        assert_eq!(t.element.offset, 100.0);
        let t = Threshold::parse("bottom-=20px 120").unwrap();
        assert_eq!(t.element.offset, -20.0);
        assert_eq!(t.viewport.offset, 120.0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Threshold::parse("top").is_err());
        assert!(Threshold::parse("top 80% extra").is_err());
        assert!(Threshold::parse("middle 50%").is_err());
        assert!(Threshold::parse("top+=x 50%").is_err());
    }

    #[test]
    fn scroll_position_formula() {
        let rect = Rect::new(0.0, 2000.0, 800.0, 600.0);
        let start = Threshold::parse("top 80%").unwrap();
        assert_abs_diff_eq!(start.scroll_position(&rect, 1000.0), 1200.0, epsilon = 1e-3);
        let end = Threshold::parse("30% top").unwrap();
        assert_abs_diff_eq!(end.scroll_position(&rect, 1000.0), 2180.0, epsilon = 1e-3);
        assert_abs_diff_eq!(
            Threshold::DEFAULT_END.scroll_position(&rect, 1000.0),
            2600.0,
            epsilon = 1e-3
        );
    }

    #[test]
    fn static_inversion() {
        let start = Threshold::parse("bottom top").unwrap();
        let end = Threshold::parse("top bottom").unwrap();
        assert!(start.statically_after(&end));
        assert!(!end.statically_after(&start));
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(Threshold::parse("top 80%").unwrap().to_string(), "top 80%");
        assert_eq!(
            Threshold::parse("top+=100 center").unwrap().to_string(),
            "top+=100 center"
        );
        assert_eq!(Threshold::DEFAULT_END.to_string(), "bottom top");
        assert_eq!(Threshold::parse("30% 120").unwrap().to_string(), "30% top+=120");
    }
}
