//! Animation defaults applied when a descriptor leaves timing unspecified.

use serde::{Deserialize, Serialize};

use crate::ease::{Curve, EaseKind, Easing};

/// Fallback timing for descriptors and timelines.
/// Keep this minimal; timelines layer their own defaults on top.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDefaults {
    /// Easing used when neither the descriptor nor its timeline names one.
    pub ease: Easing,
    /// Duration in seconds used when the descriptor has none.
    pub duration: f32,
}

impl Default for AnimationDefaults {
    fn default() -> Self {
        Self {
            ease: Easing::Curve {
                curve: Curve::Power(1),
                kind: EaseKind::Out,
            },
            duration: 0.5,
        }
    }
}

impl AnimationDefaults {
    /// Layer optional overrides on top of these defaults.
    pub fn overlay(&self, ease: Option<Easing>, duration: Option<f32>) -> Self {
        Self {
            ease: ease.unwrap_or(self.ease),
            duration: duration.unwrap_or(self.duration),
        }
    }
}
