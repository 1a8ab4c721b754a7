//! Error types for animation construction.

/// Configuration errors raised while building descriptors, timelines and easings.
///
/// Sampling and playback never fail; only construction does.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnimationError {
    /// Easing name not recognized
    #[error("Unknown easing: {name}")]
    UnknownEasing { name: String },

    /// Easing recognized but its parameter list is malformed
    #[error("Invalid easing parameters for {name}: {reason}")]
    InvalidEasingParams { name: String, reason: String },

    /// Duration negative or not finite
    #[error("Invalid duration: {value}")]
    InvalidDuration { value: f32 },

    /// Delay negative or not finite
    #[error("Invalid delay: {value}")]
    InvalidDelay { value: f32 },

    /// Stagger increment not finite
    #[error("Invalid stagger increment: {value}")]
    InvalidStagger { value: f32 },

    /// Descriptor without any property delta
    #[error("Animation has no properties")]
    EmptyProperties,

    /// Descriptor without any target selector
    #[error("Animation has no target selectors")]
    NoTargets,

    /// Timeline position string could not be parsed
    #[error("Invalid timeline position '{input}'")]
    InvalidPosition { input: String },
}

impl AnimationError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownEasing { .. } | Self::InvalidEasingParams { .. } => "easing",
            Self::InvalidDuration { .. }
            | Self::InvalidDelay { .. }
            | Self::InvalidStagger { .. } => "timing",
            Self::EmptyProperties | Self::NoTargets => "descriptor",
            Self::InvalidPosition { .. } => "timeline",
        }
    }
}
