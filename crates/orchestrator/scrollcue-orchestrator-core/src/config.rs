//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

use scrollcue_animation_core::AnimationDefaults;

use crate::error::OrchestratorError;
use crate::replay::ReplayPolicy;
use crate::tilt::TiltConfig;

/// Engine-wide defaults. Every field has a default, so `{}` is a valid
/// configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timing applied to descriptors that leave duration or easing unset.
    pub animation: AnimationDefaults,
    pub tilt: TiltConfig,
    /// Smoothing lag (seconds) for scrubbed registrations that do not set
    /// their own. Zero applies scroll progress directly.
    pub default_scrub_lag: f32,
    /// Policy for discrete registrations that do not name one.
    pub default_policy: ReplayPolicy,
    /// Events past this count in a single frame are dropped.
    pub max_events_per_frame: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            animation: AnimationDefaults::default(),
            tilt: TiltConfig::default(),
            default_scrub_lag: 0.0,
            default_policy: ReplayPolicy::PlayAndReverse,
            max_events_per_frame: 1024,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, OrchestratorError> {
        let cfg: Config =
            serde_json::from_str(json).map_err(|e| OrchestratorError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if !self.default_scrub_lag.is_finite() || self.default_scrub_lag < 0.0 {
            return Err(OrchestratorError::Config(format!(
                "default_scrub_lag must be a non-negative number, got {}",
                self.default_scrub_lag
            )));
        }
        if !self.animation.duration.is_finite() || self.animation.duration < 0.0 {
            return Err(OrchestratorError::Config(format!(
                "animation.duration must be a non-negative number, got {}",
                self.animation.duration
            )));
        }
        let t = &self.tilt;
        if [t.sensitivity, t.max_rotation, t.move_duration, t.leave_duration]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(OrchestratorError::Config(
                "tilt values must be non-negative numbers".to_string(),
            ));
        }
        Ok(())
    }
}
