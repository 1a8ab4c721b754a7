//! Orchestrator error type.

use scrollcue_animation_core::AnimationError;
use thiserror::Error;

use crate::ids::{RegId, ScopeId};

/// Configuration and lookup errors. Runtime degradation (missing elements,
/// zero-height triggers) is logged, never returned.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum OrchestratorError {
    #[error("unknown or disposed scope {0}")]
    UnknownScope(ScopeId),

    #[error("unknown or disposed registration {0}")]
    UnknownRegistration(RegId),

    #[error("cannot parse threshold '{input}': {reason}")]
    ThresholdParse { input: String, reason: String },

    #[error("threshold start '{start}' resolves after end '{end}': {reason}")]
    InvalidThreshold {
        start: String,
        end: String,
        reason: String,
    },

    #[error("{drive} registrations need a trigger element")]
    MissingTrigger { drive: &'static str },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Animation(#[from] AnimationError),
}

impl OrchestratorError {
    pub fn category(&self) -> &'static str {
        match self {
            OrchestratorError::UnknownScope(_) | OrchestratorError::UnknownRegistration(_) => {
                "lookup"
            }
            OrchestratorError::ThresholdParse { .. }
            | OrchestratorError::InvalidThreshold { .. }
            | OrchestratorError::MissingTrigger { .. } => "trigger",
            OrchestratorError::Config(_) => "config",
            OrchestratorError::Animation(e) => e.category(),
        }
    }
}
