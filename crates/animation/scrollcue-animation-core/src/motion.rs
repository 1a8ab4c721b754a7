//! A registration's animation payload: a single descriptor or a timeline.

use serde::{Deserialize, Serialize};

use crate::config::AnimationDefaults;
use crate::descriptor::AnimationDescriptor;
use crate::error::AnimationError;
use crate::runnable::RunnableAnimation;
use crate::target::{select_all, TargetSource};
use crate::timeline::Timeline;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    Tween(AnimationDescriptor),
    Timeline(Timeline),
}

impl Motion {
    pub fn validate(&self) -> Result<(), AnimationError> {
        match self {
            Motion::Tween(d) => d.validate(),
            Motion::Timeline(t) => t.validate(),
        }
    }

    /// Resolve selectors through `source` and build the runnable.
    pub fn resolve(&self, source: &dyn TargetSource, defaults: &AnimationDefaults) -> RunnableAnimation {
        match self {
            Motion::Tween(d) => {
                let targets = select_all(source, d.targets());
                d.resolve(&targets, source, defaults)
            }
            Motion::Timeline(t) => t.resolve(source, defaults),
        }
    }
}

impl From<AnimationDescriptor> for Motion {
    fn from(d: AnimationDescriptor) -> Self {
        Motion::Tween(d)
    }
}

impl From<Timeline> for Motion {
    fn from(t: Timeline) -> Self {
        Motion::Timeline(t)
    }
}
