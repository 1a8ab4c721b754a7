//! scrollcue animation core (host-agnostic)
//!
//! Declarative animation descriptions and the math that turns them into
//! property writes:
//! - [`Easing`]: named interpolation curves (`"power3.out"`, `"elastic.out(1, 0.5)"`)
//! - [`AnimationDescriptor`]: immutable targets + property deltas + timing + stagger
//! - [`Timeline`]: ordered descriptors with relative start positions
//! - [`RunnableAnimation`]: a descriptor or timeline resolved against concrete
//!   targets, sampled at a time or a progress value
//! - [`Playback`]: forward/reverse playhead over a runnable
//!
//! Nothing here knows about scroll positions; the orchestrator crate decides
//! when and in which direction runnables play.

pub mod config;
pub mod descriptor;
pub mod ease;
pub mod error;
pub mod index_rule;
pub mod motion;
pub mod playback;
pub mod runnable;
pub mod target;
pub mod timeline;

pub use config::AnimationDefaults;
pub use descriptor::{AnimationDescriptor, DescriptorBuilder, PropValue, PropertyDelta, Stagger};
pub use ease::{Curve, EaseKind, Easing};
pub use error::AnimationError;
pub use index_rule::{IndexFn, IndexRule};
pub use motion::Motion;
pub use playback::{Direction, Playback, PlaybackStatus};
pub use runnable::{RunnableAnimation, Tween};
pub use target::TargetSource;
pub use timeline::{Position, Timeline, TimelineDefaults, TimelineStep};
pub use scrollcue_api_core::{PropPath, Value, ValueKind, WriteBatch, WriteOp};

/// Animation core result type
pub type Result<T> = core::result::Result<T, AnimationError>;
