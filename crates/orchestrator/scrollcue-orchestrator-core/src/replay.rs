//! Replay policies and the per-registration replay state machine.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::trigger::TriggerEdge;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayState {
    #[default]
    Idle,
    Playing,
    Completed,
    Reversing,
}

impl ReplayState {
    /// A run is in flight and would be cancelled by disposal.
    pub fn is_running(self) -> bool {
        matches!(self, ReplayState::Playing | ReplayState::Reversing)
    }
}

/// What to do on a repeated crossing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReplayPolicy {
    /// Play forward on the first enter; ignore everything after.
    #[default]
    PlayOnce,
    /// Play on enter, reverse to the start state on leave-back, play again on
    /// the next enter.
    PlayAndReverse,
    /// No discrete state: the animation is a pure function of scroll progress.
    ScrubLinked,
}

/// Playhead instruction produced by a policy transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayCommand {
    /// Rewind and play forward.
    PlayFromStart,
    /// Resume forward from the current playhead.
    PlayForward,
    /// Play backward from the current playhead.
    Reverse,
}

impl ReplayPolicy {
    pub const fn name(self) -> &'static str {
        match self {
            ReplayPolicy::PlayOnce => "play-once",
            ReplayPolicy::PlayAndReverse => "play-and-reverse",
            ReplayPolicy::ScrubLinked => "scrub-linked",
        }
    }

    /// Parse a policy name or a four-slot toggle action string
    /// (`"play none none reverse"`). Never fails: anything unrecognized is
    /// play-once.
    pub fn parse_lenient(input: &str) -> Self {
        let norm = input.trim().to_ascii_lowercase().replace('_', "-");
        match norm.as_str() {
            "play-once" | "once" | "" => return ReplayPolicy::PlayOnce,
            "play-and-reverse" | "reverse" => return ReplayPolicy::PlayAndReverse,
            "scrub-linked" | "scrub" => return ReplayPolicy::ScrubLinked,
            _ => {}
        }
        let actions: Vec<&str> = norm.split_whitespace().collect();
        if let [on_enter, _on_leave, _on_enter_back, on_leave_back] = actions.as_slice() {
            let plays = matches!(*on_enter, "play" | "restart" | "resume");
            let rewinds = matches!(*on_leave_back, "reverse" | "reset" | "restart");
            if plays && rewinds {
                return ReplayPolicy::PlayAndReverse;
            }
            if plays {
                return ReplayPolicy::PlayOnce;
            }
        }
        log::warn!("unrecognized replay policy '{input}', using play-once");
        ReplayPolicy::PlayOnce
    }

    /// Transition for a discrete `edge` in `state`; `None` means no change.
    pub fn react(self, state: ReplayState, edge: TriggerEdge) -> Option<(ReplayState, PlayCommand)> {
        use ReplayState::*;
        match (self, state, edge) {
            (ReplayPolicy::ScrubLinked, _, _) => None,
            (_, Idle, TriggerEdge::Enter) => Some((Playing, PlayCommand::PlayFromStart)),
            (ReplayPolicy::PlayAndReverse, Reversing, TriggerEdge::Enter) => {
                Some((Playing, PlayCommand::PlayForward))
            }
            (ReplayPolicy::PlayAndReverse, Playing | Completed, TriggerEdge::LeaveBack) => {
                Some((Reversing, PlayCommand::Reverse))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ReplayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for ReplayPolicy {
    fn from(s: &str) -> Self {
        ReplayPolicy::parse_lenient(s)
    }
}

impl Serialize for ReplayPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ReplayPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ReplayPolicy::parse_lenient(&s))
    }
}
