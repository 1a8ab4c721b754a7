//! Frame output: deduplicated writes plus semantic events.

use serde::{Deserialize, Serialize};

use scrollcue_api_core::WriteBatch;

use crate::ids::{RegId, ScopeId};
use crate::replay::ReplayState;
use crate::trigger::TriggerEdge;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum OrchestratorEvent {
    ScopeOpened {
        scope: ScopeId,
        label: String,
    },
    ScopeDisposed {
        scope: ScopeId,
        registrations: usize,
        cancelled: usize,
    },
    TriggerEdge {
        registration: RegId,
        edge: TriggerEdge,
    },
    StateChanged {
        registration: RegId,
        from: ReplayState,
        to: ReplayState,
    },
}

impl OrchestratorEvent {
    /// Registration this event is about, if any.
    pub fn registration(&self) -> Option<RegId> {
        match self {
            OrchestratorEvent::TriggerEdge { registration, .. }
            | OrchestratorEvent::StateChanged { registration, .. } => Some(*registration),
            _ => None,
        }
    }
}

/// Everything the host needs to apply for one tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub epoch: u64,
    pub dt: f32,
    /// At most one write per path; first-write order, last value.
    pub writes: WriteBatch,
    pub events: Vec<OrchestratorEvent>,
}
