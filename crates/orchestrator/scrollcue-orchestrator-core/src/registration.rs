//! Registrations: one trigger bound to one motion, with its replay state.

use serde::{Deserialize, Serialize};

use scrollcue_animation_core::{AnimationDefaults, Motion, Playback, PlaybackStatus, RunnableAnimation};
use scrollcue_api_core::WriteBatch;

use crate::error::OrchestratorError;
use crate::events::OrchestratorEvent;
use crate::geometry::GeometryCache;
use crate::host::{ElementHost, ScopedSource};
use crate::ids::{RegId, ScopeId};
use crate::replay::{PlayCommand, ReplayPolicy, ReplayState};
use crate::trigger::{Drive, TriggerEdge, TriggerSpec, TriggerTrack};

const SCRUB_SNAP: f32 = 1e-4;

/// Declarative registration, usually deserialized from a section definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistrationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<TriggerSpec>,
    #[serde(default)]
    pub drive: Drive,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<ReplayPolicy>,
    pub motion: Motion,
}

impl RegistrationSpec {
    pub fn discrete(trigger: TriggerSpec, motion: impl Into<Motion>) -> Self {
        Self {
            trigger: Some(trigger),
            drive: Drive::Discrete,
            policy: None,
            motion: motion.into(),
        }
    }

    pub fn scrubbed(trigger: TriggerSpec, lag: Option<f32>, motion: impl Into<Motion>) -> Self {
        Self {
            trigger: Some(trigger),
            drive: Drive::Scrubbed { lag },
            policy: None,
            motion: motion.into(),
        }
    }

    pub fn manual(motion: impl Into<Motion>) -> Self {
        Self {
            trigger: None,
            drive: Drive::Manual,
            policy: None,
            motion: motion.into(),
        }
    }

    pub fn with_policy(mut self, policy: ReplayPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, OrchestratorError> {
        serde_json::from_str(json).map_err(|e| OrchestratorError::Config(e.to_string()))
    }

    /// Structural checks that do not need geometry.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        self.motion.validate()?;
        match (&self.trigger, self.drive.needs_trigger()) {
            (Some(trigger), _) => trigger.check_static()?,
            (None, true) => {
                return Err(OrchestratorError::MissingTrigger {
                    drive: self.drive.name(),
                })
            }
            (None, false) => {}
        }
        if let Drive::Scrubbed { lag: Some(lag) } = self.drive {
            if !lag.is_finite() || lag < 0.0 {
                return Err(OrchestratorError::Config(format!(
                    "scrub lag must be a non-negative number, got {lag}"
                )));
            }
        }
        Ok(())
    }
}

/// Live binding owned by exactly one scope.
#[derive(Debug)]
pub struct Registration {
    id: RegId,
    scope: ScopeId,
    spec: RegistrationSpec,
    drive: Drive,
    policy: ReplayPolicy,
    lag: f32,
    trigger_handle: Option<String>,
    run: RunnableAnimation,
    playback: Playback,
    state: ReplayState,
    track: TriggerTrack,
    applied: f32,
    render: bool,
}

impl Registration {
    /// Build from a validated spec. A scrub-linked policy on a discrete drive
    /// promotes the drive to scrubbed.
    pub(crate) fn new(
        id: RegId,
        scope: ScopeId,
        spec: RegistrationSpec,
        default_policy: ReplayPolicy,
        default_lag: f32,
    ) -> Self {
        let mut drive = spec.drive;
        let policy = match (drive, spec.policy) {
            (Drive::Scrubbed { .. }, _) => ReplayPolicy::ScrubLinked,
            (Drive::Discrete, Some(ReplayPolicy::ScrubLinked)) => {
                drive = Drive::Scrubbed { lag: None };
                ReplayPolicy::ScrubLinked
            }
            (_, Some(p)) => p,
            (_, None) if default_policy == ReplayPolicy::ScrubLinked => ReplayPolicy::PlayOnce,
            (_, None) => default_policy,
        };
        let lag = match drive {
            Drive::Scrubbed { lag } => lag.unwrap_or(default_lag),
            _ => 0.0,
        };
        Self {
            id,
            scope,
            spec,
            drive,
            policy,
            lag,
            trigger_handle: None,
            run: RunnableAnimation::default(),
            playback: Playback::new(0.0),
            state: ReplayState::Idle,
            track: TriggerTrack::new(),
            applied: 0.0,
            render: true,
        }
    }

    pub fn id(&self) -> RegId {
        self.id
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn spec(&self) -> &RegistrationSpec {
        &self.spec
    }

    pub fn drive(&self) -> Drive {
        self.drive
    }

    pub fn policy(&self) -> ReplayPolicy {
        self.policy
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn run(&self) -> &RunnableAnimation {
        &self.run
    }

    pub fn trigger_handle(&self) -> Option<&str> {
        self.trigger_handle.as_deref()
    }

    pub fn track(&self) -> &TriggerTrack {
        &self.track
    }

    /// Playhead progress for discrete/manual drives, applied progress for
    /// scrubbed ones.
    pub fn progress(&self) -> f32 {
        match self.drive {
            Drive::Scrubbed { .. } => self.applied,
            _ => self.playback.progress(),
        }
    }

    /// Something would still change if ticking continued.
    pub fn in_flight(&self) -> bool {
        match self.drive {
            Drive::Scrubbed { .. } => (self.track.progress() - self.applied).abs() > SCRUB_SNAP,
            _ => self.state.is_running(),
        }
    }

    /// Resolve the motion's targets and the trigger element inside `root`.
    ///
    /// Only idle registrations re-resolve their motion, so a refresh never
    /// yanks a running or completed animation.
    pub(crate) fn resolve(
        &mut self,
        host: &dyn ElementHost,
        root: Option<&str>,
        defaults: &AnimationDefaults,
    ) {
        if let Some(trigger) = &self.spec.trigger {
            self.trigger_handle = host.select(root, &trigger.element).into_iter().next();
            if self.trigger_handle.is_none() {
                log::warn!(
                    "{}: trigger element '{}' not found; registration stays idle",
                    self.id,
                    trigger.element
                );
            }
        }
        if self.state == ReplayState::Idle || self.run.is_empty() {
            let source = ScopedSource { host, root };
            self.run = self.spec.motion.resolve(&source, defaults);
            self.playback = Playback::new(self.run.duration());
            self.render = true;
            if self.run.is_empty() {
                log::debug!("{}: motion resolved to no targets", self.id);
            }
        }
    }

    /// Recompute the trigger range if geometry changed since the last pass.
    pub(crate) fn refresh_range(
        &mut self,
        host: &dyn ElementHost,
        geometry: &mut GeometryCache,
        viewport_height: f32,
    ) {
        let generation = geometry.generation();
        if !self.track.is_stale(generation) {
            return;
        }
        let (Some(trigger), Some(handle)) = (&self.spec.trigger, &self.trigger_handle) else {
            self.track.mark_unavailable(generation);
            return;
        };
        match geometry.bounds(host, handle) {
            Some(rect) if rect.is_renderable() => {
                let (start, end) = trigger.range(&rect, viewport_height);
                self.track.set_range(start, end, generation);
            }
            _ => {
                log::debug!("{}: trigger '{handle}' has no renderable box; skipped", self.id);
                self.track.mark_unavailable(generation);
            }
        }
    }

    /// Evaluate the trigger at `scroll` and apply the replay policy.
    pub(crate) fn evaluate(&mut self, scroll: f32, events: &mut Vec<OrchestratorEvent>) {
        if self.drive == Drive::Manual {
            return;
        }
        for edge in self.track.evaluate(scroll) {
            log::trace!("{}: {edge:?} at scroll {scroll}", self.id);
            events.push(OrchestratorEvent::TriggerEdge {
                registration: self.id,
                edge,
            });
            if self.drive == Drive::Discrete {
                self.apply_edge(edge, events);
            }
        }
    }

    fn apply_edge(&mut self, edge: TriggerEdge, events: &mut Vec<OrchestratorEvent>) {
        if let Some((next, command)) = self.policy.react(self.state, edge) {
            self.command(command);
            self.transition(next, events);
        }
    }

    /// Explicit one-shot start: rewind and play forward regardless of state.
    /// Scrubbed registrations ignore it and return `false`.
    pub(crate) fn fire(&mut self, events: &mut Vec<OrchestratorEvent>) -> bool {
        if matches!(self.drive, Drive::Scrubbed { .. }) {
            log::debug!("{}: fire ignored for scrubbed registration", self.id);
            return false;
        }
        self.command(PlayCommand::PlayFromStart);
        self.transition(ReplayState::Playing, events);
        true
    }

    fn command(&mut self, command: PlayCommand) {
        match command {
            PlayCommand::PlayFromStart => self.playback.restart(),
            PlayCommand::PlayForward => self.playback.play_forward(),
            PlayCommand::Reverse => self.playback.reverse(),
        }
        self.render = true;
    }

    fn transition(&mut self, to: ReplayState, events: &mut Vec<OrchestratorEvent>) {
        if self.state == to {
            return;
        }
        events.push(OrchestratorEvent::StateChanged {
            registration: self.id,
            from: self.state,
            to,
        });
        self.state = to;
    }

    /// Advance by `dt` and append this registration's writes.
    pub(crate) fn advance(
        &mut self,
        dt: f32,
        writes: &mut WriteBatch,
        events: &mut Vec<OrchestratorEvent>,
    ) {
        if let Drive::Scrubbed { .. } = self.drive {
            self.advance_scrub(dt, writes);
            return;
        }
        match self.state {
            ReplayState::Playing => {
                if self.playback.advance(dt) == PlaybackStatus::ReachedEnd {
                    self.transition(ReplayState::Completed, events);
                    writes.append(self.run.end_state());
                } else {
                    writes.append(self.run.sample(self.playback.time()));
                }
            }
            ReplayState::Reversing => {
                if self.playback.advance(dt) == PlaybackStatus::ReachedStart {
                    self.transition(ReplayState::Idle, events);
                    writes.append(self.run.start_state());
                } else {
                    writes.append(self.run.sample(self.playback.time()));
                }
            }
            ReplayState::Idle if self.render => writes.append(self.run.start_state()),
            ReplayState::Completed if self.render => writes.append(self.run.end_state()),
            ReplayState::Idle | ReplayState::Completed => {}
        }
        self.render = false;
    }

    fn advance_scrub(&mut self, dt: f32, writes: &mut WriteBatch) {
        let target = self.track.progress();
        let before = self.applied;
        if self.lag <= 0.0 || !dt.is_finite() {
            self.applied = target;
        } else {
            let k = (dt.max(0.0) / self.lag).min(1.0);
            self.applied += (target - self.applied) * k;
            if (target - self.applied).abs() < SCRUB_SNAP {
                self.applied = target;
            }
        }
        if self.render || self.applied != before {
            writes.append(self.run.sample_progress(self.applied));
        }
        self.render = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollcue_animation_core::AnimationDescriptor;

    fn fade() -> Motion {
        AnimationDescriptor::builder(".x")
            .from_to("opacity", 0.0, 1.0)
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn spec_validation() {
        assert!(RegistrationSpec::manual(fade()).validate().is_ok());
        let mut spec = RegistrationSpec::manual(fade());
        spec.drive = Drive::Discrete;
        assert_eq!(
            spec.validate(),
            Err(OrchestratorError::MissingTrigger { drive: "discrete" })
        );
        let scrub = RegistrationSpec::scrubbed(TriggerSpec::new(".hero"), Some(-1.0), fade());
        assert!(matches!(scrub.validate(), Err(OrchestratorError::Config(_))));
    }

    #[test]
    fn policy_resolution() {
        let r = Registration::new(
            RegId(0),
            ScopeId(0),
            RegistrationSpec::scrubbed(TriggerSpec::new(".a"), None, fade())
                .with_policy(ReplayPolicy::PlayOnce),
            ReplayPolicy::PlayAndReverse,
            0.5,
        );
        assert_eq!(r.policy(), ReplayPolicy::ScrubLinked);
        assert_eq!(r.lag, 0.5);

        let r = Registration::new(
            RegId(1),
            ScopeId(0),
            RegistrationSpec::discrete(TriggerSpec::new(".a"), fade())
                .with_policy(ReplayPolicy::ScrubLinked),
            ReplayPolicy::PlayAndReverse,
            0.0,
        );
        assert_eq!(r.drive(), Drive::Scrubbed { lag: None });

        let r = Registration::new(
            RegId(2),
            ScopeId(0),
            RegistrationSpec::discrete(TriggerSpec::new(".a"), fade()),
            ReplayPolicy::PlayAndReverse,
            0.0,
        );
        assert_eq!(r.policy(), ReplayPolicy::PlayAndReverse);
    }

    #[test]
    fn json_spec() {
        let spec = RegistrationSpec::from_json_str(
            r#"{
                "trigger": { "element": ".about", "start": "top 80%" },
                "policy": "play none none reverse",
                "motion": { "tween": {
                    "targets": ".about-title",
                    "props": [{ "property": "y", "from": 50, "to": 0 }],
                    "duration": 0.8
                } }
            }"#,
        )
        .unwrap();
        spec.validate().unwrap();
        assert_eq!(spec.drive, Drive::Discrete);
        assert_eq!(spec.policy, Some(ReplayPolicy::PlayAndReverse));
        assert_eq!(
            spec.trigger.as_ref().map(|t| t.end),
            Some(crate::threshold::Threshold::DEFAULT_END)
        );
    }
}
