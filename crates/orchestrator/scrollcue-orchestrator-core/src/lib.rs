//! scrollcue-orchestrator
//!
//! Binds animation descriptors and timelines to scroll triggers and runs them:
//!
//! - a [`ScopeRegistry`] table with one scope per mounted section, disposed as a unit
//! - a trigger evaluator turning scroll offsets into edges and progress
//! - replay policies deciding what repeated crossings do
//! - pointer tilt controllers independent of scroll
//!
//! The host feeds events (`on_scroll`, `on_resize`, `pointer_move`, ...) and
//! calls [`Orchestrator::tick`] once per frame; each [`Frame`] carries the
//! property writes to apply and the events that happened since the last one.

pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod host;
pub mod ids;
pub mod registration;
pub mod replay;
mod scheduler;
pub mod scope;
pub mod threshold;
pub mod tilt;
pub mod trigger;

use indexmap::IndexMap;

pub use crate::config::Config;
pub use crate::error::OrchestratorError;
pub use crate::events::{Frame, OrchestratorEvent};
pub use crate::geometry::{GeometryCache, Rect, ScrollSnapshot};
pub use crate::host::ElementHost;
pub use crate::ids::{IdAllocator, RegId, ScopeId};
pub use crate::registration::{Registration, RegistrationSpec};
pub use crate::replay::{PlayCommand, ReplayPolicy, ReplayState};
pub use crate::scope::{Disposal, Scope, ScopeRegistry};
pub use crate::threshold::{Anchor, Threshold};
pub use crate::tilt::{tilt_target, PointerTilt, Tilt, TiltConfig};
pub use crate::trigger::{Drive, Region, TriggerEdge, TriggerSpec};

pub type Result<T> = core::result::Result<T, OrchestratorError>;

#[derive(Debug)]
pub struct Orchestrator {
    config: Config,
    epoch: u64,
    ids: IdAllocator,
    scopes: ScopeRegistry,
    geometry: GeometryCache,
    snapshot: ScrollSnapshot,
    tilts: IndexMap<String, PointerTilt>,
    pending: Vec<OrchestratorEvent>,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            epoch: 0,
            ids: IdAllocator::new(),
            scopes: ScopeRegistry::new(),
            geometry: GeometryCache::new(),
            snapshot: ScrollSnapshot::default(),
            tilts: IndexMap::new(),
            pending: Vec::new(),
        }
    }

    /// Start with a known viewport size.
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.snapshot.viewport_width = width;
        self.snapshot.viewport_height = height;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn snapshot(&self) -> ScrollSnapshot {
        self.snapshot
    }

    pub fn scopes(&self) -> &ScopeRegistry {
        &self.scopes
    }

    // --- lifecycle ---------------------------------------------------------

    /// Open a scope for a mounted section. Selectors registered into it
    /// resolve under `root` when given.
    pub fn mount(&mut self, label: &str, root: Option<&str>) -> ScopeId {
        let id = self.ids.alloc_scope();
        self.scopes.open(id, label, root.map(str::to_string));
        self.pending.push(OrchestratorEvent::ScopeOpened {
            scope: id,
            label: label.to_string(),
        });
        id
    }

    /// Dispose `scope` and everything registered in it. Safe to call twice.
    pub fn unmount(&mut self, scope: ScopeId) -> Disposal {
        let disposal = self.scopes.dispose(scope);
        self.after_dispose(&[disposal]);
        disposal
    }

    /// Page teardown: dispose every scope and drop all tilt controllers.
    pub fn kill_all(&mut self) -> Vec<Disposal> {
        let disposals = self.scopes.dispose_all();
        self.after_dispose(&disposals);
        self.tilts.clear();
        disposals
    }

    fn after_dispose(&mut self, disposals: &[Disposal]) {
        let scopes = &self.scopes;
        self.pending.retain(|e| {
            e.registration()
                .map_or(true, |r| scopes.registration(r).is_some())
        });
        for d in disposals {
            if let Some(scope) = d.scope {
                self.pending.push(OrchestratorEvent::ScopeDisposed {
                    scope,
                    registrations: d.registrations,
                    cancelled: d.cancelled,
                });
            }
        }
    }

    /// Bind a trigger and motion inside `scope`.
    ///
    /// Fails on unknown scopes, invalid motions, and threshold pairs that are
    /// inverted either statically or against the trigger element's current
    /// box. A trigger element that cannot be found is not an error; the
    /// registration stays idle until a refresh finds it.
    pub fn register(
        &mut self,
        host: &dyn ElementHost,
        scope: ScopeId,
        spec: RegistrationSpec,
    ) -> Result<RegId> {
        spec.validate()?;
        let root = self
            .scopes
            .scope(scope)
            .ok_or(OrchestratorError::UnknownScope(scope))?
            .root()
            .map(str::to_string);

        let id = self.ids.alloc_reg();
        let mut reg = Registration::new(
            id,
            scope,
            spec,
            self.config.default_policy,
            self.config.default_scrub_lag,
        );
        reg.resolve(host, root.as_deref(), &self.config.animation);

        if let (Some(trigger), Some(handle)) = (&reg.spec().trigger, reg.trigger_handle()) {
            if let Some(rect) = self.geometry.bounds(host, handle) {
                if rect.is_renderable() {
                    trigger.check_geometry(&rect, self.snapshot.viewport_height)?;
                }
            }
        }

        reg.refresh_range(host, &mut self.geometry, self.snapshot.viewport_height);
        reg.evaluate(self.snapshot.scroll_y, &mut self.pending);
        self.scopes.attach(reg)
    }

    /// [`Orchestrator::register`] from a JSON registration spec.
    pub fn register_json(
        &mut self,
        host: &dyn ElementHost,
        scope: ScopeId,
        json: &str,
    ) -> Result<RegId> {
        let spec = RegistrationSpec::from_json_str(json)?;
        self.register(host, scope, spec)
    }

    // --- input events -------------------------------------------------------

    pub fn on_scroll(&mut self, host: &dyn ElementHost, scroll_y: f32) {
        if !scroll_y.is_finite() {
            log::warn!("ignoring non-finite scroll offset {scroll_y}");
            return;
        }
        self.snapshot.scroll_y = scroll_y;
        scheduler::evaluate_triggers(self, host);
    }

    pub fn on_resize(&mut self, host: &dyn ElementHost, width: f32, height: f32) {
        self.snapshot.viewport_width = width;
        self.snapshot.viewport_height = height;
        self.geometry.invalidate();
        scheduler::evaluate_triggers(self, host);
    }

    /// Drop cached geometry, re-resolve idle registrations, and re-evaluate.
    pub fn refresh(&mut self, host: &dyn ElementHost) {
        self.geometry.invalidate();
        scheduler::resolve_all(self, host);
        scheduler::evaluate_triggers(self, host);
    }

    /// Aim the tilt of `handle` at the pointer. Returns the target rotation,
    /// or `None` when the element has no box.
    pub fn pointer_move(
        &mut self,
        host: &dyn ElementHost,
        handle: &str,
        x: f32,
        y: f32,
    ) -> Option<Tilt> {
        let bounds = self.geometry.bounds(host, handle)?;
        let target = tilt_target(&bounds, x, y, &self.config.tilt);
        match self.tilts.get_mut(handle) {
            Some(tilt) => tilt.pointer_move(target, &self.config.tilt),
            None => {
                self.tilts
                    .insert(handle.to_string(), PointerTilt::new(target, &self.config.tilt));
            }
        }
        Some(target)
    }

    /// Ease `handle` back to neutral. Returns `false` if it was not tilted.
    pub fn pointer_leave(&mut self, handle: &str) -> bool {
        match self.tilts.get_mut(handle) {
            Some(tilt) => {
                tilt.pointer_leave(&self.config.tilt);
                true
            }
            None => false,
        }
    }

    /// One-shot start of a registration (menu open, form submit).
    pub fn fire(&mut self, registration: RegId) -> Result<bool> {
        let reg = self
            .scopes
            .registration_mut(registration)
            .ok_or(OrchestratorError::UnknownRegistration(registration))?;
        Ok(reg.fire(&mut self.pending))
    }

    /// Advance by `dt` seconds and collect this frame's writes and events.
    pub fn tick(&mut self, dt: f32) -> Frame {
        scheduler::run_frame(self, dt)
    }

    // --- queries ------------------------------------------------------------

    pub fn registration(&self, id: RegId) -> Option<&Registration> {
        self.scopes.registration(id)
    }

    pub fn state(&self, id: RegId) -> Option<ReplayState> {
        self.registration(id).map(Registration::state)
    }

    pub fn progress(&self, id: RegId) -> Option<f32> {
        self.registration(id).map(Registration::progress)
    }

    pub fn is_live(&self, scope: ScopeId) -> bool {
        self.scopes.is_live(scope)
    }

    pub fn tilt(&self, handle: &str) -> Option<Tilt> {
        self.tilts.get(handle).map(PointerTilt::current)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
