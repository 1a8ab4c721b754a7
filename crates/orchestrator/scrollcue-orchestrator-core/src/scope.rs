//! Scope registry: one scope per mounted section, owning its registrations.
//!
//! Disposal removes the scope and everything in it synchronously. Nothing
//! owned by a disposed scope is reachable afterwards, so no later tick can
//! write or emit on its behalf.

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;
use crate::ids::{RegId, ScopeId};
use crate::registration::Registration;

#[derive(Debug)]
pub struct Scope {
    id: ScopeId,
    label: String,
    root: Option<String>,
    registrations: IndexMap<RegId, Registration>,
}

impl Scope {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Element handle selectors registered here resolve under.
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn registrations(&self) -> impl Iterator<Item = &Registration> {
        self.registrations.values()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub(crate) fn parts_mut(&mut self) -> (Option<&str>, impl Iterator<Item = &mut Registration>) {
        (self.root.as_deref(), self.registrations.values_mut())
    }
}

/// What a dispose call removed. Disposing an already disposed scope reports
/// zeros.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disposal {
    pub scope: Option<ScopeId>,
    pub registrations: usize,
    pub cancelled: usize,
}

#[derive(Debug, Default)]
pub struct ScopeRegistry {
    scopes: IndexMap<ScopeId, Scope>,
    owners: HashMap<RegId, ScopeId>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, id: ScopeId, label: impl Into<String>, root: Option<String>) {
        let label = label.into();
        log::debug!("{id}: opened '{label}'");
        self.scopes.insert(
            id,
            Scope {
                id,
                label,
                root,
                registrations: IndexMap::new(),
            },
        );
    }

    pub fn is_live(&self, scope: ScopeId) -> bool {
        self.scopes.contains_key(&scope)
    }

    pub fn scope(&self, scope: ScopeId) -> Option<&Scope> {
        self.scopes.get(&scope)
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.values()
    }

    pub(crate) fn scopes_mut(&mut self) -> impl Iterator<Item = &mut Scope> {
        self.scopes.values_mut()
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Live registrations across every scope.
    pub fn registration_count(&self) -> usize {
        self.owners.len()
    }

    /// Attach `reg` to its scope. Fails if the scope is gone.
    pub(crate) fn attach(&mut self, reg: Registration) -> Result<RegId, OrchestratorError> {
        let scope_id = reg.scope();
        let scope = self
            .scopes
            .get_mut(&scope_id)
            .ok_or(OrchestratorError::UnknownScope(scope_id))?;
        let id = reg.id();
        scope.registrations.insert(id, reg);
        self.owners.insert(id, scope_id);
        log::debug!("{id}: registered in {scope_id}");
        Ok(id)
    }

    pub fn registration(&self, id: RegId) -> Option<&Registration> {
        let scope = self.owners.get(&id)?;
        self.scopes.get(scope)?.registrations.get(&id)
    }

    pub(crate) fn registration_mut(&mut self, id: RegId) -> Option<&mut Registration> {
        let scope = self.owners.get(&id)?;
        self.scopes.get_mut(scope)?.registrations.get_mut(&id)
    }

    /// Remove `scope` and every registration it owns. Idempotent.
    pub fn dispose(&mut self, scope: ScopeId) -> Disposal {
        let Some(removed) = self.scopes.shift_remove(&scope) else {
            log::debug!("{scope}: already disposed");
            return Disposal::default();
        };
        let mut cancelled = 0;
        for (id, reg) in &removed.registrations {
            self.owners.remove(id);
            if reg.in_flight() {
                cancelled += 1;
            }
        }
        log::debug!(
            "{scope}: disposed '{}' ({} registrations, {cancelled} cancelled)",
            removed.label,
            removed.registrations.len()
        );
        Disposal {
            scope: Some(scope),
            registrations: removed.registrations.len(),
            cancelled,
        }
    }

    /// Dispose every live scope, oldest first.
    pub fn dispose_all(&mut self) -> Vec<Disposal> {
        let ids: Vec<ScopeId> = self.scopes.keys().copied().collect();
        ids.into_iter().map(|id| self.dispose(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::RegistrationSpec;
    use crate::replay::ReplayPolicy;
    use scrollcue_animation_core::AnimationDescriptor;

    fn reg(id: u32, scope: ScopeId) -> Registration {
        let motion = AnimationDescriptor::builder(".x")
            .from_to("opacity", 0.0, 1.0)
            .build()
            .unwrap();
        Registration::new(
            RegId(id),
            scope,
            RegistrationSpec::manual(motion),
            ReplayPolicy::PlayOnce,
            0.0,
        )
    }

    #[test]
    fn dispose_removes_everything_once() {
        let mut r = ScopeRegistry::new();
        r.open(ScopeId(0), "about", None);
        for i in 0..3 {
            r.attach(reg(i, ScopeId(0))).unwrap();
        }
        assert_eq!(r.registration_count(), 3);

        let d = r.dispose(ScopeId(0));
        assert_eq!(d.registrations, 3);
        assert_eq!(d.scope, Some(ScopeId(0)));
        assert_eq!(r.registration_count(), 0);
        assert!(r.registration(RegId(1)).is_none());

        assert_eq!(r.dispose(ScopeId(0)), Disposal::default());
    }

    #[test]
    fn attach_to_disposed_scope_fails() {
        let mut r = ScopeRegistry::new();
        r.open(ScopeId(4), "hero", None);
        r.dispose(ScopeId(4));
        assert_eq!(
            r.attach(reg(0, ScopeId(4))).unwrap_err(),
            OrchestratorError::UnknownScope(ScopeId(4))
        );
    }
}
