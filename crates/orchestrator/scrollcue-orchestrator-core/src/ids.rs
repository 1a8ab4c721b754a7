//! Identifiers and a monotonic allocator for scopes and registrations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One mounted section.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

/// One trigger/animation binding. Handles remain valid values after their
/// scope is disposed; lookups through them simply find nothing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RegId(pub u32);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

impl fmt::Display for RegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reg#{}", self.0)
    }
}

/// Ids are never reused within one orchestrator, so a re-mounted section
/// always gets a fresh scope.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_scope: u32,
    next_reg: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.next_scope);
        self.next_scope = self.next_scope.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_reg(&mut self) -> RegId {
        let id = RegId(self.next_reg);
        self.next_reg = self.next_reg.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_scope(), ScopeId(0));
        assert_eq!(alloc.alloc_scope(), ScopeId(1));
        assert_eq!(alloc.alloc_reg(), RegId(0));
        assert_eq!(alloc.alloc_reg(), RegId(1));
        assert_eq!(RegId(4).to_string(), "reg#4");
    }
}
