//! Shared fixtures: a landing-page document and its section choreographies.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use scrollcue_orchestrator::{ElementHost, Orchestrator, RegId, RegistrationSpec, ScopeId};

mod document;

pub use document::{FakeDocument, FakeElement, Viewport};

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    documents: HashMap<String, String>,
    sections: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// One mounted section: scope label, root element, and its registrations in
/// declaration order.
#[derive(Clone, Debug, Deserialize)]
pub struct SectionFixture {
    pub label: String,
    #[serde(default)]
    pub root: Option<String>,
    pub registrations: Vec<RegistrationSpec>,
}

impl SectionFixture {
    /// Mount the section and register everything in it.
    pub fn mount(
        &self,
        orchestrator: &mut Orchestrator,
        host: &dyn ElementHost,
    ) -> Result<(ScopeId, Vec<RegId>)> {
        let scope = orchestrator.mount(&self.label, self.root.as_deref());
        let mut ids = Vec::with_capacity(self.registrations.len());
        for (i, spec) in self.registrations.iter().enumerate() {
            let id = orchestrator
                .register(host, scope, spec.clone())
                .with_context(|| format!("section '{}' registration {i}", self.label))?;
            ids.push(id);
        }
        Ok((scope, ids))
    }
}

pub mod documents {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.documents.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.documents, "document", name)?;
        read_to_string(rel)
    }

    pub fn load(name: &str) -> Result<FakeDocument> {
        let rel = lookup(&MANIFEST.documents, "document", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.documents, "document", name)?;
        Ok(resolve_path(rel))
    }
}

pub mod sections {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.sections.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.sections, "section", name)?;
        read_to_string(rel)
    }

    pub fn load(name: &str) -> Result<SectionFixture> {
        load_as(name)
    }

    pub fn load_as<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.sections, "section", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.sections, "section", name)?;
        Ok(resolve_path(rel))
    }
}
