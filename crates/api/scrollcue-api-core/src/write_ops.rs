//! Write operations produced by the animation engine to describe property
//! writes the host must apply.
//!
//! WriteOp serializes to JSON as:
//!   { "path": "hero-line#0.rotateX", "value": { "type": "Float", "data": 45.0 } }
//!
//! WriteBatch is a simple Vec<WriteOp> with helpers.

use crate::{PropPath, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOp {
    pub path: PropPath,
    pub value: Value,
}

impl WriteOp {
    pub fn new(path: PropPath, value: Value) -> Self {
        Self { path, value }
    }
}

/// A batch of write operations. The orchestrator emits one WriteBatch per frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBatch(pub Vec<WriteOp>);

impl WriteBatch {
    pub fn new() -> Self {
        WriteBatch(Vec::new())
    }

    pub fn push(&mut self, op: WriteOp) {
        self.0.push(op);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = WriteOp>) {
        self.0.extend(other);
    }

    pub fn into_vec(self) -> Vec<WriteOp> {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &WriteOp> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge another batch in-place (append).
    pub fn append(&mut self, mut other: WriteBatch) {
        self.0.append(&mut other.0)
    }

    /// Last value written to `path` in this batch, if any.
    pub fn get(&self, path: &PropPath) -> Option<&Value> {
        self.0.iter().rev().find(|op| &op.path == path).map(|op| &op.value)
    }

    /// Collapse repeated writes to the same path: the last value wins and keeps
    /// the position of the first write to that path.
    pub fn dedup_last_wins(&mut self) {
        let mut out: Vec<WriteOp> = Vec::with_capacity(self.0.len());
        for op in self.0.drain(..) {
            if let Some(existing) = out.iter_mut().find(|o| o.path == op.path) {
                existing.value = op.value;
            } else {
                out.push(op);
            }
        }
        self.0 = out;
    }
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val = serde_json::to_string(&self.value).map_err(|_| fmt::Error)?;
        write!(f, "{{ path: {}, value: {} }}", self.path, val)
    }
}
