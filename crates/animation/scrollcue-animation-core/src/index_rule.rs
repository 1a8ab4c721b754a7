//! Per-index value rules.
//!
//! Used for stagger offsets and for property values that differ per target
//! (e.g. the first card slides in from the left, the rest from the right).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Code-only per-index function: `(index, count) -> value`.
#[derive(Clone)]
pub struct IndexFn(Arc<dyn Fn(usize, usize) -> f32 + Send + Sync>);

impl IndexFn {
    pub fn new(f: impl Fn(usize, usize) -> f32 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[inline]
    pub fn call(&self, index: usize, count: usize) -> f32 {
        (self.0)(index, count)
    }
}

impl fmt::Debug for IndexFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IndexFn(..)")
    }
}

impl PartialEq for IndexFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Value derived from a target's position in its ordered target list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexRule {
    /// `base + index * step`
    Linear { base: f32, step: f32 },
    /// Even indices get `even`, odd indices get `odd`.
    Alternate { even: f32, odd: f32 },
    /// Index 0 gets `first`, every other index `rest`.
    FirstThenRest { first: f32, rest: f32 },
    /// Explicit values; indices past the end reuse the last value.
    List(Vec<f32>),
    /// Arbitrary closure. Not serializable.
    #[serde(skip)]
    Custom(IndexFn),
}

impl IndexRule {
    pub fn custom(f: impl Fn(usize, usize) -> f32 + Send + Sync + 'static) -> Self {
        IndexRule::Custom(IndexFn::new(f))
    }

    /// Evaluate the rule for `index` within a list of `count` targets.
    pub fn eval(&self, index: usize, count: usize) -> f32 {
        match self {
            IndexRule::Linear { base, step } => base + index as f32 * step,
            IndexRule::Alternate { even, odd } => {
                if index % 2 == 0 {
                    *even
                } else {
                    *odd
                }
            }
            IndexRule::FirstThenRest { first, rest } => {
                if index == 0 {
                    *first
                } else {
                    *rest
                }
            }
            IndexRule::List(values) => values
                .get(index)
                .or_else(|| values.last())
                .copied()
                .unwrap_or(0.0),
            IndexRule::Custom(f) => f.call(index, count),
        }
    }
}
