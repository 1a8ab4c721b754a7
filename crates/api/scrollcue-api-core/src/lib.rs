//! scrollcue-api-core: property values and write contracts (engine-agnostic)
//!
//! The animation and orchestration crates never touch host elements directly.
//! They emit [`WriteBatch`]es of `target.property = value` writes that a host
//! adapter (DOM, canvas, test double) applies.

pub mod prop_path;
pub mod value;
pub mod write_ops;

pub use prop_path::PropPath;
pub use value::{Value, ValueKind};
pub use write_ops::{WriteBatch, WriteOp};
