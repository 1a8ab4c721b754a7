//! Host document seam.
//!
//! The orchestrator never touches elements. The host resolves selectors,
//! reports geometry, and applies the write batches the orchestrator emits.

use scrollcue_animation_core::TargetSource;
use scrollcue_api_core::Value;

use crate::geometry::Rect;

/// Element tree provided by the embedding page.
pub trait ElementHost {
    /// Handles matching `selector` in document order, searched under `root`
    /// when given. Unknown selectors resolve to an empty list.
    fn select(&self, root: Option<&str>, selector: &str) -> Vec<String>;

    /// Bounding box in document coordinates; `None` when the element is not
    /// rendered.
    fn bounds(&self, handle: &str) -> Option<Rect>;

    /// Current value of an animatable property.
    fn read(&self, _handle: &str, _property: &str) -> Option<Value> {
        None
    }
}

/// Adapts an [`ElementHost`] to the animation core, resolving selectors inside
/// one scope's root element.
pub(crate) struct ScopedSource<'a> {
    pub host: &'a dyn ElementHost,
    pub root: Option<&'a str>,
}

impl TargetSource for ScopedSource<'_> {
    fn select(&self, selector: &str) -> Vec<String> {
        self.host.select(self.root, selector)
    }

    fn read(&self, target: &str, property: &str) -> Option<Value> {
        self.host.read(target, property)
    }
}
