//! Resolver trait for selector → element handles.
//!
//! The animation core never owns elements. Adapters (orchestrator, WASM host,
//! test doubles) implement this and pass it into `resolve`.

use scrollcue_api_core::Value;

/// Source of concrete targets and their current property values.
pub trait TargetSource {
    /// Element handles matching `selector`, in document order.
    /// Unknown selectors resolve to an empty list.
    fn select(&self, selector: &str) -> Vec<String>;

    /// Current value of `property` on `target`, if the host can report it.
    fn read(&self, _target: &str, _property: &str) -> Option<Value> {
        None
    }
}

/// Resolve a list of selectors into unique handles, preserving first-seen order.
pub fn select_all(source: &dyn TargetSource, selectors: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for selector in selectors {
        let found = source.select(selector);
        if found.is_empty() {
            log::debug!("selector '{selector}' matched no targets; skipping");
        }
        for handle in found {
            if !out.contains(&handle) {
                out.push(handle);
            }
        }
    }
    out
}
