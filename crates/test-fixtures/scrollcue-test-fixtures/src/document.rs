//! In-memory host document used by tests and benches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use scrollcue_api_core::{Value, WriteBatch};
use scrollcue_orchestrator::{ElementHost, Rect};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FakeElement {
    pub handle: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub props: BTreeMap<String, Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 900.0,
        }
    }
}

/// Flat element list in document order. Supports `.class` and `#handle`
/// selectors, comma-separated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FakeDocument {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    elements: Vec<FakeElement>,
}

impl FakeDocument {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport { width, height },
            elements: Vec::new(),
        }
    }

    /// Append an element (builder form).
    pub fn element(
        mut self,
        handle: &str,
        classes: &[&str],
        parent: Option<&str>,
        rect: Option<Rect>,
    ) -> Self {
        self.elements.push(FakeElement {
            handle: handle.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            parent: parent.map(str::to_string),
            rect,
            props: BTreeMap::new(),
        });
        self
    }

    pub fn get(&self, handle: &str) -> Option<&FakeElement> {
        self.elements.iter().find(|e| e.handle == handle)
    }

    fn get_mut(&mut self, handle: &str) -> Option<&mut FakeElement> {
        self.elements.iter_mut().find(|e| e.handle == handle)
    }

    pub fn set_rect(&mut self, handle: &str, rect: Option<Rect>) {
        if let Some(el) = self.get_mut(handle) {
            el.rect = rect;
        }
    }

    pub fn remove(&mut self, handle: &str) {
        self.elements.retain(|e| e.handle != handle);
    }

    pub fn set_prop(&mut self, handle: &str, property: &str, value: Value) {
        if let Some(el) = self.get_mut(handle) {
            el.props.insert(property.to_string(), value);
        }
    }

    pub fn prop(&self, handle: &str, property: &str) -> Option<&Value> {
        self.get(handle)?.props.get(property)
    }

    pub fn float(&self, handle: &str, property: &str) -> Option<f32> {
        self.prop(handle, property).and_then(Value::as_float)
    }

    /// Apply a frame's writes; returns how many landed on known elements.
    pub fn apply(&mut self, writes: &WriteBatch) -> usize {
        let mut applied = 0;
        for op in writes.iter() {
            if let Some(el) = self.get_mut(&op.path.target) {
                el.props.insert(op.path.property.clone(), op.value.clone());
                applied += 1;
            }
        }
        applied
    }

    /// Handles with class `class`, in document order.
    pub fn with_class(&self, class: &str) -> Vec<String> {
        self.select(None, &format!(".{class}"))
    }

    fn is_within(&self, handle: &str, root: &str) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            if h == root {
                return true;
            }
            current = self.get(h).and_then(|e| e.parent.as_deref());
        }
        false
    }

    fn matches(el: &FakeElement, selector: &str) -> bool {
        if let Some(class) = selector.strip_prefix('.') {
            el.classes.iter().any(|c| c == class)
        } else if let Some(id) = selector.strip_prefix('#') {
            el.handle == id
        } else {
            false
        }
    }
}

impl ElementHost for FakeDocument {
    fn select(&self, root: Option<&str>, selector: &str) -> Vec<String> {
        let parts: Vec<&str> = selector.split(',').map(str::trim).collect();
        self.elements
            .iter()
            .filter(|el| parts.iter().any(|p| Self::matches(el, p)))
            .filter(|el| root.map_or(true, |r| self.is_within(&el.handle, r)))
            .map(|el| el.handle.clone())
            .collect()
    }

    fn bounds(&self, handle: &str) -> Option<Rect> {
        self.get(handle)?.rect
    }

    fn read(&self, handle: &str, property: &str) -> Option<Value> {
        self.prop(handle, property).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> FakeDocument {
        FakeDocument::new(1280.0, 900.0)
            .element("about", &["about-section"], None, Some(Rect::new(0.0, 900.0, 1280.0, 1400.0)))
            .element("card-0", &["card"], Some("about"), None)
            .element("card-1", &["card"], Some("about"), None)
            .element("stray", &["card"], None, None)
    }

    #[test]
    fn selects_in_document_order_within_root() {
        let d = doc();
        assert_eq!(d.select(None, ".card"), vec!["card-0", "card-1", "stray"]);
        assert_eq!(d.select(Some("about"), ".card"), vec!["card-0", "card-1"]);
        assert_eq!(d.select(Some("about"), "#about"), vec!["about"]);
        assert!(d.select(None, "div").is_empty());
    }

    #[test]
    fn apply_writes_props() {
        let mut d = doc();
        let mut batch = WriteBatch::new();
        batch.push(scrollcue_api_core::WriteOp::new(
            scrollcue_api_core::PropPath::new("card-0", "opacity"),
            Value::Float(0.5),
        ));
        batch.push(scrollcue_api_core::WriteOp::new(
            scrollcue_api_core::PropPath::new("ghost", "opacity"),
            Value::Float(0.5),
        ));
        assert_eq!(d.apply(&batch), 1);
        assert_eq!(d.float("card-0", "opacity"), Some(0.5));
    }
}
