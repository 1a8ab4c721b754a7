//! Element bounds, scroll snapshot and the shared bounds cache.
//!
//! All rectangles are in document coordinates, so plain scrolling never
//! invalidates them; only resize and explicit refresh do.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::host::ElementHost;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Zero-area or non-finite boxes are not part of the render tree for
    /// trigger purposes.
    pub fn is_renderable(&self) -> bool {
        self.height > 0.0 && self.width >= 0.0 && self.y.is_finite() && self.height.is_finite()
    }
}

/// Scroll offset and viewport size observed by one event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollSnapshot {
    pub scroll_y: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

/// Lazily filled bounds cache shared by every registration.
#[derive(Debug, Default)]
pub struct GeometryCache {
    rects: HashMap<String, Option<Rect>>,
    generation: u64,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every invalidation; consumers compare it to decide whether
    /// their derived ranges are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn invalidate(&mut self) {
        self.rects.clear();
        self.generation = self.generation.wrapping_add(1);
        log::trace!("geometry cache invalidated (generation {})", self.generation);
    }

    /// Cached bounds for `handle`, asking the host on a miss.
    pub fn bounds(&mut self, host: &dyn ElementHost, handle: &str) -> Option<Rect> {
        if let Some(hit) = self.rects.get(handle) {
            return *hit;
        }
        let rect = host.bounds(handle);
        self.rects.insert(handle.to_string(), rect);
        rect
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting {
        calls: Cell<usize>,
    }

    impl ElementHost for Counting {
        fn select(&self, _root: Option<&str>, _selector: &str) -> Vec<String> {
            Vec::new()
        }

        fn bounds(&self, handle: &str) -> Option<Rect> {
            self.calls.set(self.calls.get() + 1);
            (handle == "hero").then(|| Rect::new(0.0, 0.0, 100.0, 800.0))
        }
    }

    #[test]
    fn caches_until_invalidated() {
        let host = Counting { calls: Cell::new(0) };
        let mut cache = GeometryCache::new();
        assert!(cache.bounds(&host, "hero").is_some());
        assert!(cache.bounds(&host, "hero").is_some());
        assert!(cache.bounds(&host, "ghost").is_none());
        assert!(cache.bounds(&host, "ghost").is_none());
        assert_eq!(host.calls.get(), 2);

        let before = cache.generation();
        cache.invalidate();
        assert_ne!(cache.generation(), before);
        assert!(cache.is_empty());
        cache.bounds(&host, "hero");
        assert_eq!(host.calls.get(), 3);
    }
}
