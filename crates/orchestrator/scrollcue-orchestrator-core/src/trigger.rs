//! Trigger specs and the scroll evaluator.
//!
//! A trigger compares the current scroll offset with the scroll offsets at
//! which its start and end thresholds are met, producing discrete edges and a
//! clamped progress value.

use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;
use crate::geometry::Rect;
use crate::threshold::Threshold;

fn default_start() -> Threshold {
    Threshold::DEFAULT_START
}

fn default_end() -> Threshold {
    Threshold::DEFAULT_END
}

/// Reference element plus start/end thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerSpec {
    /// Selector of the reference element, resolved inside the scope root.
    pub element: String,
    #[serde(default = "default_start")]
    pub start: Threshold,
    #[serde(default = "default_end")]
    pub end: Threshold,
}

impl TriggerSpec {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            start: Threshold::DEFAULT_START,
            end: Threshold::DEFAULT_END,
        }
    }

    pub fn start(mut self, start: &str) -> Result<Self, OrchestratorError> {
        self.start = Threshold::parse(start)?;
        Ok(self)
    }

    pub fn end(mut self, end: &str) -> Result<Self, OrchestratorError> {
        self.end = Threshold::parse(end)?;
        Ok(self)
    }

    /// Reject start/end pairs that can never describe a forward range.
    pub fn check_static(&self) -> Result<(), OrchestratorError> {
        if self.start.statically_after(&self.end) {
            return Err(self.inverted("start anchor is below end anchor for any geometry"));
        }
        Ok(())
    }

    /// Reject pairs that are inverted for the element's current geometry.
    pub fn check_geometry(&self, rect: &Rect, viewport_height: f32) -> Result<(), OrchestratorError> {
        let (start, end) = self.range(rect, viewport_height);
        if start > end {
            return Err(self.inverted(&format!(
                "start resolves to {start}px, end to {end}px"
            )));
        }
        Ok(())
    }

    /// Scroll offsets `(start, end)` for `rect`.
    pub fn range(&self, rect: &Rect, viewport_height: f32) -> (f32, f32) {
        (
            self.start.scroll_position(rect, viewport_height),
            self.end.scroll_position(rect, viewport_height),
        )
    }

    fn inverted(&self, reason: &str) -> OrchestratorError {
        OrchestratorError::InvalidThreshold {
            start: self.start.to_string(),
            end: self.end.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// How a registration is driven.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drive {
    /// Start/reverse on threshold crossings.
    #[default]
    Discrete,
    /// Progress between start and end drives the animation directly. `lag`
    /// smooths the applied progress over that many seconds.
    Scrubbed {
        #[serde(default)]
        lag: Option<f32>,
    },
    /// Only explicit `fire` calls start the animation.
    Manual,
}

impl Drive {
    pub fn name(&self) -> &'static str {
        match self {
            Drive::Discrete => "discrete",
            Drive::Scrubbed { .. } => "scrubbed",
            Drive::Manual => "manual",
        }
    }

    pub fn needs_trigger(&self) -> bool {
        !matches!(self, Drive::Manual)
    }
}

/// Discrete crossing reported by the evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEdge {
    /// Start threshold crossed going down.
    Enter,
    /// End threshold crossed going down.
    Leave,
    /// End threshold crossed going up.
    EnterBack,
    /// Start threshold crossed going up.
    LeaveBack,
}

/// Where the scroll offset sits relative to a trigger range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Region {
    Before,
    Active,
    After,
}

impl Region {
    pub fn of(scroll: f32, start: f32, end: f32) -> Self {
        if scroll < start {
            Region::Before
        } else if scroll > end {
            Region::After
        } else {
            Region::Active
        }
    }

    /// Edges crossed moving from `self` to `to`, in crossing order.
    pub fn edges_to(self, to: Region) -> Vec<TriggerEdge> {
        use Region::*;
        match (self, to) {
            (Before, Active) => vec![TriggerEdge::Enter],
            (Before, After) => vec![TriggerEdge::Enter, TriggerEdge::Leave],
            (Active, After) => vec![TriggerEdge::Leave],
            (After, Active) => vec![TriggerEdge::EnterBack],
            (After, Before) => vec![TriggerEdge::EnterBack, TriggerEdge::LeaveBack],
            (Active, Before) => vec![TriggerEdge::LeaveBack],
            _ => Vec::new(),
        }
    }
}

/// Per-registration evaluator state.
///
/// The resolved range is cached against the geometry generation it was
/// computed from and recomputed lazily after invalidation.
#[derive(Clone, Debug, Default)]
pub struct TriggerTrack {
    range: Option<(f32, f32)>,
    generation: Option<u64>,
    region: Option<Region>,
    progress: f32,
}

impl TriggerTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stale(&self, generation: u64) -> bool {
        self.generation != Some(generation)
    }

    /// Store a freshly computed range. A range inverted by a later resize
    /// collapses to a step at its start.
    pub fn set_range(&mut self, start: f32, end: f32, generation: u64) {
        if end < start {
            log::warn!("trigger range inverted after resize ({start} > {end}); treating as a step");
        }
        self.range = Some((start, end.max(start)));
        self.generation = Some(generation);
    }

    /// Element missing or unrenderable: keep prior region and progress.
    pub fn mark_unavailable(&mut self, generation: u64) {
        self.range = None;
        self.generation = Some(generation);
    }

    pub fn range(&self) -> Option<(f32, f32)> {
        self.range
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    /// Latest scroll-derived progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Evaluate at `scroll`. The first successful evaluation counts as coming
    /// from above the start threshold, so an element already in view enters.
    pub fn evaluate(&mut self, scroll: f32) -> Vec<TriggerEdge> {
        let Some((start, end)) = self.range else {
            return Vec::new();
        };
        self.progress = if end > start {
            ((scroll - start) / (end - start)).clamp(0.0, 1.0)
        } else if scroll >= start {
            1.0
        } else {
            0.0
        };
        let next = Region::of(scroll, start, end);
        let prev = self.region.unwrap_or(Region::Before);
        self.region = Some(next);
        prev.edges_to(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_scroll_direction() {
        let mut t = TriggerTrack::new();
        t.set_range(100.0, 300.0, 0);
        assert!(t.evaluate(0.0).is_empty());
        assert_eq!(t.evaluate(150.0), vec![TriggerEdge::Enter]);
        assert_eq!(t.evaluate(400.0), vec![TriggerEdge::Leave]);
        assert_eq!(t.evaluate(50.0), vec![TriggerEdge::EnterBack, TriggerEdge::LeaveBack]);
    }

    #[test]
    fn element_already_in_view_enters_on_first_evaluation() {
        let mut t = TriggerTrack::new();
        t.set_range(-200.0, 600.0, 0);
        assert_eq!(t.evaluate(0.0), vec![TriggerEdge::Enter]);
    }

    #[test]
    fn progress_is_clamped_and_monotonic() {
        let mut t = TriggerTrack::new();
        t.set_range(100.0, 300.0, 0);
        let mut last = -1.0;
        for s in (0..50).map(|i| i as f32 * 10.0) {
            t.evaluate(s);
            assert!((0.0..=1.0).contains(&t.progress()));
            assert!(t.progress() >= last);
            last = t.progress();
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn inverted_range_becomes_a_step() {
        let mut t = TriggerTrack::new();
        t.set_range(300.0, 100.0, 0);
        t.evaluate(299.0);
        assert_eq!(t.progress(), 0.0);
        t.evaluate(300.0);
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn unavailable_keeps_region() {
        let mut t = TriggerTrack::new();
        t.set_range(0.0, 100.0, 0);
        t.evaluate(50.0);
        t.mark_unavailable(1);
        assert!(t.evaluate(500.0).is_empty());
        assert_eq!(t.region(), Some(Region::Active));
    }

    #[test]
    fn static_check_rejects_inverted_pair() {
        let spec = TriggerSpec::new(".about")
            .start("bottom top")
            .unwrap()
            .end("top bottom")
            .unwrap();
        assert!(matches!(
            spec.check_static(),
            Err(OrchestratorError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn geometry_check() {
        let spec = TriggerSpec::new(".hero").start("top top").unwrap().end("30% top").unwrap();
        let rect = Rect::new(0.0, 0.0, 1000.0, 900.0);
        assert!(spec.check_geometry(&rect, 900.0).is_ok());
        let spec = TriggerSpec::new(".hero").start("top top").unwrap().end("top 50%").unwrap();
        assert!(spec.check_geometry(&rect, 900.0).is_err());
    }
}
