//! Pointer tilt: pointer offset from an element's center mapped to a bounded
//! 3D rotation, eased over a short transition.
//!
//! Tilt controllers are keyed by element handle and live outside the scope
//! registry.

use serde::{Deserialize, Serialize};

use scrollcue_animation_core::{Curve, EaseKind, Easing};

use crate::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Degrees of rotation at the element's edge.
    pub sensitivity: f32,
    /// Absolute clamp in degrees, applied after scaling.
    pub max_rotation: f32,
    pub move_duration: f32,
    pub leave_duration: f32,
    pub ease: Easing,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            sensitivity: 5.0,
            max_rotation: 5.0,
            move_duration: 0.3,
            leave_duration: 0.5,
            ease: Easing::Curve {
                curve: Curve::Power(2),
                kind: EaseKind::Out,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tilt {
    pub rotate_x: f32,
    pub rotate_y: f32,
}

impl Tilt {
    pub const NEUTRAL: Tilt = Tilt {
        rotate_x: 0.0,
        rotate_y: 0.0,
    };
}

/// Target rotation for a pointer at `(x, y)` over `bounds`.
pub fn tilt_target(bounds: &Rect, x: f32, y: f32, cfg: &TiltConfig) -> Tilt {
    let (cx, cy) = bounds.center();
    let half_w = bounds.width * 0.5;
    let half_h = bounds.height * 0.5;
    let nx = if half_w > 0.0 { (x - cx) / half_w } else { 0.0 };
    let ny = if half_h > 0.0 { (y - cy) / half_h } else { 0.0 };
    let limit = cfg.max_rotation.abs();
    Tilt {
        rotate_x: (-ny * cfg.sensitivity).clamp(-limit, limit),
        rotate_y: (nx * cfg.sensitivity).clamp(-limit, limit),
    }
}

/// Easing from the current rotation to a target.
#[derive(Clone, Debug, PartialEq)]
pub struct TiltTween {
    from: Tilt,
    to: Tilt,
    elapsed: f32,
    duration: f32,
    ease: Easing,
}

impl TiltTween {
    pub fn new(to: Tilt, duration: f32, ease: Easing) -> Self {
        Self {
            from: Tilt::NEUTRAL,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
            ease,
        }
    }

    /// Aim at a new target, starting from wherever the rotation is now.
    pub fn retarget(&mut self, to: Tilt, duration: f32, ease: Easing) {
        self.from = self.current();
        self.to = to;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
        self.ease = ease;
    }

    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
    }

    pub fn current(&self) -> Tilt {
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            return self.to;
        }
        let k = self.ease.apply(self.elapsed / self.duration);
        Tilt {
            rotate_x: self.from.rotate_x + (self.to.rotate_x - self.from.rotate_x) * k,
            rotate_y: self.from.rotate_y + (self.to.rotate_y - self.from.rotate_y) * k,
        }
    }

    pub fn target(&self) -> Tilt {
        self.to
    }

    pub fn is_settled(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration
    }
}

/// Tilt state for one element: the running tween plus whether the host has
/// seen its latest value.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerTilt {
    tween: TiltTween,
    dirty: bool,
}

impl PointerTilt {
    pub fn new(target: Tilt, cfg: &TiltConfig) -> Self {
        Self {
            tween: TiltTween::new(target, cfg.move_duration, cfg.ease),
            dirty: true,
        }
    }

    pub fn pointer_move(&mut self, target: Tilt, cfg: &TiltConfig) {
        self.tween.retarget(target, cfg.move_duration, cfg.ease);
        self.dirty = true;
    }

    pub fn pointer_leave(&mut self, cfg: &TiltConfig) {
        self.tween.retarget(Tilt::NEUTRAL, cfg.leave_duration, cfg.ease);
        self.dirty = true;
    }

    /// Advance by `dt`; returns the rotation to write, if it changed.
    pub fn advance(&mut self, dt: f32) -> Option<Tilt> {
        let moving = self.dirty || !self.tween.is_settled();
        self.tween.advance(dt);
        self.dirty = false;
        moving.then(|| self.tween.current())
    }

    pub fn current(&self) -> Tilt {
        self.tween.current()
    }

    /// Back at neutral with nothing left to write.
    pub fn is_done(&self) -> bool {
        !self.dirty && self.tween.is_settled() && self.tween.target() == Tilt::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn card() -> Rect {
        Rect::new(100.0, 200.0, 400.0, 300.0)
    }

    #[test]
    fn center_is_neutral() {
        let cfg = TiltConfig::default();
        let t = tilt_target(&card(), 300.0, 350.0, &cfg);
        assert_abs_diff_eq!(t.rotate_x, 0.0);
        assert_abs_diff_eq!(t.rotate_y, 0.0);
    }

    #[test]
    fn right_edge_is_max_rotate_y() {
        let cfg = TiltConfig::default();
        let t = tilt_target(&card(), 500.0, 350.0, &cfg);
        assert_abs_diff_eq!(t.rotate_y, cfg.max_rotation);
        assert_abs_diff_eq!(t.rotate_x, 0.0);

        let outside = tilt_target(&card(), 900.0, 100.0, &cfg);
        assert_abs_diff_eq!(outside.rotate_y, cfg.max_rotation);
        assert_abs_diff_eq!(outside.rotate_x, cfg.max_rotation);
    }

    #[test]
    fn top_edge_tilts_back() {
        let t = tilt_target(&card(), 300.0, 200.0, &TiltConfig::default());
        assert!(t.rotate_x > 0.0);
    }

    #[test]
    fn retarget_starts_from_current() {
        let cfg = TiltConfig::default();
        let mut tw = TiltTween::new(Tilt { rotate_x: 0.0, rotate_y: 4.0 }, 1.0, Easing::Linear);
        tw.advance(0.5);
        assert_abs_diff_eq!(tw.current().rotate_y, 2.0);
        tw.retarget(Tilt::NEUTRAL, cfg.leave_duration, cfg.ease);
        assert_abs_diff_eq!(tw.current().rotate_y, 2.0);
        tw.advance(cfg.leave_duration);
        assert!(tw.is_settled());
        assert_eq!(tw.current(), Tilt::NEUTRAL);
    }

    #[test]
    fn pointer_tilt_returns_to_neutral_within_leave_duration() {
        let cfg = TiltConfig::default();
        let mut tilt = PointerTilt::new(Tilt { rotate_x: 0.0, rotate_y: 5.0 }, &cfg);
        let mut last = None;
        for _ in 0..30 {
            last = tilt.advance(1.0 / 60.0).or(last);
        }
        assert_abs_diff_eq!(tilt.current().rotate_y, 5.0);
        tilt.pointer_leave(&cfg);
        let mut elapsed = 0.0;
        while elapsed < cfg.leave_duration {
            tilt.advance(0.05);
            elapsed += 0.05;
        }
        tilt.advance(0.05);
        assert_eq!(tilt.current(), Tilt::NEUTRAL);
        assert!(tilt.is_done());
        assert!(tilt.advance(0.05).is_none());
        assert!(last.is_some());
    }
}
