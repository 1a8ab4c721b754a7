//! Resolved animations: concrete per-target tweens on a shared time axis.

use indexmap::IndexMap;

use crate::ease::functions::lerp_value;
use crate::ease::Easing;
use scrollcue_api_core::{PropPath, Value, WriteBatch, WriteOp};

/// One property of one target interpolating over `[start, start + duration]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub target: String,
    pub property: String,
    pub from: Value,
    pub to: Value,
    /// Absolute start time in seconds (base delay + stagger + step position).
    pub start: f32,
    pub duration: f32,
    pub ease: Easing,
    /// Timeline step index; 0 for plain descriptors.
    pub step: usize,
    /// Position of the target within its step's target list.
    pub index: usize,
}

impl Tween {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    pub fn path(&self) -> PropPath {
        PropPath::new(self.target.clone(), self.property.clone())
    }

    /// Value at absolute time `t`. Zero-length tweens jump to `to` at `start`.
    pub fn value_at(&self, t: f32) -> Value {
        if self.duration <= 0.0 {
            return if t >= self.start {
                self.to.clone()
            } else {
                self.from.clone()
            };
        }
        let local = ((t - self.start) / self.duration).clamp(0.0, 1.0);
        lerp_value(&self.from, &self.to, self.ease.apply(local))
    }
}

/// A descriptor or timeline resolved against concrete targets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunnableAnimation {
    tweens: Vec<Tween>,
    duration: f32,
}

impl RunnableAnimation {
    /// Total duration is the latest tween end.
    pub fn new(tweens: Vec<Tween>) -> Self {
        let duration = tweens.iter().map(Tween::end).fold(0.0, f32::max);
        Self { tweens, duration }
    }

    /// Explicit total; never shorter than the latest tween end.
    pub fn with_duration(tweens: Vec<Tween>, duration: f32) -> Self {
        let mut run = Self::new(tweens);
        run.duration = run.duration.max(duration);
        run
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Distinct target handles in first-seen order.
    pub fn targets(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for t in &self.tweens {
            if !out.contains(&t.target.as_str()) {
                out.push(&t.target);
            }
        }
        out
    }

    /// Property values at absolute time `t`, one write per path.
    ///
    /// A tween that has not started yet holds its `from` value only if no
    /// earlier tween already claimed the path. Among started tweens the latest
    /// declared wins.
    pub fn sample(&self, t: f32) -> WriteBatch {
        let mut out: IndexMap<PropPath, Value> = IndexMap::with_capacity(self.tweens.len());
        for tween in &self.tweens {
            if t >= tween.start {
                out.insert(tween.path(), tween.value_at(t));
            } else {
                out.entry(tween.path()).or_insert_with(|| tween.from.clone());
            }
        }
        let mut batch = WriteBatch::new();
        batch.extend(out.into_iter().map(|(path, value)| WriteOp::new(path, value)));
        batch
    }

    /// Sample at normalized progress; `p` is clamped to `[0, 1]`.
    pub fn sample_progress(&self, p: f32) -> WriteBatch {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        if p >= 1.0 {
            return self.end_state();
        }
        if p <= 0.0 {
            return self.start_state();
        }
        self.sample(p * self.duration)
    }

    /// State before any tween has started.
    pub fn start_state(&self) -> WriteBatch {
        self.sample(f32::NEG_INFINITY)
    }

    /// State after every tween has finished.
    pub fn end_state(&self) -> WriteBatch {
        self.sample(f32::INFINITY)
    }

    /// Shift every tween by `offset` seconds and tag it with timeline `step`.
    pub fn shifted(mut self, offset: f32, step: usize) -> Self {
        for t in &mut self.tweens {
            t.start += offset;
            t.step = step;
        }
        self.duration += offset;
        self
    }

    /// Consume into tweens.
    pub fn into_tweens(self) -> Vec<Tween> {
        self.tweens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tween(property: &str, from: f32, to: f32, start: f32, duration: f32) -> Tween {
        Tween {
            target: "title".into(),
            property: property.into(),
            from: Value::Float(from),
            to: Value::Float(to),
            start,
            duration,
            ease: Easing::Linear,
            step: 0,
            index: 0,
        }
    }

    fn float(batch: &WriteBatch, path: &str) -> f32 {
        batch
            .get(&PropPath::parse(path).unwrap())
            .and_then(Value::as_float)
            .unwrap()
    }

    #[test]
    fn pending_tween_holds_from_value() {
        let run = RunnableAnimation::new(vec![tween("y", 100.0, 0.0, 0.5, 1.0)]);
        assert_abs_diff_eq!(float(&run.sample(0.0), "title.y"), 100.0);
        assert_abs_diff_eq!(float(&run.sample(1.0), "title.y"), 50.0);
        assert_abs_diff_eq!(float(&run.sample(9.0), "title.y"), 0.0);
        assert_abs_diff_eq!(run.duration(), 1.5);
    }

    #[test]
    fn later_pending_tween_does_not_clobber_earlier_owner() {
        let run = RunnableAnimation::new(vec![
            tween("opacity", 0.0, 1.0, 0.0, 1.0),
            tween("opacity", 1.0, 0.0, 2.0, 1.0),
        ]);
        assert_abs_diff_eq!(float(&run.sample(0.5), "title.opacity"), 0.5);
        assert_abs_diff_eq!(float(&run.sample(1.5), "title.opacity"), 1.0);
        assert_abs_diff_eq!(float(&run.sample(2.5), "title.opacity"), 0.5);
        assert_eq!(run.sample(2.5).len(), 1);
    }

    #[test]
    fn zero_duration_jumps_at_start() {
        let run = RunnableAnimation::new(vec![tween("x", 0.0, 10.0, 0.2, 0.0)]);
        assert_abs_diff_eq!(float(&run.sample(0.1), "title.x"), 0.0);
        assert_abs_diff_eq!(float(&run.sample(0.2), "title.x"), 10.0);
        assert_abs_diff_eq!(float(&run.start_state(), "title.x"), 0.0);
        assert_abs_diff_eq!(float(&run.end_state(), "title.x"), 10.0);
    }

    #[test]
    fn progress_is_clamped() {
        let run = RunnableAnimation::new(vec![tween("x", 0.0, 10.0, 0.0, 2.0)]);
        assert_abs_diff_eq!(float(&run.sample_progress(-3.0), "title.x"), 0.0);
        assert_abs_diff_eq!(float(&run.sample_progress(0.25), "title.x"), 2.5);
        assert_abs_diff_eq!(float(&run.sample_progress(7.0), "title.x"), 10.0);
    }

    #[test]
    fn shifted_moves_tweens_and_duration() {
        let run = RunnableAnimation::new(vec![tween("x", 0.0, 1.0, 0.1, 1.0)]).shifted(0.5, 3);
        assert_abs_diff_eq!(run.tweens()[0].start, 0.6, epsilon = 1e-6);
        assert_eq!(run.tweens()[0].step, 3);
        assert_abs_diff_eq!(run.duration(), 1.6, epsilon = 1e-6);
    }
}
