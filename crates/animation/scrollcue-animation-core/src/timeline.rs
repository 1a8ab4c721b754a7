//! Timeline sequencing.
//!
//! A timeline is an ordered list of descriptors, each placed relative to the
//! step before it. Steps keep their declared order when sampled even when
//! their absolute windows overlap.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::AnimationDefaults;
use crate::descriptor::AnimationDescriptor;
use crate::ease::Easing;
use crate::error::AnimationError;
use crate::runnable::RunnableAnimation;
use crate::target::{select_all, TargetSource};
use scrollcue_api_core::{PropPath, Value};

/// Where a step starts relative to its predecessor.
///
/// String forms: `""`/`">"` sequential, `"+=0.2"`/`"-=0.3"` relative to the
/// previous end, `"<"`/`"<0.2"` relative to the previous start, a bare number
/// for an absolute time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Position {
    #[default]
    Sequential,
    Offset(f32),
    WithPrevious(f32),
    At(f32),
}

impl Position {
    pub fn parse(input: &str) -> Result<Self, AnimationError> {
        let s = input.trim();
        let bad = || AnimationError::InvalidPosition {
            input: input.to_string(),
        };
        let number = |txt: &str| -> Result<f32, AnimationError> {
            let v: f32 = txt.trim().parse().map_err(|_| bad())?;
            if v.is_finite() {
                Ok(v)
            } else {
                Err(bad())
            }
        };
        if s.is_empty() || s == ">" {
            return Ok(Position::Sequential);
        }
        if let Some(rest) = s.strip_prefix("+=") {
            return Ok(Position::Offset(number(rest)?));
        }
        if let Some(rest) = s.strip_prefix("-=") {
            return Ok(Position::Offset(-number(rest)?));
        }
        if let Some(rest) = s.strip_prefix('<') {
            let rest = rest.trim();
            if rest.is_empty() {
                return Ok(Position::WithPrevious(0.0));
            }
            let delta = if let Some(r) = rest.strip_prefix("+=") {
                number(r)?
            } else if let Some(r) = rest.strip_prefix("-=") {
                -number(r)?
            } else {
                number(rest)?
            };
            return Ok(Position::WithPrevious(delta));
        }
        Ok(Position::At(number(s)?))
    }

    /// Start time given the previous step's window.
    pub fn resolve(self, prev_start: f32, prev_end: f32) -> f32 {
        let t = match self {
            Position::Sequential => prev_end,
            Position::Offset(d) => prev_end + d,
            Position::WithPrevious(d) => prev_start + d,
            Position::At(t) => t,
        };
        t.max(0.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Sequential => f.write_str(">"),
            Position::Offset(d) if *d < 0.0 => write!(f, "-={}", -d),
            Position::Offset(d) => write!(f, "+={d}"),
            Position::WithPrevious(d) if *d == 0.0 => f.write_str("<"),
            Position::WithPrevious(d) => write!(f, "<{d}"),
            Position::At(t) => write!(f, "{t}"),
        }
    }
}

impl FromStr for Position {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::parse(s)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Position::At(t) => serializer.serialize_f32(*t),
            other => serializer.collect_str(other),
        }
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            At(f32),
            Text(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::At(t) => Ok(Position::At(t)),
            Repr::Text(s) => Position::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Shared defaults for every step of one timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<Easing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineStep {
    #[serde(flatten)]
    pub descriptor: AnimationDescriptor,
    #[serde(default)]
    pub position: Position,
}

/// Ordered descriptors with relative start positions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    defaults: TimelineDefaults,
    steps: Vec<TimelineStep>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: TimelineDefaults) -> Self {
        Self {
            defaults,
            steps: Vec::new(),
        }
    }

    /// Append a step (builder form).
    pub fn then(mut self, descriptor: AnimationDescriptor, position: Position) -> Self {
        self.push(descriptor, position);
        self
    }

    pub fn push(&mut self, descriptor: AnimationDescriptor, position: Position) {
        self.steps.push(TimelineStep {
            descriptor,
            position,
        });
    }

    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    pub fn defaults(&self) -> &TimelineDefaults {
        &self.defaults
    }

    pub fn validate(&self) -> Result<(), AnimationError> {
        if let Some(d) = self.defaults.duration {
            if !d.is_finite() || d < 0.0 {
                return Err(AnimationError::InvalidDuration { value: d });
            }
        }
        self.steps.iter().try_for_each(|s| s.descriptor.validate())
    }

    /// Absolute start of each step given each step's span, plus the total
    /// (max over steps of start + span).
    pub fn layout(&self, spans: &[f32]) -> (Vec<f32>, f32) {
        let mut starts = Vec::with_capacity(self.steps.len());
        let (mut prev_start, mut prev_end, mut total) = (0.0f32, 0.0f32, 0.0f32);
        for (step, span) in self.steps.iter().zip(spans) {
            let start = step.position.resolve(prev_start, prev_end);
            let end = start + span.max(0.0);
            starts.push(start);
            total = total.max(end);
            prev_start = start;
            prev_end = end;
        }
        (starts, total)
    }

    /// Resolve every step against `source` and merge them onto one time axis.
    ///
    /// `to`-style deltas read the value an earlier step leaves behind before
    /// falling back to the host.
    pub fn resolve(&self, source: &dyn TargetSource, defaults: &AnimationDefaults) -> RunnableAnimation {
        let effective = defaults.overlay(self.defaults.ease, self.defaults.duration);
        let mut carried: IndexMap<PropPath, Value> = IndexMap::new();
        let mut runs = Vec::with_capacity(self.steps.len());
        let mut spans = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let targets = select_all(source, step.descriptor.targets());
            let chained = Carried {
                inner: source,
                values: &carried,
            };
            let run = step.descriptor.resolve(&targets, &chained, &effective);
            for tween in run.tweens() {
                carried.insert(tween.path(), tween.to.clone());
            }
            // A step with no targets keeps its slot so later positions do not shift.
            spans.push(if run.is_empty() {
                step.descriptor.declared_span(&effective)
            } else {
                run.duration()
            });
            runs.push(run);
        }
        let (starts, total) = self.layout(&spans);
        let tweens = runs
            .into_iter()
            .zip(starts)
            .enumerate()
            .flat_map(|(i, (run, start))| run.shifted(start, i).into_tweens())
            .collect();
        RunnableAnimation::with_duration(tweens, total)
    }
}

struct Carried<'a> {
    inner: &'a dyn TargetSource,
    values: &'a IndexMap<PropPath, Value>,
}

impl TargetSource for Carried<'_> {
    fn select(&self, selector: &str) -> Vec<String> {
        self.inner.select(selector)
    }

    fn read(&self, target: &str, property: &str) -> Option<Value> {
        self.values
            .get(&PropPath::new(target, property))
            .cloned()
            .or_else(|| self.inner.read(target, property))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_position_forms() {
        assert_eq!(Position::parse("").unwrap(), Position::Sequential);
        assert_eq!(Position::parse(">").unwrap(), Position::Sequential);
        assert_eq!(Position::parse("-=0.3").unwrap(), Position::Offset(-0.3));
        assert_eq!(Position::parse("+=1").unwrap(), Position::Offset(1.0));
        assert_eq!(Position::parse("<").unwrap(), Position::WithPrevious(0.0));
        assert_eq!(Position::parse("<0.2").unwrap(), Position::WithPrevious(0.2));
        assert_eq!(Position::parse("<-=0.1").unwrap(), Position::WithPrevious(-0.1));
        assert_eq!(Position::parse("2").unwrap(), Position::At(2.0));
        assert!(Position::parse("soon").is_err());
        assert!(Position::parse("-=x").is_err());
    }

    #[test]
    fn position_serde_accepts_number_or_string() {
        let p: Position = serde_json::from_str("\"-=0.5\"").unwrap();
        assert_eq!(p, Position::Offset(-0.5));
        let p: Position = serde_json::from_str("1.5").unwrap();
        assert_eq!(p, Position::At(1.5));
        assert_eq!(serde_json::to_string(&Position::Offset(-0.5)).unwrap(), "\"-=0.5\"");
    }

    #[test]
    fn starts_never_go_negative() {
        assert_eq!(Position::Offset(-5.0).resolve(0.0, 1.0), 0.0);
        assert_eq!(Position::WithPrevious(0.25).resolve(1.0, 2.0), 1.25);
    }
}
