//! Animation descriptors: immutable declarations of what to animate.
//!
//! A descriptor names its targets by selector, lists property deltas, and
//! carries timing (duration, easing, base delay, stagger). It holds no state;
//! [`AnimationDescriptor::resolve`] turns it into a [`RunnableAnimation`] for a
//! concrete, ordered target list.

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::AnimationDefaults;
use crate::ease::Easing;
use crate::error::AnimationError;
use crate::index_rule::IndexRule;
use crate::runnable::{RunnableAnimation, Tween};
use crate::target::TargetSource;
use scrollcue_api_core::Value;

/// Start or end value of a property delta.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    Fixed(Value),
    /// Scalar derived from the target's index, e.g. alternating entrance sides.
    PerIndex(IndexRule),
}

impl PropValue {
    /// Concrete value for target `index` of `count`.
    pub fn eval(&self, index: usize, count: usize) -> Value {
        match self {
            PropValue::Fixed(v) => v.clone(),
            PropValue::PerIndex(rule) => Value::Float(rule.eval(index, count)),
        }
    }
}

impl From<f32> for PropValue {
    fn from(v: f32) -> Self {
        PropValue::Fixed(Value::Float(v))
    }
}

impl From<Value> for PropValue {
    fn from(v: Value) -> Self {
        PropValue::Fixed(v)
    }
}

impl From<IndexRule> for PropValue {
    fn from(rule: IndexRule) -> Self {
        PropValue::PerIndex(rule)
    }
}

// JSON accepts a bare number as shorthand for a Float value.
#[derive(Deserialize)]
#[serde(untagged)]
enum PropValueRepr {
    Number(f32),
    Value(Value),
    Rule(IndexRule),
}

impl<'de> Deserialize<'de> for PropValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match PropValueRepr::deserialize(deserializer)? {
            PropValueRepr::Number(v) => PropValue::Fixed(Value::Float(v)),
            PropValueRepr::Value(v) => PropValue::Fixed(v),
            PropValueRepr::Rule(rule) => PropValue::PerIndex(rule),
        })
    }
}

/// One animated property. Without `from`, the start state is read from the
/// host at resolve time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyDelta {
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<PropValue>,
    pub to: PropValue,
}

/// Per-target delay offset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stagger {
    /// Fixed increment per index. A negative increment staggers from the last
    /// target backwards.
    Each(f32),
    /// Offset computed from the index.
    Rule(IndexRule),
}

impl Stagger {
    /// Offset added to the base delay of target `index` of `count`.
    pub fn offset(&self, index: usize, count: usize) -> f32 {
        match self {
            Stagger::Each(each) if *each >= 0.0 => index as f32 * each,
            Stagger::Each(each) => (count.saturating_sub(1) - index) as f32 * -each,
            Stagger::Rule(rule) => rule.eval(index, count),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// Immutable animation declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    #[serde(deserialize_with = "one_or_many")]
    targets: Vec<String>,
    props: Vec<PropertyDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ease: Option<Easing>,
    #[serde(default)]
    delay: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stagger: Option<Stagger>,
}

impl AnimationDescriptor {
    /// Start building a descriptor for `selector`.
    pub fn builder(selector: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(selector)
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn props(&self) -> &[PropertyDelta] {
        &self.props
    }

    pub fn duration(&self) -> Option<f32> {
        self.duration
    }

    pub fn ease(&self) -> Option<Easing> {
        self.ease
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn stagger(&self) -> Option<&Stagger> {
        self.stagger.as_ref()
    }

    /// Check timing and structure. Deserialized descriptors must pass this
    /// before they are registered.
    pub fn validate(&self) -> Result<(), AnimationError> {
        if self.targets.is_empty() {
            return Err(AnimationError::NoTargets);
        }
        if self.props.is_empty() {
            return Err(AnimationError::EmptyProperties);
        }
        if let Some(d) = self.duration {
            if !d.is_finite() || d < 0.0 {
                return Err(AnimationError::InvalidDuration { value: d });
            }
        }
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(AnimationError::InvalidDelay { value: self.delay });
        }
        if let Some(Stagger::Each(each)) = self.stagger {
            if !each.is_finite() {
                return Err(AnimationError::InvalidStagger { value: each });
            }
        }
        Ok(())
    }

    /// Effective start delay of each of `count` targets, in target order.
    ///
    /// Delays are clamped at zero: a per-index rule that yields negative
    /// offsets (e.g. alternating signs) starts those targets together at the
    /// base delay.
    pub fn start_delays(&self, count: usize) -> Vec<f32> {
        (0..count)
            .map(|i| {
                let offset = self.stagger.as_ref().map_or(0.0, |s| s.offset(i, count));
                let delay = self.delay + offset;
                if delay < 0.0 {
                    log::debug!("stagger offset {offset} for target {i} clamped to zero delay");
                }
                delay.max(0.0)
            })
            .collect()
    }

    /// Span this descriptor occupies on a timeline when it resolves to no
    /// targets: base delay plus duration.
    pub fn declared_span(&self, defaults: &AnimationDefaults) -> f32 {
        self.delay + self.duration.unwrap_or(defaults.duration).max(0.0)
    }

    /// Resolve against a concrete, ordered target list.
    ///
    /// Targets the host cannot read fall back to the property's resting value
    /// for `to`-style deltas; an empty target list yields an empty runnable.
    pub fn resolve(
        &self,
        targets: &[String],
        source: &dyn TargetSource,
        defaults: &AnimationDefaults,
    ) -> RunnableAnimation {
        let timing = defaults.overlay(self.ease, self.duration);
        let count = targets.len();
        let delays = self.start_delays(count);
        let mut tweens = Vec::with_capacity(count * self.props.len());
        for (index, (target, start)) in targets.iter().zip(delays).enumerate() {
            for delta in &self.props {
                let from = match &delta.from {
                    Some(v) => v.eval(index, count),
                    None => source
                        .read(target, &delta.property)
                        .unwrap_or_else(|| Value::rest_for(&delta.property)),
                };
                tweens.push(Tween {
                    target: target.clone(),
                    property: delta.property.clone(),
                    from,
                    to: delta.to.eval(index, count),
                    start,
                    duration: timing.duration.max(0.0),
                    ease: timing.ease,
                    step: 0,
                    index,
                });
            }
        }
        RunnableAnimation::new(tweens)
    }
}

/// Builder for [`AnimationDescriptor`]. Errors are collected and reported by
/// [`DescriptorBuilder::build`].
#[derive(Debug)]
pub struct DescriptorBuilder {
    inner: AnimationDescriptor,
    error: Option<AnimationError>,
}

impl DescriptorBuilder {
    fn new(selector: impl Into<String>) -> Self {
        Self {
            inner: AnimationDescriptor {
                targets: vec![selector.into()],
                props: Vec::new(),
                duration: None,
                ease: None,
                delay: 0.0,
                stagger: None,
            },
            error: None,
        }
    }

    /// Add another selector; its matches follow the previous ones in order.
    pub fn target(mut self, selector: impl Into<String>) -> Self {
        self.inner.targets.push(selector.into());
        self
    }

    pub fn from_to(
        mut self,
        property: impl Into<String>,
        from: impl Into<PropValue>,
        to: impl Into<PropValue>,
    ) -> Self {
        self.inner.props.push(PropertyDelta {
            property: property.into(),
            from: Some(from.into()),
            to: to.into(),
        });
        self
    }

    /// Animate from the host's current value.
    pub fn to(mut self, property: impl Into<String>, to: impl Into<PropValue>) -> Self {
        self.inner.props.push(PropertyDelta {
            property: property.into(),
            from: None,
            to: to.into(),
        });
        self
    }

    pub fn prop(mut self, delta: PropertyDelta) -> Self {
        self.inner.props.push(delta);
        self
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.inner.duration = Some(seconds);
        self
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.inner.ease = Some(ease);
        self
    }

    pub fn ease_named(mut self, name: &str) -> Self {
        match Easing::parse(name) {
            Ok(e) => self.inner.ease = Some(e),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.inner.delay = seconds;
        self
    }

    pub fn stagger(mut self, each: f32) -> Self {
        self.inner.stagger = Some(Stagger::Each(each));
        self
    }

    pub fn stagger_rule(mut self, rule: IndexRule) -> Self {
        self.inner.stagger = Some(Stagger::Rule(rule));
        self
    }

    pub fn build(self) -> Result<AnimationDescriptor, AnimationError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    struct Cards(usize);

    impl TargetSource for Cards {
        fn select(&self, selector: &str) -> Vec<String> {
            if selector == ".card" {
                (0..self.0).map(|i| format!("card#{i}")).collect()
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn stagger_produces_distinct_ordered_delays() {
        let d = AnimationDescriptor::builder(".card")
            .from_to("opacity", 0.0, 1.0)
            .stagger(0.1)
            .build()
            .unwrap();
        let delays = d.start_delays(5);
        let expected = [0.0, 0.1, 0.2, 0.3, 0.4];
        assert_eq!(delays.len(), 5);
        for (got, want) in delays.iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-6);
        }
    }

    #[test]
    fn negative_stagger_runs_backwards() {
        let d = AnimationDescriptor::builder(".card")
            .from_to("opacity", 0.0, 1.0)
            .delay(0.5)
            .stagger(-0.1)
            .build()
            .unwrap();
        let delays = d.start_delays(3);
        assert_abs_diff_eq!(delays[0], 0.7, epsilon = 1e-6);
        assert_abs_diff_eq!(delays[2], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn negative_rule_offsets_clamp_to_zero_delay() {
        let d = AnimationDescriptor::builder(".card")
            .from_to("opacity", 0.0, 1.0)
            .delay(0.1)
            .stagger_rule(IndexRule::Alternate {
                even: 0.2,
                odd: -0.3,
            })
            .build()
            .unwrap();
        let delays = d.start_delays(4);
        assert_abs_diff_eq!(delays[0], 0.3, epsilon = 1e-6);
        assert_eq!(delays[1], 0.0);
        assert_abs_diff_eq!(delays[2], 0.3, epsilon = 1e-6);
        assert_eq!(delays[3], 0.0);
    }

    #[test]
    fn declared_span_falls_back_to_default_duration() {
        let d = AnimationDescriptor::builder(".card")
            .from_to("opacity", 0.0, 1.0)
            .delay(0.2)
            .build()
            .unwrap();
        let defaults = AnimationDefaults::default();
        assert_abs_diff_eq!(d.declared_span(&defaults), 0.2 + defaults.duration, epsilon = 1e-6);
    }

    #[test]
    fn per_index_values_resolve_in_target_order() {
        let d = AnimationDescriptor::builder(".card")
            .from_to(
                "x",
                IndexRule::FirstThenRest {
                    first: -50.0,
                    rest: 50.0,
                },
                0.0,
            )
            .build()
            .unwrap();
        let run = d.resolve(
            &Cards(3).select(".card"),
            &Cards(3),
            &AnimationDefaults::default(),
        );
        let froms: Vec<Value> = run.tweens().iter().map(|t| t.from.clone()).collect();
        assert_eq!(
            froms,
            vec![Value::Float(-50.0), Value::Float(50.0), Value::Float(50.0)]
        );
    }

    #[test]
    fn to_style_delta_falls_back_to_rest_value() {
        let d = AnimationDescriptor::builder(".card")
            .to("opacity", 0.0)
            .build()
            .unwrap();
        let run = d.resolve(&["card#0".to_string()], &Cards(1), &AnimationDefaults::default());
        assert_eq!(run.tweens()[0].from, Value::Float(1.0));
    }

    #[test]
    fn builder_rejects_bad_input() {
        assert_eq!(
            AnimationDescriptor::builder(".card").build(),
            Err(AnimationError::EmptyProperties)
        );
        assert!(matches!(
            AnimationDescriptor::builder(".card")
                .from_to("y", 10.0, 0.0)
                .duration(-1.0)
                .build(),
            Err(AnimationError::InvalidDuration { .. })
        ));
        assert!(matches!(
            AnimationDescriptor::builder(".card")
                .from_to("y", 10.0, 0.0)
                .ease_named("wobble")
                .build(),
            Err(AnimationError::UnknownEasing { .. })
        ));
    }

    #[test]
    fn json_accepts_shorthand() {
        let json = r#"{
            "targets": ".contact-card",
            "props": [
                { "property": "opacity", "from": 0, "to": 1 },
                { "property": "x", "from": { "first_then_rest": { "first": -50, "rest": 50 } }, "to": 0 }
            ],
            "duration": 0.8,
            "ease": "power3.out",
            "stagger": 0.1
        }"#;
        let d: AnimationDescriptor = serde_json::from_str(json).unwrap();
        d.validate().unwrap();
        assert_eq!(d.targets(), &[".contact-card".to_string()]);
        assert_eq!(d.props()[0].from, Some(PropValue::Fixed(Value::Float(0.0))));
        assert!(matches!(d.props()[1].from, Some(PropValue::PerIndex(_))));
        assert_eq!(d.stagger(), Some(&Stagger::Each(0.1)));
    }
}
