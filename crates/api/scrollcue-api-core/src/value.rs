//! Value: animatable property payloads.
//! All numeric types use f32.

use serde::{Deserialize, Serialize};

/// Coarse kind tag, handy for pattern-matching and mismatch checks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Bool,
    Vec2,
    Vec3,
    Vec4,
    ColorRgba,
    Text,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Scalar float (offsets, rotations in degrees, opacity, stroke offset)
    Float(f32),

    /// Boolean (step)
    Bool(bool),

    /// 2D vector
    Vec2([f32; 2]),

    /// 3D vector
    Vec3([f32; 3]),

    /// 4D vector; clip insets are stored as (top, right, bottom, left) percentages
    Vec4([f32; 4]),

    /// RGBA color
    ColorRgba([f32; 4]),

    /// Text / string; step-only for interpolation
    Text(String),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Vec4(_) => ValueKind::Vec4,
            Value::ColorRgba(_) => ValueKind::ColorRgba,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Scalar payload, if this is a `Float`.
    #[inline]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Convenience constructors
    pub fn f(v: f32) -> Self {
        Value::Float(v)
    }

    pub fn inset(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Value::Vec4([top, right, bottom, left])
    }

    /// Resting value for a property when the host cannot report one.
    ///
    /// Multiplicative properties (`opacity`, `scale`, `scaleX`, ...) rest at 1,
    /// everything else at 0.
    pub fn rest_for(property: &str) -> Self {
        if property == "opacity" || property.starts_with("scale") {
            Value::Float(1.0)
        } else {
            Value::Float(0.0)
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_values_follow_property_semantics() {
        assert_eq!(Value::rest_for("opacity"), Value::Float(1.0));
        assert_eq!(Value::rest_for("scaleX"), Value::Float(1.0));
        assert_eq!(Value::rest_for("rotateY"), Value::Float(0.0));
        assert_eq!(Value::rest_for("strokeDashoffset"), Value::Float(0.0));
    }

    #[test]
    fn tagged_json_shape() {
        let s = serde_json::to_string(&Value::inset(100.0, 0.0, 0.0, 0.0)).unwrap();
        assert_eq!(s, r#"{"type":"Vec4","data":[100.0,0.0,0.0,0.0]}"#);
        let back: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(back.kind(), ValueKind::Vec4);
    }
}
