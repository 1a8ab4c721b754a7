//! Interpolation helpers:
//! - lerp_* (component-wise)
//! - lerp_value (numeric kinds blend, Bool/Text step at the end)
//! - bezier_ease_t (cubic-bezier timing curve inversion)

use scrollcue_api_core::Value;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [lerp_f32(a[0], b[0], t), lerp_f32(a[1], b[1], t)]
}

#[inline]
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
pub fn lerp_vec4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ]
}

/// Interpolate across Value kinds with an already-eased `t`.
///
/// `t` may leave [0, 1] for overshooting curves (back, elastic); numeric kinds
/// extrapolate, step kinds switch to `b` once `t >= 1`.
pub fn lerp_value(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Float(va), Value::Float(vb)) => Value::Float(lerp_f32(*va, *vb, t)),
        (Value::Vec2(va), Value::Vec2(vb)) => Value::Vec2(lerp_vec2(*va, *vb, t)),
        (Value::Vec3(va), Value::Vec3(vb)) => Value::Vec3(lerp_vec3(*va, *vb, t)),
        (Value::Vec4(va), Value::Vec4(vb)) => Value::Vec4(lerp_vec4(*va, *vb, t)),
        (Value::ColorRgba(ca), Value::ColorRgba(cb)) => Value::ColorRgba(lerp_vec4(*ca, *cb, t)),
        (Value::Bool(_), Value::Bool(_)) | (Value::Text(_), Value::Text(_)) => {
            if t >= 1.0 {
                b.clone()
            } else {
                a.clone()
            }
        }
        // Fallback: if types mismatch, prefer left (fail-soft).
        _ => a.clone(),
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
#[inline]
pub fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    // Fast path: Bezier(0,0,1,1) is exactly linear -> eased t == t
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    // Monotonic X in [0,1] assumed for x1/x2 ∈ [0,1]
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_kinds_extrapolate_for_overshoot() {
        let v = lerp_value(&Value::Float(0.0), &Value::Float(10.0), 1.2);
        assert_eq!(v, Value::Float(12.0));
    }

    #[test]
    fn step_kinds_switch_at_end() {
        let a = Value::Text("closed".into());
        let b = Value::Text("open".into());
        assert_eq!(lerp_value(&a, &b, 0.99), a);
        assert_eq!(lerp_value(&a, &b, 1.0), b);
    }

    #[test]
    fn mismatched_kinds_keep_left() {
        let a = Value::Float(1.0);
        let b = Value::Vec2([0.0, 0.0]);
        assert_eq!(lerp_value(&a, &b, 0.5), a);
    }

    #[test]
    fn linear_bezier_is_identity() {
        assert_eq!(bezier_ease_t(0.37, 0.0, 0.0, 1.0, 1.0), 0.37);
    }
}
