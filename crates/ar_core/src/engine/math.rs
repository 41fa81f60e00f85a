//! 2D helpers on plain `(f32, f32)` tuples.

use std::f32::consts::PI;

/// Denominator floor for divisions by lengths that may collapse to zero.
pub const EPSILON: f32 = 1e-6;

#[inline]
pub fn length(v: (f32, f32)) -> f32 {
    (v.0 * v.0 + v.1 * v.1).sqrt()
}

#[inline]
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    length((b.0 - a.0, b.1 - a.1))
}

#[inline]
pub fn distance_sq(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    dx * dx + dy * dy
}

/// Unit vector, or `(0, 0)` for a degenerate input.
#[inline]
pub fn normalize(v: (f32, f32)) -> (f32, f32) {
    let len = length(v);
    if len < EPSILON {
        (0.0, 0.0)
    } else {
        (v.0 / len, v.1 / len)
    }
}

#[inline]
pub fn dot(a: (f32, f32), b: (f32, f32)) -> f32 {
    a.0 * b.0 + a.1 * b.1
}

/// z component of the 3D cross product; positive when `b` is counter-clockwise of `a`.
#[inline]
pub fn cross(a: (f32, f32), b: (f32, f32)) -> f32 {
    a.0 * b.1 - a.1 * b.0
}

#[inline]
pub fn from_angle(angle: f32) -> (f32, f32) {
    (angle.cos(), angle.sin())
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wraps an angle into (-π, π].
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}
