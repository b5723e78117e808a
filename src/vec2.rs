// src/vec2.rs

/// 2D vector dot product.
#[inline]
pub fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

/// Euclidean length.
#[inline]
pub fn norm(v: [f64; 2]) -> f64 {
    dot(v, v).sqrt()
}

/// Polar angle of a vector in [-pi, pi] (atan2(vy, vx)).
#[inline]
pub fn angle(v: [f64; 2]) -> f64 {
    v[1].atan2(v[0])
}

/// Rotate a vector by +90 degrees: (x, y) -> (-y, x).
#[inline]
pub fn perp(v: [f64; 2]) -> [f64; 2] {
    [-v[1], v[0]]
}
