// src/textures.rs
//
// Closed-form 2D spin textures.
//
// Every family shares the radial envelope
//     E(d) = d^n * exp(-3 (d/r)^2)
// and differs only in the in-plane orientation it assigns to the polar angle.
//
// Conventions:
// - (x, y) are in the same units as r.
// - Néel divides by d and returns NaN at the exact origin. This is kept as-is;
//   sampling grids with an even node count never hit the origin.
// - Bubble / Néel bubble recover the second component through a square root,
//   so it never changes sign. Also kept as-is.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2};
use std::fmt;
use std::str::FromStr;

use ndarray::{Array, Dimension, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{LtemError, Result};

/// Shape knobs shared by the texture families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeParams {
    /// Radius: sets where the envelope decays.
    pub r: f64,
    /// Polynomial order near the core; also the order of the antiskyrmion.
    pub n: f64,
    /// Winding number (Néel and Bloch skyrmions only).
    pub w: f64,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            r: 1.0,
            n: 1.0,
            w: 1.0,
        }
    }
}

impl ShapeParams {
    pub fn new(r: f64, n: f64, w: f64) -> Self {
        Self { r, n, w }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.r.is_finite() && self.r > 0.0) {
            return Err(LtemError::invalid("r", format!("radius must be positive, got {}", self.r)));
        }
        if !(self.n.is_finite() && self.n >= 0.0) {
            return Err(LtemError::invalid("n", format!("order must be >= 0, got {}", self.n)));
        }
        if !self.w.is_finite() {
            return Err(LtemError::invalid("w", "winding number must be finite"));
        }
        Ok(())
    }
}

/// The five named texture families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureKind {
    NeelSkyrmion,
    BlochSkyrmion,
    Antiskyrmion,
    Bubble,
    NeelBubble,
}

impl TextureKind {
    pub const ALL: [TextureKind; 5] = [
        Self::NeelSkyrmion,
        Self::BlochSkyrmion,
        Self::Antiskyrmion,
        Self::Bubble,
        Self::NeelBubble,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeelSkyrmion => "neel_skyrmion",
            Self::BlochSkyrmion => "bloch_skyrmion",
            Self::Antiskyrmion => "antiskyrmion",
            Self::Bubble => "bubble",
            Self::NeelBubble => "neel_bubble",
        }
    }

    /// Whether the winding number `w` enters this family's formula.
    pub fn uses_winding(&self) -> bool {
        matches!(self, Self::NeelSkyrmion | Self::BlochSkyrmion)
    }

    /// Evaluate the texture at a single point.
    #[inline]
    pub fn evaluate(&self, x: f64, y: f64, p: &ShapeParams) -> (f64, f64) {
        match self {
            Self::NeelSkyrmion => neel_skyrmion(x, y, p),
            Self::BlochSkyrmion => bloch_skyrmion(x, y, p),
            Self::Antiskyrmion => antiskyrmion(x, y, p),
            Self::Bubble => bubble(x, y, p),
            Self::NeelBubble => neel_bubble(x, y, p),
        }
    }

    /// Elementwise evaluation over equal-shaped arrays of any dimension.
    pub fn evaluate_array<D: Dimension>(
        &self,
        x: &Array<f64, D>,
        y: &Array<f64, D>,
        p: &ShapeParams,
    ) -> Result<(Array<f64, D>, Array<f64, D>)> {
        if x.shape() != y.shape() {
            return Err(LtemError::ShapeMismatch {
                x: x.shape().to_vec(),
                y: y.shape().to_vec(),
            });
        }
        let mut sx = Array::zeros(x.raw_dim());
        let mut sy = Array::zeros(x.raw_dim());
        Zip::from(&mut sx)
            .and(&mut sy)
            .and(x)
            .and(y)
            .for_each(|sx, sy, &x, &y| {
                (*sx, *sy) = self.evaluate(x, y, p);
            });
        Ok((sx, sy))
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextureKind {
    type Err = LtemError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| LtemError::UnknownTexture(s.to_string()))
    }
}

/// Radial envelope `d^n * exp(-3 (d/r)^2)`.
#[inline]
pub fn envelope(d: f64, r: f64, n: f64) -> f64 {
    d.powf(n) * (-3.0 * (d / r).powi(2)).exp()
}

/// Radius at which [`envelope`] peaks: `r * sqrt(n/6)`.
pub fn envelope_peak(r: f64, n: f64) -> f64 {
    r * (n / 6.0).sqrt()
}

/// Radial (hedgehog) texture scaled by the winding number.
pub fn neel_skyrmion(x: f64, y: f64, p: &ShapeParams) -> (f64, f64) {
    let d = (x * x + y * y).sqrt();
    let e = envelope(d, p.r, p.n);
    (p.w * x / d * e, p.w * y / d * e)
}

/// Tangential (vortex-like) texture scaled by the winding number.
pub fn bloch_skyrmion(x: f64, y: f64, p: &ShapeParams) -> (f64, f64) {
    let d = (x * x + y * y).sqrt();
    let phi = y.atan2(x);
    let e = envelope(d, p.r, p.n);
    (-p.w * e * phi.sin(), p.w * e * phi.cos())
}

/// n-fold antiskyrmion; the sign alternation comes from the `n * phi` term.
pub fn antiskyrmion(x: f64, y: f64, p: &ShapeParams) -> (f64, f64) {
    let d = (x * x + y * y).sqrt();
    let phi = y.atan2(x) + FRAC_PI_2;
    let e = envelope(d, p.r, p.n);
    (
        e * (p.n * phi - FRAC_PI_2).sin(),
        e * (p.n * phi - FRAC_PI_2).cos(),
    )
}

/// Bubble: x from the double-angle term, y always non-negative.
pub fn bubble(x: f64, y: f64, p: &ShapeParams) -> (f64, f64) {
    let d = (x * x + y * y).sqrt();
    let phi = y.atan2(x);
    let sx = -FRAC_1_SQRT_2 * (2.0 * phi).sin();
    let sy = (1.0 - sx * sx).sqrt();
    let e = envelope(d, p.r, p.n);
    (sx * e, sy * e)
}

/// Néel bubble: bubble with components swapped and x negated.
pub fn neel_bubble(x: f64, y: f64, p: &ShapeParams) -> (f64, f64) {
    let d = (x * x + y * y).sqrt();
    let phi = y.atan2(x);
    let sy = -FRAC_1_SQRT_2 * (2.0 * phi).sin();
    let sx = -(1.0 - sy * sy).sqrt();
    let e = envelope(d, p.r, p.n);
    (sx * e, sy * e)
}
