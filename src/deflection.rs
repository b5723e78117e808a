// src/deflection.rs
//
// First-order Lorentz deflection of a beam electron travelling along z
// through an in-plane moment (sx, sy). The displacement is the moment
// rotated by +90 degrees and scaled by a single coefficient:
//
//     x' = x - scale * sy
//     y' = y + scale * sx

use ndarray::{Array, Dimension, Zip};
use rayon::prelude::*;

use crate::error::{LtemError, Result};
use crate::vector_field::VectorField2D;

/// Deflection coefficient used by the reference figures.
pub const DEFAULT_DEFLECTION_SCALE: f64 = 0.1;

/// Position on the detector plane of an electron crossing (x, y).
#[inline]
pub fn deflect(x: f64, y: f64, sx: f64, sy: f64, scale: f64) -> (f64, f64) {
    (x - scale * sy, y + scale * sx)
}

/// Inverse of [`deflect`] for a known field sample.
#[inline]
pub fn undeflect(x2: f64, y2: f64, sx: f64, sy: f64, scale: f64) -> (f64, f64) {
    (x2 + scale * sy, y2 - scale * sx)
}

/// Elementwise [`deflect`] over equal-shaped arrays.
pub fn deflect_array<D: Dimension>(
    x: &Array<f64, D>,
    y: &Array<f64, D>,
    sx: &Array<f64, D>,
    sy: &Array<f64, D>,
    scale: f64,
) -> Result<(Array<f64, D>, Array<f64, D>)> {
    for other in [y, sx, sy] {
        if other.shape() != x.shape() {
            return Err(LtemError::ShapeMismatch {
                x: x.shape().to_vec(),
                y: other.shape().to_vec(),
            });
        }
    }
    let mut x2 = Array::zeros(x.raw_dim());
    let mut y2 = Array::zeros(x.raw_dim());
    Zip::from(&mut x2)
        .and(&mut y2)
        .and(x)
        .and(y)
        .and(sx)
        .and(sy)
        .for_each(|x2, y2, &x, &y, &sx, &sy| {
            (*x2, *y2) = deflect(x, y, sx, sy, scale);
        });
    Ok((x2, y2))
}

/// Flat cloud of detector positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Keep only points with both coordinates finite.
    pub fn finite(&self) -> PointCloud {
        let (xs, ys) = self
            .xs
            .iter()
            .zip(&self.ys)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(&x, &y)| (x, y))
            .unzip();
        PointCloud { xs, ys }
    }

    /// (x_min, x_max, y_min, y_max) over finite points, `None` if there are none.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut b = (
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        );
        let mut any = false;
        for (&x, &y) in self.xs.iter().zip(&self.ys) {
            if x.is_finite() && y.is_finite() {
                any = true;
                b.0 = b.0.min(x);
                b.1 = b.1.max(x);
                b.2 = b.2.min(y);
                b.3 = b.3.max(y);
            }
        }
        any.then_some(b)
    }
}

/// Deflect every node of `field` and flatten into a point cloud,
/// in the field's row-major order.
pub fn deflect_field(field: &VectorField2D, scale: f64) -> PointCloud {
    let grid = field.grid;
    let (xs, ys): (Vec<f64>, Vec<f64>) = field
        .data
        .par_iter()
        .enumerate()
        .map(|(id, s)| {
            let (x, y) = grid.coord_flat(id);
            deflect(x, y, s[0], s[1], scale)
        })
        .unzip();
    PointCloud { xs, ys }
}
