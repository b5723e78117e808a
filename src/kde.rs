// src/kde.rs
//
// Gaussian kernel density estimate of a 2D point cloud.
//
// The kernel covariance is the sample covariance of the cloud (N-1
// normalisation) scaled by factor^2, where the factor comes from a bandwidth
// rule. Evaluation is a direct sum over points, parallelised over mesh nodes.

use std::f64::consts::PI;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::deflection::PointCloud;
use crate::error::{LtemError, Result};
use crate::grid::Grid2D;

/// Bandwidth selection rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bandwidth {
    /// Scott's rule: N^(-1/(d+4)).
    #[default]
    Scott,
    /// Silverman's rule: (N (d+2) / 4)^(-1/(d+4)).
    Silverman,
    /// Fixed multiplier of the data covariance.
    Factor(f64),
}

impl Bandwidth {
    /// Covariance scale factor for `n` points in 2D.
    pub fn factor(&self, n: usize) -> f64 {
        let n = n as f64;
        let d = 2.0;
        match *self {
            Self::Scott => n.powf(-1.0 / (d + 4.0)),
            Self::Silverman => (n * (d + 2.0) / 4.0).powf(-1.0 / (d + 4.0)),
            Self::Factor(f) => f,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GaussianKde {
    points: Vec<[f64; 2]>,
    /// Inverse kernel covariance, row-major [a, b; b, c].
    inv_cov: [f64; 3],
    /// 1 / (N * sqrt(det(2 pi K))).
    norm: f64,
    factor: f64,
}

impl GaussianKde {
    /// Fit to the finite points of `cloud`.
    pub fn new(cloud: &PointCloud, bandwidth: Bandwidth) -> Result<Self> {
        let finite = cloud.finite();
        let points: Vec<[f64; 2]> = finite
            .xs
            .iter()
            .zip(&finite.ys)
            .map(|(&x, &y)| [x, y])
            .collect();

        let dropped = cloud.len() - points.len();
        if dropped > 0 {
            tracing::warn!(dropped, "ignoring non-finite points in density estimate");
        }

        let n = points.len();
        if n < 2 {
            return Err(LtemError::TooFewPoints { needed: 2, got: n });
        }

        let factor = bandwidth.factor(n);
        if !(factor.is_finite() && factor > 0.0) {
            return Err(LtemError::invalid(
                "bandwidth",
                format!("factor must be positive, got {factor}"),
            ));
        }

        let [cxx, cxy, cyy] = sample_covariance(&points);
        let f2 = factor * factor;
        let (kxx, kxy, kyy) = (cxx * f2, cxy * f2, cyy * f2);
        let det = kxx * kyy - kxy * kxy;
        if !(det.is_finite() && det > 0.0) {
            return Err(LtemError::SingularCovariance { det });
        }

        let inv_cov = [kyy / det, -kxy / det, kxx / det];
        let norm = 1.0 / (n as f64 * (4.0 * PI * PI * det).sqrt());

        tracing::debug!(points = n, factor, "fitted gaussian kde");
        Ok(Self {
            points,
            inv_cov,
            norm,
            factor,
        })
    }

    /// Bandwidth factor actually used.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Number of points in the estimate.
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Density at a single location.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let [a, b, c] = self.inv_cov;
        let sum: f64 = self
            .points
            .iter()
            .map(|p| {
                let dx = x - p[0];
                let dy = y - p[1];
                (-0.5 * (a * dx * dx + 2.0 * b * dx * dy + c * dy * dy)).exp()
            })
            .sum();
        sum * self.norm
    }

    /// Density at every node of `mesh`.
    pub fn evaluate_on(&self, mesh: Grid2D) -> DensityMap {
        let values = (0..mesh.n_cells())
            .into_par_iter()
            .map(|id| {
                let (x, y) = mesh.coord_flat(id);
                self.evaluate(x, y)
            })
            .collect();
        DensityMap { grid: mesh, values }
    }
}

/// Unbiased covariance [xx, xy, yy] of a point set (N >= 2).
fn sample_covariance(points: &[[f64; 2]]) -> [f64; 3] {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(ax, ay), p| (ax + p[0], ay + p[1]));
    let (mx, my) = (sx / n, sy / n);

    let mut c = [0.0; 3];
    for p in points {
        let dx = p[0] - mx;
        let dy = p[1] - my;
        c[0] += dx * dx;
        c[1] += dx * dy;
        c[2] += dy * dy;
    }
    c.map(|v| v / (n - 1.0))
}

/// Density values on a regular mesh (row-major, rows along y).
#[derive(Debug, Clone)]
pub struct DensityMap {
    pub grid: Grid2D,
    pub values: Vec<f64>,
}

impl DensityMap {
    /// Square mesh spanning the bounds of `cloud` with `round(sqrt(N))`
    /// nodes per axis.
    pub fn mesh_for(cloud: &PointCloud) -> Result<Grid2D> {
        let (x0, x1, y0, y1) = cloud.bounds().ok_or(LtemError::TooFewPoints {
            needed: 1,
            got: 0,
        })?;
        let m = ((cloud.len() as f64).sqrt().round() as usize).max(2);
        Grid2D::new(m, m, (x0, x1), (y0, y1))
    }

    #[inline]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[self.grid.idx(i, j)]
    }

    /// (min, max) over finite values.
    pub fn range(&self) -> (f64, f64) {
        self.values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Riemann-sum integral over the mesh.
    pub fn integral(&self) -> f64 {
        let (dx, dy) = self.grid.spacing();
        self.values.iter().sum::<f64>() * dx * dy
    }
}

/// Map a density value to a grey level in [0, 1], clipped to [vmin, vmax].
#[inline]
pub fn gray_level(v: f64, vmin: f64, vmax: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    ((v - vmin) / (vmax - vmin)).clamp(0.0, 1.0)
}
