// src/grid.rs

use ndarray::Array2;

use crate::error::{LtemError, Result};

/// Regular 2D sampling lattice over a rectangular domain.
///
/// Node positions follow `linspace` semantics: both domain edges are sampled,
/// so an even node count never lands on the origin while an odd one does.
/// Flat storage is row-major with the row index running along y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid2D {
    pub nx: usize,
    pub ny: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Grid2D {
    /// Create a grid with nx × ny nodes spanning [x_min, x_max] × [y_min, y_max].
    pub fn new(nx: usize, ny: usize, x_range: (f64, f64), y_range: (f64, f64)) -> Result<Self> {
        if nx == 0 || ny == 0 {
            return Err(LtemError::invalid(
                "grid size",
                format!("need at least one node per axis, got {nx}x{ny}"),
            ));
        }
        for (lo, hi) in [x_range, y_range] {
            if !lo.is_finite() || !hi.is_finite() || hi < lo {
                return Err(LtemError::invalid(
                    "grid extent",
                    format!("range [{lo}, {hi}] is not a finite, ordered interval"),
                ));
            }
        }
        Ok(Self {
            nx,
            ny,
            x_min: x_range.0,
            x_max: x_range.1,
            y_min: y_range.0,
            y_max: y_range.1,
        })
    }

    /// Square n × n grid over [-half_width, half_width]².
    pub fn square(n: usize, half_width: f64) -> Result<Self> {
        Self::new(n, n, (-half_width, half_width), (-half_width, half_width))
    }

    /// Total number of nodes.
    pub fn n_cells(&self) -> usize {
        self.nx * self.ny
    }

    /// Convert (i, j) indices to a flat index into a 1D array.
    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.nx && j < self.ny);
        j * self.nx + i
    }

    /// Node spacing along x and y (zero for a single-node axis).
    pub fn spacing(&self) -> (f64, f64) {
        (
            step(self.x_min, self.x_max, self.nx),
            step(self.y_min, self.y_max, self.ny),
        )
    }

    /// Physical coordinate of node (i, j).
    #[inline]
    pub fn coord(&self, i: usize, j: usize) -> (f64, f64) {
        (
            lerp(self.x_min, self.x_max, i, self.nx),
            lerp(self.y_min, self.y_max, j, self.ny),
        )
    }

    /// Coordinate of a flat index.
    #[inline]
    pub fn coord_flat(&self, id: usize) -> (f64, f64) {
        self.coord(id % self.nx, id / self.nx)
    }

    /// `meshgrid`-style coordinate arrays of shape (ny, nx):
    /// `X[[j, i]] = x_i`, `Y[[j, i]] = y_j`.
    pub fn meshgrid(&self) -> (Array2<f64>, Array2<f64>) {
        let shape = (self.ny, self.nx);
        let x = Array2::from_shape_fn(shape, |(j, i)| self.coord(i, j).0);
        let y = Array2::from_shape_fn(shape, |(j, i)| self.coord(i, j).1);
        (x, y)
    }

    /// True when some node sits exactly on (0, 0).
    pub fn contains_origin(&self) -> bool {
        (0..self.ny).any(|j| self.coord(0, j).1 == 0.0)
            && (0..self.nx).any(|i| self.coord(i, 0).0 == 0.0)
    }
}

/// Node `k` of `n` evenly spaced nodes on [lo, hi]. Scaling before dividing
/// keeps the centre node of an odd, symmetric grid at exactly zero.
#[inline]
fn lerp(lo: f64, hi: f64, k: usize, n: usize) -> f64 {
    if n > 1 {
        lo + (hi - lo) * k as f64 / (n - 1) as f64
    } else {
        lo
    }
}

#[inline]
fn step(lo: f64, hi: f64, n: usize) -> f64 {
    if n > 1 {
        (hi - lo) / (n - 1) as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_indexing_is_consistent() {
        let g = Grid2D::new(4, 3, (0.0, 3.0), (0.0, 2.0)).unwrap();
        assert_eq!(g.idx(0, 0), 0);
        assert_eq!(g.idx(1, 0), 1);
        assert_eq!(g.idx(0, 1), 4);
        assert_eq!(g.idx(3, 2), 11); // (j=2)*4 + i=3 = 11
        assert_eq!(g.n_cells(), 12);
        assert_eq!(g.coord_flat(11), (3.0, 2.0));
    }

    #[test]
    fn square_grid_includes_both_edges() {
        let g = Grid2D::square(100, 1.8).unwrap();
        assert_eq!(g.coord(0, 0).0, -1.8);
        assert!((g.coord(99, 0).0 - 1.8).abs() < 1e-12);
        assert!(!g.contains_origin(), "even node count must skip the origin");

        let odd = Grid2D::square(5, 1.0).unwrap();
        assert!(odd.contains_origin());
    }

    #[test]
    fn meshgrid_rows_run_along_y() {
        let g = Grid2D::new(3, 2, (0.0, 2.0), (10.0, 11.0)).unwrap();
        let (x, y) = g.meshgrid();
        assert_eq!(x.dim(), (2, 3));
        assert_eq!(x[[1, 2]], 2.0);
        assert_eq!(y[[1, 2]], 11.0);
        assert_eq!(y[[0, 2]], 10.0);
    }

    #[test]
    fn rejects_empty_or_inverted_grids() {
        assert!(Grid2D::square(0, 1.0).is_err());
        assert!(Grid2D::new(2, 2, (1.0, -1.0), (0.0, 1.0)).is_err());
    }
}
