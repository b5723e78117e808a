// src/vector_field.rs

use rayon::prelude::*;

use crate::grid::Grid2D;
use crate::textures::{ShapeParams, TextureKind};
use crate::vec2::norm;

/// In-plane moment field sampled on a 2D grid.
/// Each node stores (sx, sy).
#[derive(Debug, Clone)]
pub struct VectorField2D {
    pub grid: Grid2D,
    pub data: Vec<[f64; 2]>,
}

/// A strided view of a field, ready for a quiver plot.
#[derive(Debug, Clone, Default)]
pub struct QuiverSamples {
    pub positions: Vec<(f64, f64)>,
    pub vectors: Vec<[f64; 2]>,
}

impl VectorField2D {
    /// Create a zero field on the given grid.
    pub fn new(grid: Grid2D) -> Self {
        Self {
            grid,
            data: vec![[0.0, 0.0]; grid.n_cells()],
        }
    }

    /// Evaluate `kind` at every grid node.
    pub fn from_texture(grid: Grid2D, kind: TextureKind, params: &ShapeParams) -> Self {
        let mut field = Self::new(grid);
        field.fill_texture(kind, params);
        field
    }

    /// Overwrite every node with the texture value at that node.
    pub fn fill_texture(&mut self, kind: TextureKind, params: &ShapeParams) {
        let grid = self.grid;
        self.data.par_iter_mut().enumerate().for_each(|(id, v)| {
            let (x, y) = grid.coord_flat(id);
            let (sx, sy) = kind.evaluate(x, y, params);
            *v = [sx, sy];
        });

        let bad = self.non_finite_count();
        if bad > 0 {
            tracing::warn!(
                texture = %kind,
                non_finite = bad,
                "texture produced non-finite samples (grid hits the origin?)"
            );
        }
        tracing::debug!(texture = %kind, nodes = self.data.len(), "evaluated texture");
    }

    /// Get the flat index in `data` for grid indices (i, j).
    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        self.grid.idx(i, j)
    }

    /// Number of nodes whose sample has a NaN or infinite component.
    pub fn non_finite_count(&self) -> usize {
        self.data
            .iter()
            .filter(|v| !(v[0].is_finite() && v[1].is_finite()))
            .count()
    }

    /// Largest sample magnitude, ignoring non-finite nodes.
    pub fn max_norm(&self) -> f64 {
        self.data
            .iter()
            .map(|&v| norm(v))
            .filter(|n| n.is_finite())
            .fold(0.0, f64::max)
    }

    /// Every `skip`-th node along both axes, starting from (0, 0).
    pub fn subsample(&self, skip: usize) -> QuiverSamples {
        let skip = skip.max(1);
        let mut out = QuiverSamples::default();
        for j in (0..self.grid.ny).step_by(skip) {
            for i in (0..self.grid.nx).step_by(skip) {
                out.positions.push(self.grid.coord(i, j));
                out.vectors.push(self.data[self.idx(i, j)]);
            }
        }
        out
    }
}
