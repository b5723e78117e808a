// src/config.rs
//
// Run record written next to every rendered figure.

use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::params::LtemParams;
use crate::pipeline::LtemFigure;

#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub params: LtemParams,
    pub stats: FigureStats,
    pub run: RunInfo,
}

/// Numbers a reader of the PNG usually wants to check.
#[derive(Debug, Serialize)]
pub struct FigureStats {
    pub nodes: usize,
    pub non_finite_samples: usize,
    pub max_moment: f64,
    pub kde_factor: f64,
    pub kde_points: usize,
    /// Riemann sum of the density over its mesh (below 1: mass outside the mesh).
    pub density_integral: f64,
    pub density_min: f64,
    pub density_max: f64,
    /// Fraction of mesh nodes whose density falls outside [vmin, vmax].
    pub clipped_fraction: f64,
}

#[derive(Debug, Serialize)]
pub struct RunInfo {
    pub binary: String,
    pub run_id: String,
    pub figure: String,
}

impl FigureStats {
    pub fn from_figure(figure: &LtemFigure) -> Self {
        let (density_min, density_max) = figure.density.range();
        let (vmin, vmax) = (figure.params.contrast.vmin, figure.params.contrast.vmax);
        let clipped = figure
            .density
            .values
            .iter()
            .filter(|&&v| v < vmin || v > vmax)
            .count();
        Self {
            nodes: figure.field.data.len(),
            non_finite_samples: figure.field.non_finite_count(),
            max_moment: figure.field.max_norm(),
            kde_factor: figure.kde_factor,
            kde_points: figure.kde_points,
            density_integral: figure.density.integral(),
            density_min,
            density_max,
            clipped_fraction: clipped as f64 / figure.density.values.len().max(1) as f64,
        }
    }
}

impl RunConfig {
    pub fn new(figure: &LtemFigure, run: RunInfo) -> Self {
        Self {
            params: figure.params.clone(),
            stats: FigureStats::from_figure(figure),
            run,
        }
    }

    pub fn write_to_dir(&self, out_dir: &Path) -> Result<()> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
