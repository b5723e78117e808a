// src/pipeline.rs
//
// grid -> texture -> deflection -> density, then hand the result to a sink.

use crate::deflection::{deflect_field, PointCloud};
use crate::error::Result;
use crate::grid::Grid2D;
use crate::kde::{DensityMap, GaussianKde};
use crate::params::LtemParams;
use crate::textures::TextureKind;
use crate::vector_field::VectorField2D;

/// Everything a renderer needs for one figure.
#[derive(Debug, Clone)]
pub struct LtemFigure {
    pub params: LtemParams,
    pub field: VectorField2D,
    pub cloud: PointCloud,
    pub density: DensityMap,
    pub kde_factor: f64,
    /// Finite points that entered the density estimate.
    pub kde_points: usize,
}

/// Consumer of computed figures (PNG writer, test recorder, ...).
pub trait FigureSink {
    fn render(&mut self, figure: &LtemFigure) -> Result<()>;
}

/// Evaluate the texture and its deflection contrast.
pub fn compute(params: &LtemParams) -> Result<LtemFigure> {
    params.validate()?;
    let s = &params.sampling;

    let grid = Grid2D::square(s.n, s.half_width)?;
    if params.texture == TextureKind::NeelSkyrmion && grid.contains_origin() {
        tracing::warn!(
            n = s.n,
            "odd grid samples the origin; the Néel core node will be NaN"
        );
    }
    let field = VectorField2D::from_texture(grid, params.texture, &params.shape);
    let cloud = deflect_field(&field, s.deflection_scale);

    let mesh = DensityMap::mesh_for(&cloud)?;
    let kde = GaussianKde::new(&cloud, s.bandwidth)?;
    let density = kde.evaluate_on(mesh);

    tracing::info!(
        texture = %params.texture,
        nodes = grid.n_cells(),
        mesh = mesh.nx,
        kde_points = kde.n_points(),
        density_integral = density.integral(),
        "computed ltem contrast"
    );

    Ok(LtemFigure {
        params: params.clone(),
        field,
        cloud,
        density,
        kde_factor: kde.factor(),
        kde_points: kde.n_points(),
    })
}

/// [`compute`] and pass the figure to `sink`.
pub fn run<S: FigureSink + ?Sized>(params: &LtemParams, sink: &mut S) -> Result<LtemFigure> {
    let figure = compute(params)?;
    sink.render(&figure)?;
    Ok(figure)
}
