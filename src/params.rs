// src/params.rs

use serde::{Deserialize, Serialize};

use crate::deflection::DEFAULT_DEFLECTION_SCALE;
use crate::error::{LtemError, Result};
use crate::kde::Bandwidth;
use crate::textures::{ShapeParams, TextureKind};

/// Everything needed to produce one LTEM figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtemParams {
    pub texture: TextureKind,
    pub shape: ShapeParams,
    pub sampling: SamplingParams,
    pub contrast: ContrastParams,
    pub quiver: QuiverParams,
}

/// Grid and deflection settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Nodes per axis of the square sampling grid.
    pub n: usize,
    /// Grid spans [-half_width, half_width] on both axes.
    pub half_width: f64,
    /// Deflection coefficient (displacement per unit moment).
    pub deflection_scale: f64,
    pub bandwidth: Bandwidth,
}

/// Grey-scale contrast panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastParams {
    /// Densities at or below this map to black.
    pub vmin: f64,
    /// Densities at or above this map to white.
    pub vmax: f64,
    /// Visible window is [-view, view]².
    pub view: f64,
}

/// HSV-coloured arrow panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuiverParams {
    /// Draw every `skip`-th node along each axis.
    pub skip: usize,
    /// Moment magnitude that spans the full panel width.
    pub scale: f64,
    pub view: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            n: 100,
            half_width: 1.8,
            deflection_scale: DEFAULT_DEFLECTION_SCALE,
            bandwidth: Bandwidth::Scott,
        }
    }
}

impl Default for ContrastParams {
    fn default() -> Self {
        Self {
            vmin: 0.073,
            vmax: 0.077,
            view: 1.25,
        }
    }
}

impl Default for QuiverParams {
    fn default() -> Self {
        Self {
            skip: 4,
            scale: 3.0,
            view: 1.5,
        }
    }
}

impl Default for LtemParams {
    /// Second-order antiskyrmion, the reference figure.
    fn default() -> Self {
        Self {
            texture: TextureKind::Antiskyrmion,
            shape: ShapeParams::new(1.0, 2.0, 1.0),
            sampling: SamplingParams::default(),
            contrast: ContrastParams::default(),
            quiver: QuiverParams::default(),
        }
    }
}

impl LtemParams {
    /// Default figure settings for a given texture family.
    pub fn for_texture(texture: TextureKind) -> Self {
        let shape = match texture {
            TextureKind::Antiskyrmion => ShapeParams::new(1.0, 2.0, 1.0),
            _ => ShapeParams::default(),
        };
        Self {
            texture,
            shape,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.shape.validate()?;

        let s = &self.sampling;
        if s.n < 2 {
            return Err(LtemError::invalid("sampling.n", format!("need n >= 2, got {}", s.n)));
        }
        if !(s.half_width.is_finite() && s.half_width > 0.0) {
            return Err(LtemError::invalid(
                "sampling.half_width",
                format!("must be positive, got {}", s.half_width),
            ));
        }
        if !s.deflection_scale.is_finite() {
            return Err(LtemError::invalid("sampling.deflection_scale", "must be finite"));
        }

        let c = &self.contrast;
        if !(c.vmin.is_finite() && c.vmax.is_finite() && c.vmax > c.vmin) {
            return Err(LtemError::invalid(
                "contrast",
                format!("clip range [{}, {}] is empty", c.vmin, c.vmax),
            ));
        }
        if !(c.view > 0.0 && self.quiver.view > 0.0) {
            return Err(LtemError::invalid("view", "view windows must be positive"));
        }
        if self.quiver.skip == 0 || !(self.quiver.scale > 0.0) {
            return Err(LtemError::invalid("quiver", "skip and scale must be positive"));
        }
        Ok(())
    }
}
