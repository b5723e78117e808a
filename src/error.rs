// src/error.rs

use thiserror::Error;

/// Errors raised by the texture / deflection / density pipeline.
///
/// Numeric singularities (NaN at the origin of a Néel texture) are *not*
/// errors: they travel through the arrays as values.
#[derive(Debug, Error)]
pub enum LtemError {
    #[error("shape mismatch: x has shape {x:?}, y has shape {y:?}")]
    ShapeMismatch { x: Vec<usize>, y: Vec<usize> },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("unknown texture '{0}' (expected neel_skyrmion, bloch_skyrmion, antiskyrmion, bubble or neel_bubble)")]
    UnknownTexture(String),

    #[error("density estimate needs at least {needed} finite points, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("point cloud covariance is singular (determinant {det:.3e})")]
    SingularCovariance { det: f64 },

    #[error("render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LtemError>;

impl LtemError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            name,
            reason: reason.into(),
        }
    }
}
