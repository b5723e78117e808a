// src/lib.rs

pub mod config;
pub mod deflection;
pub mod error;
pub mod grid;
pub mod kde;
pub mod params;
pub mod pipeline;
pub mod textures;
pub mod vec2;
pub mod vector_field;
pub mod visualisation;

pub use error::{LtemError, Result};
