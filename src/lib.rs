//! Software scanline rasterizer.
//!
//! Meshes are pushed through model, view, projection and screen space by
//! [`pipeline::renderer::Renderer`], lit per vertex, depth-sorted back to front
//! and filled row by row into an ARGB pixel buffer.

pub mod app;
pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod scene;

pub use error::{RenderError, Result};
