use thiserror::Error;

/// Errors surfaced to callers of the renderer.
///
/// Only configuration and asset loading can fail; the per-frame pipeline
/// operates on already-validated data and never returns an error.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("failed to load OBJ: {0}")]
    ObjLoad(#[from] tobj::LoadError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    #[error("invalid texture: {0}")]
    InvalidTexture(String),
    #[error("invalid light: {0}")]
    InvalidLight(String),
    #[error("unknown draw mode '{0}'")]
    UnknownDrawMode(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
