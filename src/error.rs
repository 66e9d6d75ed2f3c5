use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading resources or setting up a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Image error for '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to parse config '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid face index: face {face} references vertex {index}, mesh has {count} vertices")]
    InvalidFaceIndex {
        face: usize,
        index: usize,
        count: usize,
    },
    #[error(
        "Invalid texcoord index: face {face} references texcoord {index}, mesh has {count} texcoords"
    )]
    InvalidTexcoordIndex {
        face: usize,
        index: usize,
        count: usize,
    },
    #[error("Invalid camera configuration: {0}")]
    DegenerateCamera(String),
    #[error("Invalid texture: {0}")]
    InvalidTexture(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
