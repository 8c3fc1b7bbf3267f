use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while persisting a rendered texture.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to create texture directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write texture {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),
    #[error("invalid ring opacity {0}: expected a value in [0, 1]")]
    InvalidOpacity(f64),
    #[error("invalid texture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("failed to encode texture: {0}")]
    Encode(#[from] image::ImageError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, TextureError>;
