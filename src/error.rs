//! # Mesher Error Types
//!
//! Every failure the sprite mesher can report. Malformed input (a sprite that
//! is not a cube, a coordinate outside a volume) is rejected up front; wrapped
//! library errors come from the outer layers that touch the filesystem.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while decoding, meshing, grouping or persisting models.
#[derive(Error, Debug)]
pub enum MesherError {
    /// The sprite image is not a square-of-squares (`height != width²`).
    #[error("sprite is not a cube: width {width}, height {height} (height must be width squared)")]
    NotCubic {
        /// Width of the image in pixels, i.e. the edge length of the cube.
        width: u32,
        /// Height of the image in pixels.
        height: u32,
    },

    /// The raw RGBA buffer does not hold exactly `4 * width * height` bytes.
    #[error("rgba buffer has {actual} bytes, expected {expected}")]
    BufferSize {
        /// Number of bytes the dimensions require.
        expected: usize,
        /// Number of bytes actually supplied.
        actual: usize,
    },

    /// A coordinate passed to a volume mutation lies outside `[0, size)`.
    #[error("voxel ({x}, {y}, {z}) is outside a volume of size {size}")]
    OutOfBounds {
        /// X coordinate.
        x: usize,
        /// Y coordinate.
        y: usize,
        /// Z coordinate.
        z: usize,
        /// Edge length of the volume.
        size: usize,
    },

    /// A volume was requested with a zero edge length.
    #[error("invalid volume dimension: {0}")]
    InvalidDimension(usize),

    /// Grouping was asked to combine zero volumes.
    #[error("cannot group an empty list of volumes")]
    EmptyGroup,

    /// A volume handed to grouping does not match the common grid scale.
    #[error("volume size {actual} does not match grid size {expected}")]
    GridScaleMismatch {
        /// The grid scale every volume must have.
        expected: usize,
        /// The size of the offending volume.
        actual: usize,
    },

    /// A terrain entity refers to a sprite that was never loaded.
    #[error("no model named {0}")]
    MissingModel(String),

    /// Image decoding failed.
    #[error("failed to decode {path}: {source}")]
    Image {
        /// The image that could not be decoded.
        path: PathBuf,
        /// The underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// Filesystem access failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Reading or writing JSON failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The configuration file is not valid TOML for [`crate::config::CompilerConfig`].
    #[error(transparent)]
    Config(#[from] toml::de::Error),

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A worker thread went away before returning its result.
    #[error("worker thread disconnected")]
    WorkerDisconnected,
}

/// Result type for mesher operations.
pub type Result<T> = std::result::Result<T, MesherError>;
