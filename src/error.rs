use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a single file optimization.
///
/// The batch runner reports these and moves on to the next file.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("Cannot open image {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Cannot write optimized image {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodeFailure,
    },

    #[error("Unexpected error while processing {path:?}: {source}")]
    Unexpected {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl OptimizeError {
    pub fn path(&self) -> &Path {
        match self {
            OptimizeError::Open { path, .. }
            | OptimizeError::Encode { path, .. }
            | OptimizeError::Unexpected { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum EncodeFailure {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("JPEG encoding error: {0}")]
    Jpeg(#[from] jpeg_encoder::EncodingError),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(i64),

    #[error("Image too large for {format}: {width}x{height}")]
    DimensionsTooLarge {
        format: &'static str,
        width: u32,
        height: u32,
    },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Failure that ends a whole batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to create output directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list input directory {path:?}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Input path is not a directory: {0:?}")]
    NotADirectory(PathBuf),
}

pub type Result<T> = std::result::Result<T, OptimizeError>;
