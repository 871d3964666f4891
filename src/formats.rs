//! Output format selection
//!
//! The encode target is chosen from the output file's extension only; the
//! batch runner keeps the input's file name, so each file is re-encoded in
//! its own format.

use crate::error::EncodeFailure;
use image::ImageFormat;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Formats the optimizer can write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JPEG, the only target where quality applies
    Jpeg,
    /// PNG, recompressed losslessly with oxipng
    Png,
    /// GIF, single frame
    Gif,
}

impl OutputFormat {
    /// Resolve the format from a path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, EncodeFailure> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                EncodeFailure::UnsupportedFormat(format!("{:?} has no file extension", path))
            })?;
        ext.parse()
    }

    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Gif => ImageFormat::Gif,
        }
    }

    /// Whether the encoder takes a lossy quality setting.
    pub fn uses_quality(&self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Gif => "GIF",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = EncodeFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "gif" => Ok(OutputFormat::Gif),
            _ => Err(EncodeFailure::UnsupportedFormat(s.to_string())),
        }
    }
}
