use crate::constants::{
    LIBDEFLATER_LEVEL, MAX_QUALITY, MIN_QUALITY, OXIPNG_PRESET, SIZE_PREFIX, SUCCESS_PREFIX,
};
use crate::error::{EncodeFailure, OptimizeError, Result};
use crate::formats::OutputFormat;
use crate::reporter::Reporter;
use crate::utils::{describe_size_change, format_file_size};
use crate::{info, verbose};
use image::codecs::gif::GifEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::metadata::Orientation;
use image::{
    ColorType, DynamicImage, ExtendedColorType, GenericImageView, ImageDecoder, ImageEncoder,
    ImageFormat, ImageReader, RgbImage,
};
use jpeg_encoder::{ColorType as JpegColorType, Encoder as JpegEncoder};
use oxipng::{Deflaters, Options};
use std::any::Any;
use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tempfile::NamedTempFile;

/// What a successful optimization did to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeSummary {
    pub source_format: Option<ImageFormat>,
    pub output_format: OutputFormat,
    pub original_dimensions: (u32, u32),
    pub dimensions: (u32, u32),
    pub original_size: u64,
    pub optimized_size: u64,
}

/// A decoded image together with what was read from its container.
pub struct LoadedImage {
    pub image: DynamicImage,
    pub format: Option<ImageFormat>,
    pub orientation: Orientation,
    pub file_size: u64,
}

/// Optimizes one image file: decode, convert to RGB, apply the EXIF
/// orientation and re-encode into the format named by `output_path`'s
/// extension.
///
/// Every failure is reported through `reporter` before it is returned, and a
/// panic raised by a codec is caught and turned into
/// [`OptimizeError::Unexpected`]. Callers may therefore treat an `Err` as a
/// finished outcome for this file.
///
/// # Arguments
/// * `input_path` - Image to read
/// * `output_path` - Destination, overwritten if it exists
/// * `quality` - JPEG quality; values outside 1-100 fail JPEG output only
/// * `reporter` - Sink for progress and error messages
pub fn optimize_image(
    input_path: &Path,
    output_path: &Path,
    quality: i64,
    reporter: &dyn Reporter,
) -> Result<OptimizeSummary> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        try_optimize_image(input_path, output_path, quality, reporter)
    }))
    .unwrap_or_else(|payload| {
        Err(OptimizeError::Unexpected {
            path: input_path.to_path_buf(),
            source: panic_message(payload).into(),
        })
    });

    if let Err(e) = &outcome {
        crate::error!(reporter, "{}", e);
    }
    outcome
}

fn try_optimize_image(
    input_path: &Path,
    output_path: &Path,
    quality: i64,
    reporter: &dyn Reporter,
) -> Result<OptimizeSummary> {
    info!(reporter, "🗜️  Optimizing image: {:?}", input_path);

    let loaded = load_image(input_path)?;
    let original_dimensions = loaded.image.dimensions();
    info!(
        reporter,
        "{} Original: {}x{}, format {}, {}",
        SIZE_PREFIX,
        original_dimensions.0,
        original_dimensions.1,
        format_name(loaded.format),
        format_file_size(loaded.file_size)
    );
    verbose!(reporter, "Color type: {:?}", loaded.image.color());

    let (mut image, converted_from) = normalize_color(loaded.image);
    if let Some(color) = converted_from {
        if color.has_alpha() {
            info!(reporter, "🎨 Converted {:?} to RGB, alpha channel discarded", color);
        } else {
            info!(reporter, "🎨 Converted {:?} to RGB", color);
        }
    }

    if apply_exif_orientation(&mut image, loaded.orientation) {
        info!(reporter, "🔄 Applied EXIF orientation {:?}", loaded.orientation);
    }

    let format = OutputFormat::from_path(output_path).map_err(|source| OptimizeError::Encode {
        path: output_path.to_path_buf(),
        source,
    })?;
    if format.uses_quality() {
        verbose!(reporter, "Encoding {} at quality {}", format, quality);
    } else {
        verbose!(reporter, "Encoding {} (quality not applicable)", format);
    }

    let bytes = encode_image(&image, format, quality).map_err(|source| OptimizeError::Encode {
        path: output_path.to_path_buf(),
        source,
    })?;
    write_atomically(output_path, &bytes).map_err(|e| OptimizeError::Encode {
        path: output_path.to_path_buf(),
        source: e.into(),
    })?;

    let summary = OptimizeSummary {
        source_format: loaded.format,
        output_format: format,
        original_dimensions,
        dimensions: image.dimensions(),
        original_size: loaded.file_size,
        optimized_size: bytes.len() as u64,
    };
    info!(
        reporter,
        "{} Saved {:?} ({}x{}): {}",
        SUCCESS_PREFIX,
        output_path,
        summary.dimensions.0,
        summary.dimensions.1,
        describe_size_change(summary.original_size, summary.optimized_size)
    );

    Ok(summary)
}

/// Writes `bytes` to a temporary file next to `path` and renames it over
/// `path`, so a failed write never leaves a half-written image behind.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Opens and decodes an image, reading its EXIF orientation on the way.
///
/// Problems with the file or its header are [`OptimizeError::Open`]; pixel
/// data that fails to decode after the header was accepted (a truncated
/// file, for instance) is [`OptimizeError::Unexpected`].
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let open_error = |source: image::ImageError| OptimizeError::Open {
        path: path.to_path_buf(),
        source,
    };

    let file_size = fs::metadata(path).map_err(|e| open_error(e.into()))?.len();
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| open_error(e.into()))?;
    let format = reader.format();

    let mut decoder = reader.into_decoder().map_err(open_error)?;
    let orientation = decoder.orientation().map_err(open_error)?;

    let image = DynamicImage::from_decoder(decoder).map_err(|e| OptimizeError::Unexpected {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    Ok(LoadedImage {
        image,
        format,
        orientation,
        file_size,
    })
}

/// Converts anything that is not 8-bit RGB to 8-bit RGB.
///
/// Alpha is dropped, not composited against a background. Returns the
/// original color type when a conversion happened.
pub fn normalize_color(image: DynamicImage) -> (DynamicImage, Option<ColorType>) {
    let color = image.color();
    if color == ColorType::Rgb8 {
        return (image, None);
    }
    (DynamicImage::ImageRgb8(image.into_rgb8()), Some(color))
}

/// Rotates/flips the pixels so they are upright. Returns whether anything moved.
pub fn apply_exif_orientation(image: &mut DynamicImage, orientation: Orientation) -> bool {
    if matches!(orientation, Orientation::NoTransforms) {
        return false;
    }
    image.apply_orientation(orientation);
    true
}

/// Encodes an image into `format`, fully in memory.
///
/// JPEG honours `quality`, rejects values outside 1-100 and is written with
/// Huffman tables optimized for the image. PNG goes through
/// the best deflate setting with adaptive filtering and is then recompressed
/// by oxipng. GIF is written as a single frame.
pub fn encode_image(
    image: &DynamicImage,
    format: OutputFormat,
    quality: i64,
) -> std::result::Result<Vec<u8>, EncodeFailure> {
    let rgb: Cow<'_, RgbImage> = match image.as_rgb8() {
        Some(rgb) => Cow::Borrowed(rgb),
        None => Cow::Owned(image.to_rgb8()),
    };
    let (width, height) = rgb.dimensions();
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Jpeg => {
            let quality = jpeg_quality(quality)?;
            let (jpeg_width, jpeg_height) = match (u16::try_from(width), u16::try_from(height)) {
                (Ok(w), Ok(h)) => (w, h),
                _ => {
                    return Err(EncodeFailure::DimensionsTooLarge {
                        format: "JPEG",
                        width,
                        height,
                    })
                }
            };
            let mut encoder = JpegEncoder::new(&mut buffer, quality);
            encoder.set_optimized_huffman_tables(true);
            encoder.encode(rgb.as_raw(), jpeg_width, jpeg_height, JpegColorType::Rgb)?;
        }
        OutputFormat::Png => {
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilterType::Adaptive)
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?;
            buffer = optimize_png(&buffer)?;
        }
        OutputFormat::Gif => {
            // The trailer is written when the encoder drops.
            let mut encoder = GifEncoder::new(&mut buffer);
            encoder.encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?;
        }
    }

    Ok(buffer)
}

fn jpeg_quality(quality: i64) -> std::result::Result<u8, EncodeFailure> {
    u8::try_from(quality)
        .ok()
        .filter(|q| (MIN_QUALITY..=MAX_QUALITY).contains(q))
        .ok_or(EncodeFailure::InvalidQuality(quality))
}

fn optimize_png(data: &[u8]) -> std::result::Result<Vec<u8>, EncodeFailure> {
    let mut options = Options::from_preset(OXIPNG_PRESET);
    options.deflate = Deflaters::Libdeflater {
        compression: LIBDEFLATER_LEVEL,
    };
    // Output must stay 8-bit RGB.
    options.bit_depth_reduction = false;
    options.color_type_reduction = false;
    options.palette_reduction = false;
    options.grayscale_reduction = false;

    oxipng::optimize_from_memory(data, &options)
        .map_err(|e| EncodeFailure::PngOptimization(e.to_string()))
}

fn format_name(format: Option<ImageFormat>) -> String {
    format
        .map(|f| format!("{:?}", f).to_uppercase())
        .unwrap_or_else(|| "unknown".to_string())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("codec panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("codec panicked: {}", message)
    } else {
        "codec panicked".to_string()
    }
}
