#![allow(dead_code)]

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 5 % 256) as u8, (y * 9 % 256) as u8, ((x + y) % 256) as u8])
    })
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    gradient(width, height).save(path).unwrap();
}

pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    gradient(width, height).save(path).unwrap();
}

pub fn write_rgba_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, _| Rgba([250, 10, 10, (x * 20 % 256) as u8]))
        .save(path)
        .unwrap();
}

pub fn write_gif(path: &Path, width: u32, height: u32) {
    let image = gradient(width, height);
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        encoder
            .encode(image.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
    }
    fs::write(path, bytes).unwrap();
}

/// Noisy two-color image; small enough a palette for oxipng to index.
pub fn two_color_pattern(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let noise = x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503);
        if (noise >> 7) & 1 == 0 {
            Rgb([200, 30, 30])
        } else {
            Rgb([30, 30, 200])
        }
    })
}

/// Writes [`two_color_pattern`] as an indexed (palette) PNG by running it
/// through oxipng with its color reductions enabled.
pub fn write_palette_png(path: &Path, width: u32, height: u32) {
    let image = two_color_pattern(width, height);
    let mut rgb_png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut rgb_png)
        .write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    let indexed = oxipng::optimize_from_memory(&rgb_png, &oxipng::Options::from_preset(2)).unwrap();
    fs::write(path, indexed).unwrap();
}

/// PNG color type byte from the IHDR chunk (3 = indexed).
pub fn png_color_type(path: &Path) -> u8 {
    fs::read(path).unwrap()[25]
}

/// Baseline JPEG with an APP1 Exif segment carrying only the orientation tag.
pub fn jpeg_with_exif_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let image = gradient(width, height);
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, 90)
        .write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();

    // Big-endian TIFF header, one IFD with a single SHORT entry.
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM");
    tiff.extend_from_slice(&42u16.to_be_bytes());
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let mut segment = b"Exif\0\0".to_vec();
    segment.extend_from_slice(&tiff);

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((segment.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&segment);
    out.extend_from_slice(&jpeg[2..]);
    out
}

pub fn write_truncated_png(path: &Path, width: u32, height: u32) {
    write_png(path, width, height);
    let bytes = fs::read(path).unwrap();
    fs::write(path, &bytes[..bytes.len() / 2]).unwrap();
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn create_input_directory(temp_dir: &Path) -> PathBuf {
    let input_dir = temp_dir.join("input");
    fs::create_dir(&input_dir).unwrap();
    input_dir
}

pub fn output_file_names(output_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
