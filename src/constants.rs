pub const DEFAULT_QUALITY: i64 = 85;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Extensions (lowercase, without the dot) picked up from the input directory.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

pub const OXIPNG_PRESET: u8 = 4;
pub const LIBDEFLATER_LEVEL: u8 = 12;

/// Worker count used when `--jobs` is not given.
pub const DEFAULT_JOBS: usize = 1;

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

pub const USAGE: &str = "Usage: image_optimizer <input_directory> <output_directory> [quality]";

// Common output message prefixes
pub const SIZE_PREFIX: &str = "📊";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️ ";
pub const ERROR_PREFIX: &str = "❌";
pub const VERBOSE_PREFIX: &str = "🔍";
