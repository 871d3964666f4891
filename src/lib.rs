pub mod reporter;

pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod processing;
pub mod utils;

pub use batch::{
    collect_image_files, generate_output_path, is_image_file, run_batch, BatchOptions,
    BatchSummary,
};
pub use error::{BatchError, EncodeFailure, OptimizeError, Result};
pub use formats::OutputFormat;
pub use processing::{
    apply_exif_orientation, encode_image, load_image, normalize_color, optimize_image,
    LoadedImage, OptimizeSummary,
};
pub use reporter::{CaptureReporter, ConsoleReporter, Level, Reporter};
