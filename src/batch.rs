use crate::constants::{
    DEFAULT_JOBS, DEFAULT_QUALITY, PROGRESS_BAR_TEMPLATE, SIZE_PREFIX, SUPPORTED_IMAGE_EXTENSIONS,
};
use crate::error::{BatchError, OptimizeError};
use crate::processing::{optimize_image, OptimizeSummary};
use crate::reporter::Reporter;
use crate::utils::{calculate_compression_ratio, format_file_size};
use crate::{info, warn};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub quality: i64,
    /// Number of files optimized at once. `0` means one per CPU.
    pub jobs: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            jobs: DEFAULT_JOBS,
        }
    }
}

impl BatchOptions {
    pub fn new(quality: Option<i64>, jobs: Option<usize>) -> Self {
        Self {
            quality: quality.unwrap_or(DEFAULT_QUALITY),
            jobs: jobs.unwrap_or(DEFAULT_JOBS),
        }
    }

    /// Worker count after resolving `0` to the number of CPUs.
    pub fn effective_jobs(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get().max(1)
        } else {
            self.jobs
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// Files in the input directory that matched the extension filter.
    pub eligible: usize,
    pub optimized: usize,
    pub failed: Vec<PathBuf>,
    pub total_original_size: u64,
    pub total_optimized_size: u64,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn compression_ratio(&self) -> f64 {
        calculate_compression_ratio(self.total_original_size, self.total_optimized_size)
    }

    fn record(&mut self, outcome: std::result::Result<OptimizeSummary, OptimizeError>) {
        match outcome {
            Ok(summary) => {
                self.optimized += 1;
                self.total_original_size += summary.original_size;
                self.total_optimized_size += summary.optimized_size;
            }
            Err(e) => self.failed.push(e.path().to_path_buf()),
        }
    }
}

/// Optimizes every eligible image directly inside `input_dir` into
/// `output_dir`, keeping file names.
///
/// The output directory (and its parents) is created first. Per-file failures
/// are reported and skipped. A failure to create the output directory or to
/// list the input directory is reported and ends the batch; it is returned so
/// callers can inspect it, but needs no further reporting.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    reporter: &dyn Reporter,
) -> std::result::Result<BatchSummary, BatchError> {
    let outcome = run_batch_inner(input_dir, output_dir, options, reporter);
    if let Err(e) = &outcome {
        crate::error!(reporter, "{}", e);
    }
    outcome
}

fn run_batch_inner(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    reporter: &dyn Reporter,
) -> std::result::Result<BatchSummary, BatchError> {
    info!(reporter, "🚀 Starting batch optimization...");
    info!(reporter, "📁 Input: {:?}", input_dir);
    info!(reporter, "📁 Output: {:?}", output_dir);

    let start_time = Instant::now();

    fs::create_dir_all(output_dir).map_err(|source| BatchError::Directory {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let image_files = collect_image_files(input_dir)?;
    let mut summary = BatchSummary {
        eligible: image_files.len(),
        ..BatchSummary::default()
    };

    if image_files.is_empty() {
        warn!(reporter, "No image files found in {:?}", input_dir);
        summary.elapsed = start_time.elapsed();
        return Ok(summary);
    }

    info!(reporter, "{} Found {} image files to process", SIZE_PREFIX, image_files.len());

    let progress = if reporter.shows_progress() {
        let pb = ProgressBar::new(image_files.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let optimize_one = |input_path: &PathBuf| {
        let output_path = generate_output_path(input_path, output_dir);
        let outcome = optimize_image(input_path, &output_path, options.quality, reporter);
        progress.inc(1);
        outcome
    };

    let jobs = options.effective_jobs().min(image_files.len());
    let outcomes: Vec<std::result::Result<OptimizeSummary, OptimizeError>> = if jobs <= 1 {
        image_files.iter().map(optimize_one).collect()
    } else {
        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => {
                info!(reporter, "⚙️  Using {} parallel workers", jobs);
                pool.install(|| image_files.par_iter().map(optimize_one).collect())
            }
            Err(e) => {
                warn!(reporter, "Failed to build worker pool ({}), processing sequentially", e);
                image_files.iter().map(optimize_one).collect()
            }
        }
    };

    progress.finish_with_message("done");

    for outcome in outcomes {
        summary.record(outcome);
    }
    summary.elapsed = start_time.elapsed();

    print_summary(&summary, reporter);
    Ok(summary)
}

/// Lists the eligible images directly inside `input_dir`, in the order the
/// filesystem returns them. Subdirectories are not descended into.
pub fn collect_image_files(input_dir: &Path) -> std::result::Result<Vec<PathBuf>, BatchError> {
    if input_dir.exists() && !input_dir.is_dir() {
        return Err(BatchError::NotADirectory(input_dir.to_path_buf()));
    }

    let mut image_files = Vec::new();
    for entry in WalkDir::new(input_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| BatchError::Listing {
            path: input_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_file() && is_image_file(path) {
            image_files.push(path.to_path_buf());
        }
    }

    Ok(image_files)
}

/// Check if a file path has one of the supported image extensions,
/// ignoring case.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}

/// Same file name, placed in `output_dir`.
pub fn generate_output_path(input_path: &Path, output_dir: &Path) -> PathBuf {
    match input_path.file_name() {
        Some(name) => output_dir.join(name),
        None => output_dir.to_path_buf(),
    }
}

fn print_summary(summary: &BatchSummary, reporter: &dyn Reporter) {
    info!(reporter, "\n{} Batch Optimization Summary:", SIZE_PREFIX);
    info!(reporter, "  📁 Files optimized: {}/{}", summary.optimized, summary.eligible);
    info!(
        reporter,
        "  📊 Total original size: {}",
        format_file_size(summary.total_original_size)
    );
    info!(
        reporter,
        "  📊 Total optimized size: {}",
        format_file_size(summary.total_optimized_size)
    );
    info!(reporter, "  🎯 Overall compression ratio: {:.1}%", summary.compression_ratio());
    info!(reporter, "  ⏱️  Total time: {:.2?}", summary.elapsed);

    if !summary.failed.is_empty() {
        warn!(reporter, "Failed files: {}", summary.failed.len());
        for path in &summary.failed {
            warn!(reporter, "  {:?}", path);
        }
    }
}
