use crate::batch::{run_batch, BatchOptions};
use crate::constants::USAGE;
use crate::reporter::Reporter;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "image_optimizer",
    about = "Batch-optimize PNG, JPEG and GIF images",
    long_about = "image_optimizer re-encodes every PNG, JPEG and GIF file found directly inside \
                  the input directory and writes the result, under the same name, to the output \
                  directory. Images are converted to RGB (alpha is discarded), rotated according \
                  to their EXIF orientation, saved with the given JPEG quality and recompressed \
                  losslessly where the format allows it.",
    version,
    after_help = "EXAMPLES:\n  \
    image_optimizer ./photos ./optimized\n  \
    image_optimizer ./photos ./optimized 70\n  \
    image_optimizer ./photos ./optimized 80 -j 0"
)]
pub struct Args {
    #[arg(help = "Directory containing the images to optimize")]
    pub input_directory: Option<PathBuf>,

    #[arg(help = "Directory the optimized images are written to (created if missing)")]
    pub output_directory: Option<PathBuf>,

    #[arg(
        allow_negative_numbers = true,
        help = "JPEG quality (1-100, default: 85)",
        long_help = "Lossy quality used for JPEG output, from 1 (smallest) to 100 (best). \
                     Any integer is accepted here; JPEG files fail individually when it is \
                     out of range. PNG and GIF files ignore it."
    )]
    pub quality: Option<String>,

    #[arg(
        short = 'j',
        long,
        help = "Number of files processed in parallel (default: 1, 0 = one per CPU)"
    )]
    pub jobs: Option<usize>,

    #[arg(short = 'v', long, help = "Print extra diagnostic lines")]
    pub verbose: bool,

    #[arg(long, help = "Only print errors")]
    pub quiet: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Not enough positional arguments; print usage and do nothing else.
    Usage,
    Optimize {
        input_dir: PathBuf,
        output_dir: PathBuf,
        options: BatchOptions,
    },
}

impl Args {
    /// Resolves the positional arguments. A quality that is not an integer
    /// is an error here; everything after this point is reported, not returned.
    pub fn command(&self) -> Result<Command> {
        let (input_dir, output_dir) = match (&self.input_directory, &self.output_directory) {
            (Some(input), Some(output)) => (input.clone(), output.clone()),
            _ => return Ok(Command::Usage),
        };

        let quality = self.quality.as_deref().map(parse_quality).transpose()?;

        Ok(Command::Optimize {
            input_dir,
            output_dir,
            options: BatchOptions::new(quality, self.jobs),
        })
    }
}

fn parse_quality(value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .with_context(|| format!("invalid quality value {:?}", value))
}

/// Runs one CLI invocation.
///
/// Only a malformed quality argument makes this fail; per-file and batch
/// failures have already been reported and leave the exit status at 0.
pub fn run(args: &Args, reporter: &dyn Reporter) -> Result<()> {
    match args.command()? {
        Command::Usage => println!("{}", USAGE),
        Command::Optimize {
            input_dir,
            output_dir,
            options,
        } => {
            if run_batch(&input_dir, &output_dir, &options, reporter).is_err() {
                // Already reported; batch failures keep the exit status at 0.
            }
        }
    }
    Ok(())
}
