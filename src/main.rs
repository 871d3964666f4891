use clap::Parser;
use image_optimizer::cli::{run, Args};
use image_optimizer::reporter::ConsoleReporter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let reporter = ConsoleReporter::new(args.quiet, args.verbose);

    run(&args, &reporter)
}
