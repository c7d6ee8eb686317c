use std::path::PathBuf;

use anyhow::{bail, Context};
use laplacian::prelude::*;

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    inputs: Vec<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--config" {
            let Some(path) = args.next() else {
                bail!("--config requires a file path");
            };
            parsed.config = Some(PathBuf::from(path));
        } else if let Some(path) = arg.strip_prefix("--config=") {
            parsed.config = Some(PathBuf::from(path));
        } else if arg.starts_with("--") {
            bail!("Unknown option '{arg}'");
        } else {
            parsed.inputs.push(PathBuf::from(arg));
        }
    }

    Ok(parsed)
}

fn main() -> anyhow::Result<()> {
    let mut argv = std::env::args();
    let program = argv.next().unwrap_or_else(|| "laplacian".to_string());
    let args = parse_args(argv)?;

    if args.inputs.is_empty() {
        eprintln!("Usage: {program} [--config <file.yaml>] filename[s]");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };

    let _logger = common::log_setup::setup_logging(&config.log_level, "laplacian")
        .context("Logger initialization failed")?;

    if let Some(threads) = config.pool_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the worker pool")?;
    }

    log::info!(
        "Filtering {} images with {} threads each",
        args.inputs.len(),
        config.thread_count
    );

    let report = Batch::new(config)?.run(&args.inputs);

    println!("Time: {:.4}", report.timing.total_seconds());

    Ok(())
}
