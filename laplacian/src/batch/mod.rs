mod timing;


use std::path::{Path, PathBuf};
use std::time::Duration;

use common::parallel::par_map_limited;

use crate::prelude::*;

pub use timing::TimingAggregate;

/// What happened to one input of a batch.
#[derive(Debug)]
pub enum ImageOutcome {
    Written {
        input: PathBuf,
        output: PathBuf,
        elapsed: Duration,
    },
    /// Filtering ran but the result could not be saved.
    EncodeFailed {
        input: PathBuf,
        output: PathBuf,
        elapsed: Duration,
        error: Error,
    },
    /// The input could not be read; nothing was filtered or written.
    DecodeFailed { input: PathBuf, error: Error },
}

impl ImageOutcome {
    pub fn input(&self) -> &Path {
        match self {
            ImageOutcome::Written { input, .. }
            | ImageOutcome::EncodeFailed { input, .. }
            | ImageOutcome::DecodeFailed { input, .. } => input,
        }
    }

    /// Filter pass duration, if the image got that far.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            ImageOutcome::Written { elapsed, .. } | ImageOutcome::EncodeFailed { elapsed, .. } => {
                Some(*elapsed)
            }
            ImageOutcome::DecodeFailed { .. } => None,
        }
    }

    pub fn output(&self) -> Option<&Path> {
        match self {
            ImageOutcome::Written { output, .. } => Some(output),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            ImageOutcome::EncodeFailed { error, .. } | ImageOutcome::DecodeFailed { error, .. } => {
                Some(error)
            }
            ImageOutcome::Written { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct BatchReport {
    /// One entry per input, in input order.
    pub outcomes: Vec<ImageOutcome>,
    pub timing: TimingAggregate,
}

impl BatchReport {
    pub fn written_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.output().is_some()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error().is_some()).count()
    }
}

/// Filters a list of image files concurrently, one task per file.
#[derive(Debug, Clone)]
pub struct Batch {
    config: Config,
    filter: Laplacian,
}

impl Batch {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let filter = Laplacian::new(config.thread_count)?;

        Ok(Self { config, filter })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decodes, filters and encodes every input. The k-th input (1-based) is
    /// written to [`Config::output_path`]`(k)`.
    ///
    /// A failing input is logged and skipped; it never affects the others.
    pub fn run<P>(&self, inputs: &[P]) -> BatchReport
    where
        P: AsRef<Path> + Sync,
    {
        if let Err(e) = std::fs::create_dir_all(&self.config.output_dir) {
            log::error!(
                "Unable to create output directory '{}': {}",
                self.config.output_dir.display(),
                e
            );
        }

        let outcomes = par_map_limited(inputs, self.config.max_concurrent_images, |idx, input| {
            self.process(idx + 1, input.as_ref())
        });

        let timing: TimingAggregate = outcomes.iter().filter_map(ImageOutcome::elapsed).collect();

        let report = BatchReport { outcomes, timing };
        log::info!(
            "Filtered {} of {} images in {:.4}s ({} failed)",
            report.timing.passes(),
            inputs.len(),
            report.timing.total_seconds(),
            report.failed_count()
        );

        report
    }

    fn process(&self, position: usize, input: &Path) -> ImageOutcome {
        let image = match Image::read_file(input) {
            Ok(image) => image,
            Err(error) => {
                log::error!("Skipping '{}': {}", input.display(), error);
                return ImageOutcome::DecodeFailed {
                    input: input.to_path_buf(),
                    error,
                };
            }
        };

        let FilterResult {
            image: filtered,
            elapsed,
        } = self.filter.apply(&image);
        log::debug!(
            "Filtered '{}' ({}) in {:.4}s",
            input.display(),
            image.desc(),
            elapsed.as_secs_f64()
        );
        drop(image);

        let output = self.config.output_path(position);
        match filtered.save_file(&output) {
            Ok(()) => ImageOutcome::Written {
                input: input.to_path_buf(),
                output,
                elapsed,
            },
            Err(error) => {
                log::error!("Unable to save '{}': {}", output.display(), error);
                ImageOutcome::EncodeFailed {
                    input: input.to_path_buf(),
                    output,
                    elapsed,
                    error,
                }
            }
        }
    }
}
