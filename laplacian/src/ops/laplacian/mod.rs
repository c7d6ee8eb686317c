mod cpu;
mod partition;

#[cfg(test)]
mod tests;

use std::mem;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::prelude::*;

pub use partition::{partition_rows, RowPartition};

/// 3x3 Laplacian weights, indexed `[dy + 1][dx + 1]`. Sums to zero.
#[rustfmt::skip]
pub const LAPLACIAN_KERNEL: [[i32; 3]; 3] = [
    [-1, -1, -1],
    [-1, 8, -1],
    [-1, -1, -1],
];

/// Output of one filter pass.
#[derive(Debug, Clone)]
pub struct FilterResult {
    pub image: Image,
    /// Wall time from allocating the result to joining the last worker.
    pub elapsed: Duration,
}

/// Laplacian edge filter with toroidal borders, split over row partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Laplacian {
    thread_count: usize,
}

impl Laplacian {
    pub fn new(thread_count: usize) -> Result<Self> {
        if thread_count == 0 {
            return Err(Error::Config("thread_count must be >= 1".to_string()));
        }

        Ok(Self { thread_count })
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Number of row partitions used for an image of `height` rows.
    /// Never more than the row count, so no worker starts without work.
    pub fn worker_count(&self, height: usize) -> usize {
        self.thread_count.min(height).max(1)
    }

    /// Filters `input` into a newly allocated image.
    pub fn apply(&self, input: &Image) -> FilterResult {
        let start = Instant::now();

        let mut image = Image::new_black(*input.desc());
        self.run_workers(input, &mut image);

        FilterResult {
            image,
            elapsed: start.elapsed(),
        }
    }

    /// Filters `input` into `output` and returns the time the pass took.
    ///
    /// # Panics
    /// Panics if input and output images have different dimensions.
    pub fn apply_cpu(&self, input: &Image, output: &mut Image) -> Duration {
        let start = Instant::now();
        self.run_workers(input, output);
        start.elapsed()
    }

    fn run_workers(&self, input: &Image, output: &mut Image) {
        assert_eq!(input.desc(), output.desc(), "image size mismatch");

        let desc = *input.desc();
        if desc.pixel_count() == 0 {
            return;
        }

        let partitions = partition_rows(desc.height, self.worker_count(desc.height));

        let mut rest = output.pixels_mut();
        let mut jobs = Vec::with_capacity(partitions.len());
        for partition in partitions {
            let (rows, tail) = mem::take(&mut rest).split_at_mut(partition.row_count * desc.width);
            rest = tail;
            if !partition.is_empty() {
                jobs.push((partition, rows));
            }
        }
        debug_assert!(rest.is_empty(), "partitions must cover every row");

        log::debug!("Filtering {} with {} workers", desc, jobs.len());

        jobs.into_par_iter()
            .for_each(|(partition, rows)| cpu::convolve_rows(input, partition, rows));
    }
}
