//! Laplacian edge detection for binary PPM images.
//!
//! Each image is convolved with a fixed 3x3 Laplacian kernel using toroidal
//! borders. The rows of one image are split between parallel workers and a
//! [`Batch`] filters several images concurrently.

mod batch;
mod config;
mod error;
mod image;
mod ops;

pub mod prelude;

pub use prelude::*;

pub use crate::image::ppm::{MAGIC, MAX_VALUE};
pub use crate::ops::{partition_rows, LAPLACIAN_KERNEL};
