// Error handling
pub use crate::error::{Error, Result};

// Image types
pub use crate::image::{Image, ImageDesc, Pixel};

// Operations
pub use crate::ops::{FilterResult, Laplacian, RowPartition};

// Batch processing
pub use crate::batch::{Batch, BatchReport, ImageOutcome, TimingAggregate};
pub use crate::config::Config;
