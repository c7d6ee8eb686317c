mod laplacian;

pub use laplacian::{partition_rows, FilterResult, Laplacian, RowPartition, LAPLACIAN_KERNEL};
