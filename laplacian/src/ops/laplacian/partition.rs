use std::ops::Range;

/// Contiguous block of rows a single worker writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RowPartition {
    pub start_row: usize,
    pub row_count: usize,
}

impl RowPartition {
    pub fn rows(&self) -> Range<usize> {
        self.start_row..self.start_row + self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

/// Splits `height` rows into exactly `count` contiguous partitions.
///
/// Every partition but the last gets `height / count` rows, the last one takes
/// the rest. With fewer rows than partitions the leading ones are empty.
///
/// # Panics
/// Panics if `count` is 0.
pub fn partition_rows(height: usize, count: usize) -> Vec<RowPartition> {
    assert!(count > 0, "partition count must be > 0");

    let chunk = height / count;
    let last_start = (count - 1) * chunk;

    (0..count)
        .map(|i| RowPartition {
            start_row: i * chunk,
            row_count: if i == count - 1 {
                height - last_start
            } else {
                chunk
            },
        })
        .collect()
}
