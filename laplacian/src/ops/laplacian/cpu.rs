use super::partition::RowPartition;
use super::LAPLACIAN_KERNEL;
use crate::prelude::*;

/// Convolves the rows of `partition` into `out_rows`.
///
/// `out_rows` holds exactly the partition's rows of the result image. The
/// source is read with toroidal wrap at every border.
pub(super) fn convolve_rows(source: &Image, partition: RowPartition, out_rows: &mut [Pixel]) {
    let width = source.width();
    let height = source.height();
    debug_assert_eq!(out_rows.len(), partition.row_count * width);

    if partition.is_empty() {
        return;
    }

    for (local_y, out_row) in out_rows.chunks_exact_mut(width).enumerate() {
        let y = partition.start_row + local_y;
        // Rows above, at and below y, wrapped.
        let rows = [
            source.row((y + height - 1) % height),
            source.row(y),
            source.row((y + 1) % height),
        ];

        for (x, out) in out_row.iter_mut().enumerate() {
            let columns = [(x + width - 1) % width, x, (x + 1) % width];
            *out = convolve_pixel(&rows, &columns);
        }
    }
}

#[inline]
fn convolve_pixel(rows: &[&[Pixel]; 3], columns: &[usize; 3]) -> Pixel {
    let (mut red, mut green, mut blue) = (0i32, 0i32, 0i32);

    for (kernel_row, row) in LAPLACIAN_KERNEL.iter().zip(rows) {
        for (&weight, &x) in kernel_row.iter().zip(columns) {
            let p = row[x];
            red += p.r as i32 * weight;
            green += p.g as i32 * weight;
            blue += p.b as i32 * weight;
        }
    }

    Pixel::new(clamp_channel(red), clamp_channel(green), clamp_channel(blue))
}

#[inline]
fn clamp_channel(sum: i32) -> u8 {
    sum.clamp(0, u8::MAX as i32) as u8
}
