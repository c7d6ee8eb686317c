use super::*;

/// Unclamped per-channel kernel sum at (x, y) with wrapped indices.
fn raw_sum(img: &Image, x: usize, y: usize) -> [i32; 3] {
    let w = img.width() as i64;
    let h = img.height() as i64;
    let mut sum = [0i32; 3];

    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            let sx = (x as i64 + dx).rem_euclid(w) as usize;
            let sy = (y as i64 + dy).rem_euclid(h) as usize;
            let weight = LAPLACIAN_KERNEL[(dy + 1) as usize][(dx + 1) as usize];
            let p = img.pixel(sx, sy);
            sum[0] += p.r as i32 * weight;
            sum[1] += p.g as i32 * weight;
            sum[2] += p.b as i32 * weight;
        }
    }

    sum
}

fn reference_filter(img: &Image) -> Image {
    let mut out = Image::new_black(*img.desc());
    for y in 0..img.height() {
        for x in 0..img.width() {
            let [r, g, b] = raw_sum(img, x, y).map(|v| v.clamp(0, 255) as u8);
            out.set_pixel(x, y, Pixel::new(r, g, b));
        }
    }
    out
}

fn noise_image(width: usize, height: usize, seed: u32) -> Image {
    // xorshift, good enough for varied pixel content
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state >> 24) as u8
    };
    let pixels = (0..width * height)
        .map(|_| Pixel::new(next(), next(), next()))
        .collect();
    Image::new_with_pixels(ImageDesc::new(width, height), pixels).unwrap()
}

fn checkerboard(size: usize, on: u8) -> Image {
    let mut img = Image::new_black(ImageDesc::new(size, size));
    for y in 0..size {
        for x in 0..size {
            if (x + y) % 2 == 0 {
                img.set_pixel(x, y, Pixel::gray(on));
            }
        }
    }
    img
}

fn assert_all_black(img: &Image) {
    for (i, p) in img.pixels().iter().enumerate() {
        assert_eq!(*p, Pixel::BLACK, "pixel {i} of {} is {p:?}", img.desc());
    }
}

// ============================================================================
// Partitioning
// ============================================================================

#[test]
fn test_partition_last_takes_remainder() {
    let partitions = partition_rows(10, 3);
    assert_eq!(
        partitions,
        vec![
            RowPartition { start_row: 0, row_count: 3 },
            RowPartition { start_row: 3, row_count: 3 },
            RowPartition { start_row: 6, row_count: 4 },
        ]
    );
}

#[test]
fn test_partition_more_workers_than_rows() {
    let partitions = partition_rows(2, 5);
    assert_eq!(partitions.len(), 5);
    assert!(partitions[..4].iter().all(RowPartition::is_empty));
    assert_eq!(partitions[4], RowPartition { start_row: 0, row_count: 2 });
}

#[test]
fn test_partition_single_row() {
    assert_eq!(
        partition_rows(1, 1),
        vec![RowPartition { start_row: 0, row_count: 1 }]
    );
}

#[test]
fn test_partitions_cover_rows_exactly_once() {
    for height in 0..40 {
        for count in 1..50 {
            let partitions = partition_rows(height, count);
            assert_eq!(partitions.len(), count);

            let mut covered = vec![0u32; height];
            let mut next_start = 0;
            for p in &partitions {
                if !p.is_empty() {
                    assert_eq!(p.start_row, next_start, "gap or overlap at h={height} n={count}");
                    next_start = p.rows().end;
                }
                for row in p.rows() {
                    covered[row] += 1;
                }
            }
            assert_eq!(next_start, height);
            assert!(
                covered.iter().all(|&c| c == 1),
                "rows not covered exactly once for h={height} n={count}"
            );
        }
    }
}

#[test]
#[should_panic(expected = "partition count must be > 0")]
fn test_partition_zero_count_panics() {
    partition_rows(4, 0);
}

// ============================================================================
// Filter configuration
// ============================================================================

#[test]
fn test_zero_threads_rejected() {
    assert!(matches!(Laplacian::new(0), Err(Error::Config(_))));
}

#[test]
fn test_worker_count_capped_at_height() {
    let filter = Laplacian::new(23).unwrap();
    assert_eq!(filter.thread_count(), 23);
    assert_eq!(filter.worker_count(5), 5);
    assert_eq!(filter.worker_count(23), 23);
    assert_eq!(filter.worker_count(1000), 23);
    assert_eq!(filter.worker_count(0), 1);
}

#[test]
#[should_panic(expected = "image size mismatch")]
fn test_apply_cpu_size_mismatch_panics() {
    let input = Image::new_black(ImageDesc::new(4, 4));
    let mut output = Image::new_black(ImageDesc::new(4, 5));
    Laplacian::new(2).unwrap().apply_cpu(&input, &mut output);
}

// ============================================================================
// Convolution
// ============================================================================

#[test]
fn test_kernel_weights_sum_to_zero() {
    let sum: i32 = LAPLACIAN_KERNEL.iter().flatten().sum();
    assert_eq!(sum, 0);
}

#[test]
fn test_uniform_image_filters_to_black() {
    let colors = [
        Pixel::new(255, 0, 0),
        Pixel::new(12, 200, 77),
        Pixel::gray(255),
        Pixel::BLACK,
    ];
    for (width, height) in [(1, 1), (2, 2), (3, 7), (64, 5), (17, 33)] {
        for color in colors {
            let input = Image::new_filled(ImageDesc::new(width, height), color);
            let result = Laplacian::new(4).unwrap().apply(&input);
            assert_all_black(&result.image);
        }
    }
}

#[test]
fn test_red_2x2_filters_to_black() {
    let input = Image::new_filled(ImageDesc::new(2, 2), Pixel::new(255, 0, 0));
    let result = Laplacian::new(23).unwrap().apply(&input);

    assert_eq!(*result.image.desc(), ImageDesc::new(2, 2));
    assert_all_black(&result.image);
}

#[test]
fn test_single_pixel_filters_to_black() {
    let input = Image::new_filled(ImageDesc::new(1, 1), Pixel::new(90, 180, 30));
    let filter = Laplacian::new(23).unwrap();

    assert_eq!(filter.worker_count(1), 1);
    let result = filter.apply(&input);
    assert_eq!(result.image.pixels(), &[Pixel::BLACK]);
}

#[test]
fn test_sums_clamped_to_channel_range() {
    // In a 3x3 image every other pixel is a neighbour of the centre exactly once.
    let mut input = Image::new_black(ImageDesc::new(3, 3));
    input.set_pixel(1, 1, Pixel::new(40, 0, 0));
    input.set_pixel(0, 0, Pixel::new(20, 50, 0));

    assert_eq!(raw_sum(&input, 1, 1), [300, -50, 0]);

    let result = Laplacian::new(3).unwrap().apply(&input);
    assert_eq!(result.image.pixel(1, 1), Pixel::new(255, 0, 0));
}

#[test]
fn test_checkerboard_wraps_around_borders() {
    let input = checkerboard(3, 10);
    let result = Laplacian::new(2).unwrap().apply(&input);

    // Wrapped neighbours of (0, 0) include four lit pixels: 8*10 - 4*10.
    // Zero padding would see only (1, 1) lit and give 70.
    assert_eq!(result.image.pixel(0, 0), Pixel::gray(40));

    for y in 0..3 {
        for x in 0..3 {
            let expected = if (x + y) % 2 == 0 { 40 } else { 0 };
            assert_eq!(
                result.image.pixel(x, y),
                Pixel::gray(expected),
                "pixel ({x}, {y})"
            );
        }
    }
}

#[test]
fn test_corner_reads_opposite_corner() {
    let mut input = Image::new_filled(ImageDesc::new(4, 3), Pixel::gray(10));
    input.set_pixel(3, 2, Pixel::BLACK);

    let result = Laplacian::new(3).unwrap().apply(&input);

    // The only dark neighbour of (0, 0) is (W-1, H-1).
    assert_eq!(result.image.pixel(0, 0), Pixel::gray(10));
    // (1, 1) does not touch the dark corner.
    assert_eq!(result.image.pixel(1, 1), Pixel::BLACK);
}

#[test]
fn test_matches_reference_for_any_thread_count() {
    let input = noise_image(37, 23, 0x5eed);
    let expected = reference_filter(&input);

    for threads in [1, 2, 3, 7, 22, 23, 24, 64] {
        let result = Laplacian::new(threads).unwrap().apply(&input);
        assert_eq!(result.image, expected, "mismatch with {threads} threads");
    }
}

#[test]
fn test_apply_cpu_overwrites_output() {
    let input = noise_image(9, 11, 7);
    let mut output = Image::new_filled(*input.desc(), Pixel::gray(123));

    Laplacian::new(4).unwrap().apply_cpu(&input, &mut output);

    assert_eq!(output, reference_filter(&input));
}

#[test]
fn test_source_image_unchanged() {
    let input = noise_image(16, 16, 99);
    let copy = input.clone();

    Laplacian::new(8).unwrap().apply(&input);

    assert_eq!(input, copy);
}

#[test]
fn test_empty_image_is_noop() {
    let input = Image::new_black(ImageDesc::new(0, 4));
    let result = Laplacian::new(4).unwrap().apply(&input);
    assert!(result.image.pixels().is_empty());
}
