//! Concurrency-limited parallel iteration utilities.
//!
//! Wraps rayon's `par_iter` to process items in parallel while limiting
//! the number of items in flight at once (e.g. to cap memory or IO pressure).

use rayon::prelude::*;

/// Maps `f` over `items` in parallel, with at most `max_concurrent` items in flight.
///
/// The closure receives the item's position in `items` alongside the item.
/// `None` puts no cap beyond the size of the rayon pool. Results keep the
/// order of `items`.
///
/// # Panics
///
/// Panics if `max_concurrent` is `Some(0)`.
pub fn par_map_limited<T, R, F>(items: &[T], max_concurrent: Option<usize>, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync,
{
    let window = match max_concurrent {
        Some(limit) => {
            assert!(limit > 0, "max_concurrent must be > 0");
            limit
        }
        None => items.len().max(1),
    };

    let mut results = Vec::with_capacity(items.len());
    for (chunk_idx, chunk) in items.chunks(window).enumerate() {
        let offset = chunk_idx * window;
        let chunk_results: Vec<R> = chunk
            .par_iter()
            .enumerate()
            .map(|(idx, item)| f(offset + idx, item))
            .collect();
        results.extend(chunk_results);
    }
    results
}
