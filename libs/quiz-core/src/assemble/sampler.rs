//! Random sampling with weak-point bias.
//!
//! Every draw goes through an injected [`Rng`] so callers (and tests) can
//! seed the generator and reproduce a selection.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Draw up to `count` items uniformly without replacement, in random order.
///
/// Partial Fisher-Yates: uniform over k-subsets and over orderings. Counts
/// beyond the pool size are capped, never an error.
pub fn sample<T, R>(items: &[T], count: usize, rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut pool = items.to_vec();
    let count = count.min(pool.len());
    for i in 0..count {
        let j = rng.gen_range(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}

/// Weak quota for a category: `ceil(ratio * quota)`.
pub fn weak_quota(quota: usize, ratio: f64) -> usize {
    (quota as f64 * ratio).ceil() as usize
}

/// Select `quota` items from a pool, biased toward weak items.
///
/// Up to `weak_quota` items are drawn from the weak partition (membership by
/// structural key), the remainder from the normal partition; fewer when a
/// partition runs dry. The combined selection is shuffled so weak items are
/// not clustered at the front.
pub fn select_with_weak_bias<T, K, R>(
    items: &[T],
    key_of: K,
    weak_keys: &HashSet<String>,
    quota: usize,
    weak_quota: usize,
    rng: &mut R,
) -> Vec<T>
where
    T: Clone,
    K: Fn(&T) -> String,
    R: Rng + ?Sized,
{
    let (weak, normal): (Vec<T>, Vec<T>) = items
        .iter()
        .cloned()
        .partition(|item| weak_keys.contains(&key_of(item)));

    let n_weak = weak_quota.min(weak.len()).min(quota);
    let mut selected = sample(&weak, n_weak, rng);

    let n_normal = (quota - n_weak).min(normal.len());
    selected.extend(sample(&normal, n_normal, rng));

    selected.shuffle(rng);
    selected
}
