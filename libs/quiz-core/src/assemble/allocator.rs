//! Proportional quota allocation across content categories.

use crate::types::Category;

/// Split `target` question slots across categories proportionally to their
/// pool sizes.
///
/// No category is allocated more than its pool. After the initial rounded
/// split, slots are topped up one at a time into the category with the most
/// remaining headroom, then trimmed one at a time from the category holding
/// the most slots (never below 1 while trimming). Ties resolve to the first
/// category in slice order, so results are deterministic.
pub fn allocate(pools: &[(Category, usize)], target: usize) -> Vec<(Category, usize)> {
    let total_pool: usize = pools.iter().map(|&(_, size)| size).sum();
    if total_pool == 0 {
        return pools.iter().map(|&(category, _)| (category, 0)).collect();
    }

    let mut alloc: Vec<usize> = pools
        .iter()
        .map(|&(_, size)| {
            let share = (size as f64 / total_pool as f64 * target as f64).round() as usize;
            share.min(size)
        })
        .collect();
    let mut current: usize = alloc.iter().sum();

    // top up to the target while any pool has headroom
    while current < target {
        let mut best: Option<usize> = None;
        for (i, &(_, size)) in pools.iter().enumerate() {
            let headroom = size - alloc[i];
            if headroom > 0 && best.map_or(true, |b| headroom > pools[b].1 - alloc[b]) {
                best = Some(i);
            }
        }
        match best {
            Some(i) => {
                alloc[i] += 1;
                current += 1;
            }
            None => break,
        }
    }

    // trim back down, keeping every category at least one slot
    while current > target {
        let mut best = 0;
        for i in 1..alloc.len() {
            if alloc[i] > alloc[best] {
                best = i;
            }
        }
        if alloc[best] > 1 {
            alloc[best] -= 1;
            current -= 1;
        } else {
            break;
        }
    }

    log::debug!("allocated {current}/{target} across {} pools", pools.len());

    pools
        .iter()
        .zip(alloc)
        .map(|(&(category, _), n)| (category, n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category::{Conjugation, Grammar, Vocabulary};

    fn counts(alloc: &[(Category, usize)]) -> Vec<usize> {
        alloc.iter().map(|&(_, n)| n).collect()
    }

    #[test]
    fn splits_proportionally_within_pool_caps() {
        let alloc = allocate(&[(Vocabulary, 50), (Conjugation, 30), (Grammar, 20)], 40);
        assert_eq!(counts(&alloc), vec![20, 12, 8]);
    }

    #[test]
    fn never_exceeds_a_pool() {
        let alloc = allocate(&[(Vocabulary, 3), (Conjugation, 100)], 40);
        assert!(alloc[0].1 <= 3);
        assert_eq!(alloc[0].1 + alloc[1].1, 40);
    }

    #[test]
    fn sum_is_min_of_target_and_total_pool() {
        let cases: &[(&[(Category, usize)], usize)] = &[
            (&[(Vocabulary, 10), (Conjugation, 8), (Grammar, 6)], 35),
            (&[(Vocabulary, 10), (Conjugation, 8), (Grammar, 6)], 12),
            (&[(Vocabulary, 0), (Conjugation, 5)], 10),
            (&[(Vocabulary, 40), (Conjugation, 40), (Grammar, 40)], 40),
        ];
        for &(pools, target) in cases {
            let alloc = allocate(pools, target);
            let total_pool: usize = pools.iter().map(|&(_, s)| s).sum();
            let sum: usize = counts(&alloc).iter().sum();
            assert_eq!(sum, target.min(total_pool), "pools {pools:?} target {target}");
            for (&(_, size), &n) in pools.iter().zip(counts(&alloc).iter()) {
                assert!(n <= size);
            }
        }
    }

    #[test]
    fn empty_total_pool_allocates_nothing() {
        let alloc = allocate(&[(Vocabulary, 0), (Grammar, 0)], 40);
        assert_eq!(counts(&alloc), vec![0, 0]);
    }

    #[test]
    fn zero_target_allocates_nothing() {
        let alloc = allocate(&[(Vocabulary, 10), (Grammar, 5)], 0);
        assert_eq!(counts(&alloc), vec![0, 0]);
    }

    #[test]
    fn trimming_stops_at_one_per_category() {
        // three one-item pools for two slots: rounding gives each pool one
        // slot, and the trim pass refuses to push any category to zero
        let alloc = allocate(&[(Vocabulary, 1), (Conjugation, 1), (Grammar, 1)], 2);
        assert_eq!(counts(&alloc), vec![1, 1, 1]);
    }

    #[test]
    fn ties_resolve_in_declared_order() {
        // equal pools, target not divisible: the extra slot lands on the
        // first category
        let alloc = allocate(&[(Vocabulary, 10), (Conjugation, 10), (Grammar, 10)], 10);
        assert_eq!(counts(&alloc), vec![4, 3, 3]);
    }
}
