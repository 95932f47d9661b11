//! Deterministic reduction of a point sequence to a target count.

use crate::config::SubsampleRule;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Indices of `to` points kept out of `from`, always including both ends.
///
/// Returns `0..from` unchanged when `to >= from`. `key` distinguishes
/// independent draws under [`SubsampleRule::Seeded`].
pub fn subsample_indices(from: usize, to: usize, rule: SubsampleRule, key: u64) -> Vec<usize> {
    if to >= from {
        return (0..from).collect();
    }
    if to == 0 {
        return Vec::new();
    }
    if to == 1 {
        return vec![0];
    }

    match rule {
        SubsampleRule::Even => {
            let step = (from - 1) as f64 / (to - 1) as f64;
            (0..to).map(|k| (k as f64 * step).round() as usize).collect()
        }
        SubsampleRule::Seeded { seed } => {
            let mut rng = StdRng::seed_from_u64(seed ^ key);
            let mut keep = vec![true; from];
            for i in rand::seq::index::sample(&mut rng, from - 2, from - to) {
                keep[i + 1] = false;
            }
            keep.iter()
                .enumerate()
                .filter_map(|(i, &k)| k.then_some(i))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_keeps_endpoints() {
        let idx = subsample_indices(11, 6, SubsampleRule::Even, 0);
        assert_eq!(idx, vec![0, 2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_even_strictly_increasing() {
        for from in 3..40 {
            for to in 2..from {
                let idx = subsample_indices(from, to, SubsampleRule::Even, 0);
                assert_eq!(idx.len(), to);
                assert_eq!(idx[0], 0);
                assert_eq!(*idx.last().unwrap(), from - 1);
                assert!(idx.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_no_reduction_needed() {
        assert_eq!(subsample_indices(4, 4, SubsampleRule::Even, 0), vec![0, 1, 2, 3]);
        assert_eq!(subsample_indices(4, 9, SubsampleRule::Even, 0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let rule = SubsampleRule::Seeded { seed: 42 };
        let a = subsample_indices(30, 12, rule, 7);
        let b = subsample_indices(30, 12, rule, 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert_eq!(a[0], 0);
        assert_eq!(a[11], 29);
        assert!(a.windows(2).all(|w| w[0] < w[1]));
    }
}
