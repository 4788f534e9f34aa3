//! Utility functions for working with parallel arrays.
use std::cmp::Ordering;

/// The permutation that sorts `vals` from largest to smallest.
///
/// The sort is stable, equal values keep their relative order. NaN compares equal to everything,
/// so callers should screen for it first.
pub fn descending_permutation(vals: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..vals.len()).collect();
    idx.sort_by(|&a, &b| vals[b].partial_cmp(&vals[a]).unwrap_or(Ordering::Equal));
    idx
}

/// Reorder `vals` so that `result[i] == vals[perm[i]]`.
pub fn apply_permutation<T: Copy>(vals: &[T], perm: &[usize]) -> Vec<T> {
    debug_assert_eq!(vals.len(), perm.len());
    perm.iter().map(|&i| vals[i]).collect()
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_descending_permutation() {
        let p = [700.0, 300.0, 1000.0, 500.0, 850.0];
        let perm = descending_permutation(&p);
        assert_eq!(perm, vec![2, 4, 0, 3, 1]);
        assert_eq!(
            apply_permutation(&p, &perm),
            vec![1000.0, 850.0, 700.0, 500.0, 300.0]
        );

        // Stable for ties
        let perm = descending_permutation(&[500.0, 900.0, 500.0]);
        assert_eq!(perm, vec![1, 0, 2]);

        assert!(descending_permutation(&[]).is_empty());
    }
}
