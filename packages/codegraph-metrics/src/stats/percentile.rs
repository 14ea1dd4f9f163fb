//! Nearest-rank percentiles
//!
//! A percentile indexes straight into the sorted samples at
//! `floor(n * p / 100)`; there is no interpolation between ranks, so every
//! reported value is one that was actually observed. With small discrete sample
//! counts this keeps reports reproducible across runs and across tools.
//!
//! Callers must sort ascending first. Sortedness is not checked.

use std::collections::BTreeMap;

/// Element at rank `floor(n * p / 100)` of an ascending slice.
///
/// Returns `T::default()` for an empty slice. `p` values of 100 or more
/// select the last element.
pub fn percentile<T: Copy + Default>(sorted: &[T], p: usize) -> T {
    if sorted.is_empty() {
        return T::default();
    }

    let idx = (sorted.len() * p / 100).min(sorted.len() - 1);
    sorted[idx]
}

#[inline]
pub fn p50<T: Copy + Default>(sorted: &[T]) -> T {
    percentile(sorted, 50)
}

#[inline]
pub fn p90<T: Copy + Default>(sorted: &[T]) -> T {
    percentile(sorted, 90)
}

#[inline]
pub fn p99<T: Copy + Default>(sorted: &[T]) -> T {
    percentile(sorted, 99)
}

/// Most frequent value; ties go to the smallest value.
///
/// Frequency counting does not depend on input order, so the slice does not
/// need to be sorted. Returns `T::default()` for an empty slice.
pub fn mode<T: Copy + Default + Ord>(values: &[T]) -> T {
    let mut cardinality: BTreeMap<T, usize> = BTreeMap::new();
    for &v in values {
        *cardinality.entry(v).or_insert(0) += 1;
    }

    let mut best = T::default();
    let mut best_count = 0;
    // Ascending key order + strict comparison keeps the smallest tied value
    for (value, count) in cardinality {
        if count > best_count {
            best = value;
            best_count = count;
        }
    }

    best
}
