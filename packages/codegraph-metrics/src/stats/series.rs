//! Sorted series of one scalar field across many records

use super::percentile::{mode, p50, p90, p99};

/// Ascending sequence of one field extracted from a set of records.
///
/// Sorted once at construction and read-only afterwards. Building two series
/// from disjoint inputs on different threads is fine; a built series is only
/// ever read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series<T> {
    values: Vec<T>,
}

impl<T: Copy + Default + Ord> Series<T> {
    /// Project every record through `field` and sort the results
    pub fn from_records<R>(records: &[R], field: impl Fn(&R) -> T) -> Self {
        records.iter().map(field).collect()
    }

    pub fn p50(&self) -> T {
        p50(&self.values)
    }

    pub fn p90(&self) -> T {
        p90(&self.values)
    }

    pub fn p99(&self) -> T {
        p99(&self.values)
    }

    /// Largest value, or `T::default()` for an empty series
    pub fn max(&self) -> T {
        self.values.last().copied().unwrap_or_default()
    }

    /// Most frequent value, ties broken toward the smallest
    pub fn mode(&self) -> T {
        mode(&self.values)
    }
}

impl<T> Series<T> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T: Ord> FromIterator<T> for Series<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut values: Vec<T> = iter.into_iter().collect();
        values.sort();
        Self { values }
    }
}
