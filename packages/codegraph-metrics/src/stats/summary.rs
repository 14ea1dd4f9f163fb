//! Five-number digest of a sample distribution

use super::percentile::{mode, p50, p90, p99};
use serde::{Deserialize, Serialize};

/// Max, P50, P90, P99 and mode of a set of non-negative integer samples.
///
/// All fields are zero when there were no samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Summary {
    pub max: usize,
    pub p50: usize,
    pub p90: usize,
    pub p99: usize,
    pub mode: usize,
}

impl Summary {
    /// Sort the samples and digest them
    pub fn from_samples(mut samples: Vec<usize>) -> Self {
        samples.sort_unstable();
        Self::from_sorted(&samples)
    }

    /// Digest samples that are already sorted ascending
    pub fn from_sorted(sorted: &[usize]) -> Self {
        Self {
            max: sorted.last().copied().unwrap_or_default(),
            p50: p50(sorted),
            p90: p90(sorted),
            p99: p99(sorted),
            mode: mode(sorted),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
