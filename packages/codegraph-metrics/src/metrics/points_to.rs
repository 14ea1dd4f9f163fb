//! Points-to analysis metrics
//!
//! Only the shape of the solver result matters here: how many queries were
//! asked and how large each resolved points-to set is. The solver itself is
//! external and is invoked through `analyze_points_to`.

use super::envelope::{measure, RunMetrics};
use crate::errors::AnalysisFailure;
use crate::stats::Summary;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::time::Duration;

/// Identifier of a queried program value
pub type QueryId = u32;

/// Identifier of an abstract memory location
pub type LabelId = u32;

/// Set of abstract locations a value may point to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointsToSet {
    labels: FxHashSet<LabelId>,
}

impl PointsToSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: LabelId) -> bool {
        self.labels.insert(label)
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.labels.iter().copied()
    }
}

impl FromIterator<LabelId> for PointsToSet {
    fn from_iter<I: IntoIterator<Item = LabelId>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

/// Resolved queries from one points-to analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointsToResult {
    /// Direct queries: value → points-to set
    pub queries: FxHashMap<QueryId, PointsToSet>,

    /// Indirect queries (`*v`): value → points-to set
    pub indirect_queries: FxHashMap<QueryId, PointsToSet>,
}

impl PointsToResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_query(&mut self, value: QueryId, set: PointsToSet) {
        self.queries.insert(value, set);
    }

    pub fn add_indirect_query(&mut self, value: QueryId, set: PointsToSet) {
        self.indirect_queries.insert(value, set);
    }

    /// Points-to set cardinality of every direct query
    pub fn set_sizes(&self) -> Vec<usize> {
        self.queries.values().map(PointsToSet::len).collect()
    }
}

/// Metrics about one points-to analysis run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PtaMetrics {
    pub run: RunMetrics<PointsToResult>,

    /// Number of direct queries
    pub queries: usize,
    /// Number of indirect queries
    pub indirect_queries: usize,

    /// Distribution of points-to set sizes over the direct queries
    pub points_to_set_size: Summary,
}

impl PtaMetrics {
    /// Derive all statistics from a solver result
    pub fn from_result(result: PointsToResult, duration: Duration) -> Self {
        Self::from_run(RunMetrics::completed(duration, result))
    }

    /// Record a failed run; statistics stay zero
    pub fn failed(failure: AnalysisFailure, duration: Duration) -> Self {
        Self::from_run(RunMetrics::failed(duration, failure))
    }

    /// Derive statistics from an envelope. Failed runs keep zero statistics.
    pub fn from_run(run: RunMetrics<PointsToResult>) -> Self {
        let mut metrics = Self {
            run,
            ..Self::default()
        };

        if let Some(result) = metrics.run.payload() {
            metrics.queries = result.queries.len();
            metrics.indirect_queries = result.indirect_queries.len();
            metrics.points_to_set_size = Summary::from_samples(result.set_sizes());
        }

        metrics
    }

    pub fn duration(&self) -> Duration {
        self.run.duration
    }

    pub fn is_ok(&self) -> bool {
        self.run.is_ok()
    }
}

/// Run a points-to solver and collect metrics about its result.
///
/// `analysis` is the external engine call; its error type only needs to be
/// displayable.
pub fn analyze_points_to<E: fmt::Display>(
    analysis: impl FnOnce() -> Result<PointsToResult, E>,
) -> PtaMetrics {
    let metrics = PtaMetrics::from_run(measure(analysis));

    if let Some(failure) = metrics.run.failure() {
        tracing::debug!("Points-to analysis failed after {:?}: {}", metrics.duration(), failure);
    }

    metrics
}
