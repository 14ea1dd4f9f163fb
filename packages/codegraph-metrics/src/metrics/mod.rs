//! Metrics records for analysis runs
//!
//! An analysis engine (points-to solver, call graph builder, package loader)
//! is treated as an opaque closure. Its return value is wrapped with timing
//! and failure status in a `RunMetrics<T>` envelope, and the two record kinds
//! derive their summary statistics from the payload:
//!
//! - `PtaMetrics`: query counts and points-to set size distribution
//! - `CallGraphMetrics`: function count, per-call-site out-degree and
//!   per-function in-degree distributions
//!
//! `deadline` races any such run against a timeout.

pub mod call_graph;
pub mod deadline;
pub mod envelope;
pub mod points_to;

pub use call_graph::{analyze_call_graph, CallEdge, CallGraph, CallGraphMetrics, CallSiteId, FunctionNode};
pub use deadline::{measure_with_deadline, run_with_deadline, CancellationFlag, DeadlineOutcome};
pub use envelope::{measure, RunMetrics, RunOutcome};
pub use points_to::{analyze_points_to, LabelId, PointsToResult, PointsToSet, PtaMetrics, QueryId};
