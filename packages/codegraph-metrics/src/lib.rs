/*
 * Codegraph Metrics - Analysis Run Statistics
 *
 * Layout:
 * - stats/      : Nearest-rank percentiles, mode, sorted series, five-number summary
 * - metrics/    : Result envelope, points-to and call graph records, deadline runner
 * - report/     : Fixed-label text format, line-oriented unparser, terminal output
 * - aggregator  : Bounded parallel scan of a directory tree for report blocks
 * - config/     : Aggregator settings (YAML v1)
 *
 * Flow:
 *   engine run -> metrics record -> text block in a log
 *   log directory -> aggregator -> records -> series -> percentile report
 */

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod report;
pub mod stats;

pub use aggregator::{
    aggregate_call_graph_results, aggregate_pta_results, Aggregation, MetricsAggregator, ScanStats,
};
pub use config::{AggregatorConfig, ConfigError};
pub use errors::{AnalysisFailure, MetricsError, Result};
pub use metrics::{
    analyze_call_graph, analyze_points_to, measure, run_with_deadline, CallGraph,
    CallGraphMetrics, DeadlineOutcome, PointsToResult, PtaMetrics, RunMetrics, RunOutcome,
};
pub use report::{unparse_call_graph_metrics, unparse_pta_results, SeriesReport};
pub use stats::{Series, Summary};
