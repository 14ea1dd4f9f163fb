//! Text report format
//!
//! Metrics records are written as fixed-label text blocks (`text`) and
//! recovered from arbitrary text containing such blocks (`unparser`). The
//! literal labels in `labels` are the compatibility contract between the two.

pub mod labels;
pub mod terminal;
pub mod text;
pub mod unparser;

pub use terminal::SeriesReport;
pub use unparser::{
    unparse_call_graph_metrics, unparse_call_graph_metrics_from_reader, unparse_pta_results,
    unparse_pta_results_from_reader, LineEffect, Section, Unparse, UnparseDiagnostics,
    UnparseReport, Unparser,
};
