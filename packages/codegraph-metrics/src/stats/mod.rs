//! Summary statistics over discrete samples
//!
//! - `percentile`: nearest-rank percentiles and mode over sorted slices
//! - `series`: one scalar field extracted from many records, sorted once
//! - `summary`: the five-number digest (max, P50, P90, P99, mode) stored on
//!   every metrics record

pub mod percentile;
pub mod series;
pub mod summary;

pub use percentile::{mode, p50, p90, p99, percentile};
pub use series::Series;
pub use summary::Summary;
