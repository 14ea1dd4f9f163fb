//! Shared fixtures for codegraph-metrics integration tests

#![allow(dead_code)]

use codegraph_metrics::metrics::{CallGraphMetrics, PtaMetrics, RunMetrics};
use codegraph_metrics::stats::Summary;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Recovered points-to record whose numbers are all derived from `seed`
pub fn pta_record(seed: usize) -> PtaMetrics {
    PtaMetrics {
        run: RunMetrics::recovered(Duration::from_micros(250_000 + seed as u64 * 1_500)),
        queries: 100 + seed,
        indirect_queries: 10 + seed,
        points_to_set_size: Summary {
            p50: seed,
            p90: seed + 1,
            p99: seed + 2,
            max: seed + 3,
            mode: seed % 4,
        },
    }
}

/// Recovered call graph record whose numbers are all derived from `seed`
pub fn cg_record(seed: usize) -> CallGraphMetrics {
    CallGraphMetrics {
        functions: 50 + seed,
        out_degree: Summary {
            p50: 1,
            p90: 2 + seed,
            p99: 3 + seed,
            max: 4 + seed,
            mode: 1,
        },
        in_degree: Summary {
            p50: seed,
            p90: seed * 2,
            p99: seed * 3,
            max: seed * 4,
            mode: 0,
        },
        ..CallGraphMetrics::default()
    }
}

/// Typical build log noise around report blocks
pub fn log_noise(line: usize) -> String {
    format!("[INFO] step {line}: loading packages from ./pkg/{line}\n")
}

pub fn write_file(dir: &Path, rel: &str, content: impl AsRef<[u8]>) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Durations survive the text format only to the microsecond
pub fn assert_duration_close(actual: Duration, expected: Duration) {
    let diff = if actual > expected {
        actual - expected
    } else {
        expected - actual
    };
    assert!(
        diff < Duration::from_micros(1),
        "duration {:?} differs from {:?}",
        actual,
        expected
    );
}

pub fn assert_pta_eq(actual: &PtaMetrics, expected: &PtaMetrics) {
    assert_duration_close(actual.duration(), expected.duration());
    pretty_assertions::assert_eq!(actual.queries, expected.queries);
    pretty_assertions::assert_eq!(actual.indirect_queries, expected.indirect_queries);
    pretty_assertions::assert_eq!(actual.points_to_set_size, expected.points_to_set_size);
}

pub fn assert_cg_eq(actual: &CallGraphMetrics, expected: &CallGraphMetrics) {
    pretty_assertions::assert_eq!(actual.functions, expected.functions);
    pretty_assertions::assert_eq!(actual.out_degree, expected.out_degree);
    pretty_assertions::assert_eq!(actual.in_degree, expected.in_degree);
}
