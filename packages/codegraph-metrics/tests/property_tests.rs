//! Property-based tests
//!
//! Invariants that should hold for ALL inputs:
//! - Percentiles pick the nearest-rank element of the sorted sequence
//! - Series statistics are ordered: P50 <= P90 <= P99 <= Max
//! - Mode is the smallest of the most frequent values
//! - Noise lines between report fields never change the recovered record

mod common;

use codegraph_metrics::metrics::PtaMetrics;
use codegraph_metrics::report::labels::pta;
use codegraph_metrics::report::{unparse_pta_results, Unparser};
use codegraph_metrics::stats::{mode, p50, p90, p99, percentile, Series, Summary};
use common::*;
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Lines that can never be mistaken for a title or a labeled field
fn noise_line() -> impl Strategy<Value = String> {
    "[#\\[>*][a-zA-Z0-9 :_./-]{0,40}"
}

/// Titles, labeled fields with arbitrary values, and noise, in any order
fn report_line() -> impl Strategy<Value = String> {
    let labels = vec![
        pta::DURATION,
        pta::QUERIES,
        pta::INDIRECT_QUERIES,
        pta::P50,
        pta::P90,
        pta::P99,
        pta::MAX,
        pta::MODE,
    ];
    prop_oneof![
        Just(pta::TITLE.to_string()),
        Just(format!("{} (continued)", pta::TITLE)),
        (prop::sample::select(labels), "[0-9a-z.s-]{0,6}")
            .prop_map(|(label, value)| format!("{} {}", label, value)),
        noise_line(),
    ]
}

proptest! {
    #[test]
    fn prop_percentile_is_nearest_rank(mut values in prop::collection::vec(0usize..10_000, 1..500)) {
        values.sort_unstable();
        let n = values.len();

        prop_assert_eq!(p50(&values), values[n / 2]);
        prop_assert_eq!(p90(&values), values[n * 9 / 10]);
        prop_assert_eq!(p99(&values), values[n * 99 / 100]);
        prop_assert_eq!(percentile(&values, 100), values[n - 1]);
        prop_assert_eq!(percentile(&values, 0), values[0]);
    }

    #[test]
    fn prop_series_statistics_are_ordered(values in prop::collection::vec(any::<u32>(), 0..300)) {
        let series: Series<u32> = values.iter().copied().collect();

        prop_assert_eq!(series.len(), values.len());
        prop_assert!(series.as_slice().windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(series.p50() <= series.p90());
        prop_assert!(series.p90() <= series.p99());
        prop_assert!(series.p99() <= series.max());
        prop_assert_eq!(series.max(), values.iter().copied().max().unwrap_or_default());
    }

    #[test]
    fn prop_mode_is_smallest_most_frequent(values in prop::collection::vec(0u8..16, 1..200)) {
        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for v in &values {
            *counts.entry(*v).or_default() += 1;
        }
        let best = counts.values().copied().max().unwrap_or_default();
        let expected = counts
            .iter()
            .find(|(_, &c)| c == best)
            .map(|(&v, _)| v)
            .unwrap_or_default();

        prop_assert_eq!(mode(&values), expected);
    }

    #[test]
    fn prop_summary_matches_free_functions(values in prop::collection::vec(0usize..64, 0..200)) {
        let summary = Summary::from_samples(values.clone());
        let mut sorted = values;
        sorted.sort_unstable();

        prop_assert_eq!(summary.p50, p50(&sorted));
        prop_assert_eq!(summary.p90, p90(&sorted));
        prop_assert_eq!(summary.p99, p99(&sorted));
        prop_assert_eq!(summary.max, sorted.last().copied().unwrap_or_default());
        prop_assert_eq!(summary.mode, mode(&sorted));
    }

    #[test]
    fn prop_noise_between_fields_is_ignored(
        seed in 0usize..1000,
        noise in prop::collection::vec(noise_line(), 10),
    ) {
        let expected = pta_record(seed);
        let text = expected.to_string();

        let mut noisy = String::new();
        for (line, junk) in text.lines().zip(&noise) {
            noisy.push_str(junk);
            noisy.push('\n');
            noisy.push_str(line);
            noisy.push('\n');
        }

        let recovered = unparse_pta_results(&noisy);
        prop_assert_eq!(recovered.len(), 1);
        assert_pta_eq(&recovered[0], &expected);
    }

    #[test]
    fn prop_block_accounting_balances(lines in prop::collection::vec(report_line(), 0..120)) {
        let report = Unparser::<PtaMetrics>::new().unparse(&lines.join("\n"));
        let d = report.diagnostics;

        prop_assert_eq!(report.records.len(), d.blocks_completed);
        prop_assert_eq!(d.blocks_opened, d.blocks_completed + d.blocks_restarted + d.blocks_truncated);
    }
}
