//! Recover metrics records from arbitrary text
//!
//! Reports end up embedded in build logs, CI output and terminal captures, so
//! the unparser scans line by line and ignores anything it does not recognize.
//!
//! State machine:
//! - Seeking: a line equal to the block title (after trimming) opens a fresh,
//!   zero-valued record. Everything else is skipped.
//! - Unparsing: known labels update fields of the open record. A line starting
//!   with the title again discards the open record and starts over. The mode
//!   line, last in the fixed field order, closes the record and emits it.
//!
//! A block that never reaches its mode line is dropped, including one cut off
//! by the end of input. Unparseable values leave the field untouched. None of
//! this is an error; `UnparseDiagnostics` counts what was thrown away.

use super::labels::{call_graph, pta};
use crate::errors::Result;
use crate::metrics::{CallGraphMetrics, PtaMetrics};
use serde::Serialize;
use std::io::Read;
use std::marker::PhantomData;
use std::time::Duration;

/// Call graph sub-section most recently entered inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    None,
    OutDegree,
    InDegree,
}

/// Effect of one line on the open record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEffect {
    /// Not a recognized label (or not applicable in the current section)
    Ignored,
    /// A field or the section changed
    Updated,
    /// Recognized label with an unparseable value
    Malformed,
}

/// A record kind that can be rebuilt from its text block
pub trait Unparse: Sized {
    /// Title line opening a block
    const TITLE: &'static str;

    /// Label of the line that closes a block
    const FLUSH: &'static str;

    /// Zero-valued record for a freshly opened block
    fn fresh() -> Self;

    /// Apply one trimmed line to the open record
    fn apply(&mut self, line: &str, section: &mut Section) -> LineEffect;
}

/// Counts of what the unparser kept and discarded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UnparseDiagnostics {
    /// Blocks opened by a title line, including restarts
    pub blocks_opened: usize,
    /// Blocks closed by their mode line and emitted
    pub blocks_completed: usize,
    /// Open blocks discarded because another title appeared
    pub blocks_restarted: usize,
    /// Open blocks discarded because the input ended
    pub blocks_truncated: usize,
    /// Recognized lines whose value could not be parsed
    pub malformed_fields: usize,
}

impl UnparseDiagnostics {
    pub fn merge(&mut self, other: &Self) {
        self.blocks_opened += other.blocks_opened;
        self.blocks_completed += other.blocks_completed;
        self.blocks_restarted += other.blocks_restarted;
        self.blocks_truncated += other.blocks_truncated;
        self.malformed_fields += other.malformed_fields;
    }

    pub fn blocks_dropped(&self) -> usize {
        self.blocks_restarted + self.blocks_truncated
    }

    /// Nothing was dropped or malformed
    pub fn is_clean(&self) -> bool {
        self.blocks_dropped() == 0 && self.malformed_fields == 0
    }
}

/// Records recovered from one input, with diagnostics
#[derive(Debug, Clone)]
pub struct UnparseReport<M> {
    pub records: Vec<M>,
    pub diagnostics: UnparseDiagnostics,
}

/// Line-oriented scanner for one record kind
pub struct Unparser<M> {
    _record: PhantomData<fn() -> M>,
}

impl<M: Unparse> Default for Unparser<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Unparse> Unparser<M> {
    pub fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }

    /// Scan a fully buffered text
    pub fn unparse(&self, content: &str) -> UnparseReport<M> {
        let mut records = Vec::new();
        let mut diagnostics = UnparseDiagnostics::default();
        let mut current: Option<M> = None;
        let mut section = Section::None;

        for raw in content.lines() {
            let line = raw.trim();

            let Some(record) = current.as_mut() else {
                if line == M::TITLE {
                    current = Some(M::fresh());
                    section = Section::None;
                    diagnostics.blocks_opened += 1;
                }
                continue;
            };

            if line.starts_with(M::TITLE) {
                *record = M::fresh();
                section = Section::None;
                diagnostics.blocks_restarted += 1;
                diagnostics.blocks_opened += 1;
                continue;
            }

            if record.apply(line, &mut section) == LineEffect::Malformed {
                diagnostics.malformed_fields += 1;
            }

            if line.starts_with(M::FLUSH) {
                records.extend(current.take());
                section = Section::None;
                diagnostics.blocks_completed += 1;
            }
        }

        if current.is_some() {
            diagnostics.blocks_truncated += 1;
        }

        if !diagnostics.is_clean() {
            tracing::debug!(
                "Unparse '{}': {} records, {} blocks dropped, {} malformed fields",
                M::TITLE,
                records.len(),
                diagnostics.blocks_dropped(),
                diagnostics.malformed_fields
            );
        }

        UnparseReport {
            records,
            diagnostics,
        }
    }

    /// Read the whole input, then scan it.
    ///
    /// Invalid UTF-8 is replaced rather than rejected so binary files in a
    /// scanned tree just yield no records.
    pub fn unparse_reader(&self, mut reader: impl Read) -> Result<UnparseReport<M>> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(self.unparse(&String::from_utf8_lossy(&bytes)))
    }
}

/// Recover all complete points-to blocks from `content`
pub fn unparse_pta_results(content: &str) -> Vec<PtaMetrics> {
    Unparser::new().unparse(content).records
}

/// Recover all complete call graph blocks from `content`
pub fn unparse_call_graph_metrics(content: &str) -> Vec<CallGraphMetrics> {
    Unparser::new().unparse(content).records
}

pub fn unparse_pta_results_from_reader(reader: impl Read) -> Result<Vec<PtaMetrics>> {
    Ok(Unparser::new().unparse_reader(reader)?.records)
}

pub fn unparse_call_graph_metrics_from_reader(reader: impl Read) -> Result<Vec<CallGraphMetrics>> {
    Ok(Unparser::new().unparse_reader(reader)?.records)
}

/// Trimmed text after `label`, if the line starts with it
fn row_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.strip_prefix(label).map(str::trim)
}

fn parse_count(value: &str) -> Option<usize> {
    value.parse().ok()
}

/// Decimal seconds, with or without a trailing `s`
fn parse_seconds(value: &str) -> Option<Duration> {
    let secs: f64 = value.strip_suffix('s').unwrap_or(value).trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Store a parsed count into `field`, leaving it untouched on failure
fn set_count(field: &mut usize, value: &str) -> LineEffect {
    match parse_count(value) {
        Some(v) => {
            *field = v;
            LineEffect::Updated
        }
        None => LineEffect::Malformed,
    }
}

impl Unparse for PtaMetrics {
    const TITLE: &'static str = pta::TITLE;
    const FLUSH: &'static str = pta::MODE;

    fn fresh() -> Self {
        PtaMetrics::default()
    }

    fn apply(&mut self, line: &str, _section: &mut Section) -> LineEffect {
        if let Some(v) = row_value(line, pta::DURATION) {
            return match parse_seconds(v) {
                Some(d) => {
                    self.run.duration = d;
                    LineEffect::Updated
                }
                None => LineEffect::Malformed,
            };
        }

        let sizes = &mut self.points_to_set_size;
        let fields: [(&str, &mut usize); 7] = [
            (pta::QUERIES, &mut self.queries),
            (pta::INDIRECT_QUERIES, &mut self.indirect_queries),
            (pta::P50, &mut sizes.p50),
            (pta::P90, &mut sizes.p90),
            (pta::P99, &mut sizes.p99),
            (pta::MAX, &mut sizes.max),
            (pta::MODE, &mut sizes.mode),
        ];

        for (label, field) in fields {
            if let Some(v) = row_value(line, label) {
                return set_count(field, v);
            }
        }

        LineEffect::Ignored
    }
}

impl Unparse for CallGraphMetrics {
    const TITLE: &'static str = call_graph::TITLE;
    const FLUSH: &'static str = call_graph::IN_MODE;

    fn fresh() -> Self {
        CallGraphMetrics::default()
    }

    fn apply(&mut self, line: &str, section: &mut Section) -> LineEffect {
        if line.starts_with(call_graph::OUT_SECTION) {
            *section = Section::OutDegree;
            return LineEffect::Updated;
        }
        if line.starts_with(call_graph::IN_SECTION) {
            *section = Section::InDegree;
            return LineEffect::Updated;
        }

        if let Some(v) = row_value(line, call_graph::FUNCTIONS) {
            return set_count(&mut self.functions, v);
        }
        if let Some(v) = row_value(line, call_graph::OUT_MODE) {
            return set_count(&mut self.out_degree.mode, v);
        }
        if let Some(v) = row_value(line, call_graph::IN_MODE) {
            return set_count(&mut self.in_degree.mode, v);
        }

        // P50/P90/P99/Max appear in both sections; only apply inside one
        let summary = match section {
            Section::OutDegree => Some(&mut self.out_degree),
            Section::InDegree => Some(&mut self.in_degree),
            Section::None => None,
        };

        for label in [call_graph::P50, call_graph::P90, call_graph::P99, call_graph::MAX] {
            let Some(v) = row_value(line, label) else {
                continue;
            };
            let Some(count) = parse_count(v) else {
                return LineEffect::Malformed;
            };
            let Some(summary) = summary else {
                return LineEffect::Ignored;
            };
            match label {
                call_graph::P50 => summary.p50 = count,
                call_graph::P90 => summary.p90 = count,
                call_graph::P99 => summary.p99 = count,
                _ => summary.max = count,
            }
            return LineEffect::Updated;
        }

        LineEffect::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Summary;

    const PTA_BLOCK: &str = "
    PTA METRICS
    - Duration: 0.5
    - Number of PTA queries: 100
    - Number of indirect PTA queries: 10
    - P50 points-to set size: 1
    - P90 points-to set size: 2
    - P99 points-to set size: 3
    - Max points-to set size: 4
    - Most common points-to set size: 5
    ";

    const CG_BLOCK: &str = "
    CALL GRAPH METRICS
    - Number of functions: 10
    Call site out-degree metrics:
    - P50: 6
    - P90: 7
    - P99: 8
    - Max: 9
    - Most common out-degree: 10
    Callee in-degree metrics:
    - P50: 1
    - P90: 2
    - P99: 3
    - Max: 4
    - Most common in-degree: 5
    ";

    fn assert_first_pta(m: &PtaMetrics) {
        assert_eq!(m.duration(), Duration::from_millis(500));
        assert_eq!(m.queries, 100);
        assert_eq!(m.indirect_queries, 10);
        assert_eq!(
            m.points_to_set_size,
            Summary {
                p50: 1,
                p90: 2,
                p99: 3,
                max: 4,
                mode: 5,
            }
        );
        assert!(m.run.payload().is_none());
        assert!(m.is_ok());
    }

    fn assert_first_cg(m: &CallGraphMetrics) {
        assert_eq!(m.functions, 10);
        assert_eq!(
            m.out_degree,
            Summary {
                p50: 6,
                p90: 7,
                p99: 8,
                max: 9,
                mode: 10,
            }
        );
        assert_eq!(
            m.in_degree,
            Summary {
                p50: 1,
                p90: 2,
                p99: 3,
                max: 4,
                mode: 5,
            }
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(unparse_pta_results("").is_empty());
        assert!(unparse_call_graph_metrics("").is_empty());
        assert!(unparse_pta_results("no reports here\n- P50: 3\n").is_empty());
    }

    #[test]
    fn test_single_pta_block() {
        let results = unparse_pta_results(PTA_BLOCK);
        assert_eq!(results.len(), 1);
        assert_first_pta(&results[0]);
    }

    #[test]
    fn test_restarted_pta_block_is_dropped() {
        let text = format!("PTA METRICS\n- Duration: 0.6\n{PTA_BLOCK}");
        let report = Unparser::<PtaMetrics>::new().unparse(&text);

        assert_eq!(report.records.len(), 1);
        assert_first_pta(&report.records[0]);
        assert_eq!(report.diagnostics.blocks_restarted, 1);
        assert_eq!(report.diagnostics.blocks_completed, 1);
    }

    #[test]
    fn test_two_pta_blocks_in_order() {
        let second = "
        PTA METRICS
        - Duration: 1
        - Number of PTA queries: 200
        - Number of indirect PTA queries: 20
        - P50 points-to set size: 6
        - P90 points-to set size: 7
        - P99 points-to set size: 8
        - Max points-to set size: 9
        - Most common points-to set size: 10
        ";
        let results = unparse_pta_results(&format!("{PTA_BLOCK}\n{second}"));

        assert_eq!(results.len(), 2);
        assert_first_pta(&results[0]);
        assert_eq!(results[1].duration(), Duration::from_secs(1));
        assert_eq!(results[1].queries, 200);
        assert_eq!(results[1].points_to_set_size.mode, 10);
    }

    #[test]
    fn test_truncated_block_at_end_of_input() {
        let text = format!("{PTA_BLOCK}\nPTA METRICS\n- Duration: 2.0\n- Number of PTA queries: 7\n");
        let report = Unparser::<PtaMetrics>::new().unparse(&text);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.diagnostics.blocks_truncated, 1);
        assert_eq!(report.diagnostics.blocks_opened, 2);
    }

    #[test]
    fn test_malformed_values_keep_prior_value() {
        let text = "PTA METRICS
- Duration: soon
- Number of PTA queries: 12
- Number of indirect PTA queries: -3
- P50 points-to set size: two
- Most common points-to set size: 1
";
        let report = Unparser::<PtaMetrics>::new().unparse(text);

        assert_eq!(report.records.len(), 1);
        let m = &report.records[0];
        assert_eq!(m.duration(), Duration::ZERO);
        assert_eq!(m.queries, 12);
        assert_eq!(m.indirect_queries, 0);
        assert_eq!(m.points_to_set_size.p50, 0);
        assert_eq!(m.points_to_set_size.mode, 1);
        assert_eq!(report.diagnostics.malformed_fields, 3);
    }

    #[test]
    fn test_malformed_mode_still_closes_block() {
        let text = "PTA METRICS\n- Number of PTA queries: 4\n- Most common points-to set size: ?\n";
        let results = unparse_pta_results(text);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].queries, 4);
        assert_eq!(results[0].points_to_set_size.mode, 0);
    }

    #[test]
    fn test_duration_with_unit_suffix() {
        let text = "PTA METRICS\n- Duration: 1.250000s\n- Most common points-to set size: 1\n";
        let results = unparse_pta_results(text);
        assert_eq!(results[0].duration(), Duration::from_millis(1250));
    }

    #[test]
    fn test_title_must_match_exactly_when_seeking() {
        let text = "PTA METRICS (old format)\n- Number of PTA queries: 4\n- Most common points-to set size: 1\n";
        assert!(unparse_pta_results(text).is_empty());
    }

    #[test]
    fn test_interleaved_noise() {
        let text = "
[INFO] building ssa program
PTA METRICS
[DEBUG] solver iteration 4
- Duration: 0.5
random text - Number of PTA queries: 999
- Number of PTA queries: 100
- Number of indirect PTA queries: 10
WARNING: something unrelated
- P50 points-to set size: 1
- P90 points-to set size: 2
- P99 points-to set size: 3
- Max points-to set size: 4
- Most common points-to set size: 5
done.
";
        let results = unparse_pta_results(text);
        assert_eq!(results.len(), 1);
        assert_first_pta(&results[0]);
    }

    #[test]
    fn test_single_call_graph_block() {
        let results = unparse_call_graph_metrics(CG_BLOCK);
        assert_eq!(results.len(), 1);
        assert_first_cg(&results[0]);
    }

    #[test]
    fn test_restarted_call_graph_block_is_dropped() {
        let text = format!(
            "CALL GRAPH METRICS
- Number of functions: 20
Call site out-degree metrics:
- P50: 60
- P90: 70
- P99: 80
- Max: 90
{CG_BLOCK}"
        );
        let results = unparse_call_graph_metrics(&text);
        assert_eq!(results.len(), 1);
        assert_first_cg(&results[0]);
    }

    #[test]
    fn test_two_call_graph_blocks_in_order() {
        let second = "
        CALL GRAPH METRICS
        - Number of functions: 20
        Call site out-degree metrics:
        - P50: 16
        - P90: 17
        - P99: 18
        - Max: 19
        - Most common out-degree: 20
        Callee in-degree metrics:
        - P50: 11
        - P90: 12
        - P99: 13
        - Max: 14
        - Most common in-degree: 15
        ";
        let results = unparse_call_graph_metrics(&format!("{CG_BLOCK}{second}"));

        assert_eq!(results.len(), 2);
        assert_first_cg(&results[0]);
        assert_eq!(results[1].functions, 20);
        assert_eq!(results[1].out_degree.max, 19);
        assert_eq!(results[1].in_degree.max, 14);
        assert_eq!(results[1].in_degree.mode, 15);
    }

    #[test]
    fn test_degree_lines_outside_section_are_ignored() {
        let text = "CALL GRAPH METRICS
- Number of functions: 3
- P50: 42
- Max: 42
Callee in-degree metrics:
- Max: 2
- Most common in-degree: 1
";
        let results = unparse_call_graph_metrics(text);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].out_degree, Summary::default());
        assert_eq!(results[0].in_degree.p50, 0);
        assert_eq!(results[0].in_degree.max, 2);
        assert_eq!(results[0].in_degree.mode, 1);
    }

    #[test]
    fn test_kinds_do_not_interfere() {
        let text = format!("{CG_BLOCK}\n{PTA_BLOCK}\n{CG_BLOCK}");
        assert_eq!(unparse_pta_results(&text).len(), 1);
        assert_eq!(unparse_call_graph_metrics(&text).len(), 2);
    }

    #[test]
    fn test_reader_accepts_invalid_utf8() {
        let mut bytes = vec![0xff, 0xfe, b'\n'];
        bytes.extend_from_slice(PTA_BLOCK.as_bytes());
        let results = unparse_pta_results_from_reader(bytes.as_slice()).unwrap();
        assert_eq!(results.len(), 1);
        assert_first_pta(&results[0]);
    }

    #[test]
    fn test_diagnostics_merge() {
        let mut total = UnparseDiagnostics::default();
        let a = Unparser::<PtaMetrics>::new().unparse(PTA_BLOCK).diagnostics;
        let b = Unparser::<PtaMetrics>::new()
            .unparse("PTA METRICS\n- Duration: x\n")
            .diagnostics;
        total.merge(&a);
        total.merge(&b);

        assert_eq!(total.blocks_opened, 2);
        assert_eq!(total.blocks_completed, 1);
        assert_eq!(total.blocks_truncated, 1);
        assert_eq!(total.malformed_fields, 1);
        assert!(!total.is_clean());
        assert!(a.is_clean());
    }
}
