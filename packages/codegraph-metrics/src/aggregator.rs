//! Directory-wide report aggregation
//!
//! Walks a directory tree, feeds every regular file through the unparser and
//! collects the recovered records. Files are processed on a dedicated pool of
//! `max_concurrency` threads. Each task returns its own records and the
//! calling thread concatenates them, so there is a single writer.
//!
//! Individual files that cannot be read, are too large, or contain no report
//! blocks just contribute nothing. Only a root that cannot be scanned at all
//! is an error.

use crate::config::AggregatorConfig;
use crate::errors::{MetricsError, Result};
use crate::metrics::{CallGraphMetrics, PtaMetrics};
use crate::report::{Unparse, UnparseDiagnostics, UnparseReport, Unparser};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Counters collected during one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files read and passed to the unparser
    pub files_scanned: usize,
    /// Files not read: unreadable or over `max_file_size`
    pub files_skipped: usize,
    /// Directory entries the walk could not visit
    pub walk_errors: usize,
    /// Unparser diagnostics summed over every scanned file
    pub diagnostics: UnparseDiagnostics,
    pub elapsed: Duration,
}

/// Records recovered from a directory tree.
///
/// Record order across files is unspecified.
#[derive(Debug, Clone)]
pub struct Aggregation<M> {
    pub records: Vec<M>,
    pub stats: ScanStats,
}

impl<M> Aggregation<M> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<M> {
        self.records
    }
}

enum FileOutcome<M> {
    Parsed(UnparseReport<M>),
    Skipped,
}

/// Scans directory trees for metrics report blocks
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    config: AggregatorConfig,
}

impl MetricsAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Recover every `M` block from the regular files under `root`
    pub fn aggregate<M: Unparse + Send>(&self, root: impl AsRef<Path>) -> Result<Aggregation<M>> {
        let start = Instant::now();
        let root = root.as_ref();

        self.config.validate()?;
        check_root(root)?;

        let (files, walk_errors) = self.discover_files(root)?;
        tracing::debug!("Discovered {} files under {:?}", files.len(), root);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_concurrency)
            .thread_name(|i| format!("metrics-scan-{}", i))
            .build()?;

        let unparser = Unparser::<M>::new();
        let outcomes: Vec<FileOutcome<M>> = pool.install(|| {
            files
                .par_iter()
                .map(|path| self.process_file(&unparser, path))
                .collect()
        });

        let mut records = Vec::new();
        let mut stats = ScanStats {
            walk_errors,
            ..ScanStats::default()
        };

        for outcome in outcomes {
            match outcome {
                FileOutcome::Parsed(report) => {
                    stats.files_scanned += 1;
                    stats.diagnostics.merge(&report.diagnostics);
                    records.extend(report.records);
                }
                FileOutcome::Skipped => stats.files_skipped += 1,
            }
        }
        stats.elapsed = start.elapsed();

        tracing::info!(
            "Aggregated {} '{}' records from {} files ({} skipped, {} walk errors) in {:?}",
            records.len(),
            M::TITLE,
            stats.files_scanned,
            stats.files_skipped,
            stats.walk_errors,
            stats.elapsed
        );

        Ok(Aggregation { records, stats })
    }

    /// Collect regular files below `root`, counting entries the walk skipped
    fn discover_files(&self, root: &Path) -> Result<(Vec<PathBuf>, usize)> {
        let mut files = Vec::new();
        let mut walk_errors = 0;

        for entry in WalkDir::new(root).follow_links(self.config.follow_links) {
            let entry = match entry {
                Ok(entry) => entry,
                // The root itself could not be listed
                Err(e) if e.depth() == 0 => return Err(MetricsError::Walk(e)),
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    walk_errors += 1;
                    continue;
                }
            };

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        Ok((files, walk_errors))
    }

    fn process_file<M: Unparse>(&self, unparser: &Unparser<M>, path: &Path) -> FileOutcome<M> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!("Failed to open {:?}: {}", path, e);
                return FileOutcome::Skipped;
            }
        };

        if let Some(limit) = self.config.max_file_size {
            match file.metadata() {
                Ok(meta) if meta.len() > limit => {
                    tracing::debug!("Skipping {:?}: {} bytes exceeds {}", path, meta.len(), limit);
                    return FileOutcome::Skipped;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Failed to stat {:?}: {}", path, e);
                    return FileOutcome::Skipped;
                }
            }
        }

        match unparser.unparse_reader(file) {
            Ok(report) => FileOutcome::Parsed(report),
            Err(e) => {
                tracing::debug!("Failed to read {:?}: {}", path, e);
                FileOutcome::Skipped
            }
        }
    }
}

fn check_root(root: &Path) -> Result<()> {
    let meta = match fs::metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(MetricsError::RootNotFound(root.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    if !meta.is_dir() {
        return Err(MetricsError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Recover every points-to block under `dir` with the default configuration
pub fn aggregate_pta_results(dir: impl AsRef<Path>) -> Result<Vec<PtaMetrics>> {
    Ok(MetricsAggregator::default().aggregate(dir)?.into_records())
}

/// Recover every call graph block under `dir` with the default configuration
pub fn aggregate_call_graph_results(dir: impl AsRef<Path>) -> Result<Vec<CallGraphMetrics>> {
    Ok(MetricsAggregator::default().aggregate(dir)?.into_records())
}
