//! Terminal report for aggregated series

use crate::stats::Series;
use std::fmt::Debug;
use std::io::{self, Write};

/// Prints the five statistics of one series under a heading
pub struct SeriesReport<'a, T> {
    name: &'a str,
    series: &'a Series<T>,
}

impl<'a, T> SeriesReport<'a, T>
where
    T: Copy + Default + Ord + Debug,
{
    pub fn new(name: &'a str, series: &'a Series<T>) -> Self {
        Self { name, series }
    }

    pub fn write(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "{} aggregate metrics over {} instances:",
            self.name,
            self.series.len()
        )?;
        writeln!(out, "- P50: {:?}", self.series.p50())?;
        writeln!(out, "- P90: {:?}", self.series.p90())?;
        writeln!(out, "- P99: {:?}", self.series.p99())?;
        writeln!(out, "- Max: {:?}", self.series.max())?;
        writeln!(out, "- Mode: {:?}", self.series.mode())
    }

    /// Write to stdout, followed by a blank line
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write(&mut out)?;
        writeln!(out)
    }
}
