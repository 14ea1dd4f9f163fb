//! Text rendering of metrics records
//!
//! ```text
//! PTA METRICS
//! - Duration: 0.500000s
//! - Number of PTA queries: 100
//! - Number of indirect PTA queries: 10
//! - P50 points-to set size: 1
//! - P90 points-to set size: 2
//! - P99 points-to set size: 3
//! - Max points-to set size: 4
//! - Most common points-to set size: 5
//! ```
//!
//! Call graph blocks list the function count, then an out-degree section and
//! an in-degree section with the same five statistics each.

use super::labels::{call_graph, pta};
use crate::metrics::{CallGraphMetrics, PtaMetrics};
use crate::stats::Summary;
use std::fmt;

impl fmt::Display for PtaMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes = &self.points_to_set_size;
        writeln!(f, "{}", pta::TITLE)?;
        writeln!(f, "{} {:.6}s", pta::DURATION, self.duration().as_secs_f64())?;
        writeln!(f, "{} {}", pta::QUERIES, self.queries)?;
        writeln!(f, "{} {}", pta::INDIRECT_QUERIES, self.indirect_queries)?;
        writeln!(f, "{} {}", pta::P50, sizes.p50)?;
        writeln!(f, "{} {}", pta::P90, sizes.p90)?;
        writeln!(f, "{} {}", pta::P99, sizes.p99)?;
        writeln!(f, "{} {}", pta::MAX, sizes.max)?;
        writeln!(f, "{} {}", pta::MODE, sizes.mode)
    }
}

impl fmt::Display for CallGraphMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", call_graph::TITLE)?;
        writeln!(f, "{} {}", call_graph::FUNCTIONS, self.functions)?;
        writeln!(f, "{}", call_graph::OUT_SECTION)?;
        write_degree_section(f, &self.out_degree, call_graph::OUT_MODE)?;
        writeln!(f, "{}", call_graph::IN_SECTION)?;
        write_degree_section(f, &self.in_degree, call_graph::IN_MODE)
    }
}

fn write_degree_section(f: &mut fmt::Formatter<'_>, summary: &Summary, mode_label: &str) -> fmt::Result {
    writeln!(f, "\t{} {}", call_graph::P50, summary.p50)?;
    writeln!(f, "\t{} {}", call_graph::P90, summary.p90)?;
    writeln!(f, "\t{} {}", call_graph::P99, summary.p99)?;
    writeln!(f, "\t{} {}", call_graph::MAX, summary.max)?;
    writeln!(f, "\t{} {}", mode_label, summary.mode)
}
