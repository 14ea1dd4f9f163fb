//! Literal titles and field labels of the text report format.
//!
//! The serializer writes these and the unparser matches on them, so changing
//! any string here breaks recovery of previously written reports.

/// Points-to analysis block
pub mod pta {
    pub const TITLE: &str = "PTA METRICS";
    pub const DURATION: &str = "- Duration:";
    pub const QUERIES: &str = "- Number of PTA queries:";
    pub const INDIRECT_QUERIES: &str = "- Number of indirect PTA queries:";
    pub const P50: &str = "- P50 points-to set size:";
    pub const P90: &str = "- P90 points-to set size:";
    pub const P99: &str = "- P99 points-to set size:";
    pub const MAX: &str = "- Max points-to set size:";
    /// Last line of a block
    pub const MODE: &str = "- Most common points-to set size:";
}

/// Call graph block
pub mod call_graph {
    pub const TITLE: &str = "CALL GRAPH METRICS";
    pub const FUNCTIONS: &str = "- Number of functions:";
    pub const OUT_SECTION: &str = "Call site out-degree metrics:";
    pub const IN_SECTION: &str = "Callee in-degree metrics:";
    // Shared by both sections
    pub const P50: &str = "- P50:";
    pub const P90: &str = "- P90:";
    pub const P99: &str = "- P99:";
    pub const MAX: &str = "- Max:";
    pub const OUT_MODE: &str = "- Most common out-degree:";
    /// Last line of a block
    pub const IN_MODE: &str = "- Most common in-degree:";
}
