//! Configuration I/O (YAML loading)
//!
//! Defines the on-disk schema. Loading and validation live in `mod.rs`.

use super::AggregatorConfig;
use serde::{Deserialize, Serialize};

/// YAML Schema v1
///
/// `version` is optional at the serde level so a missing field is reported as
/// `ConfigError::MissingVersion` instead of a generic YAML error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Aggregator settings
    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

pub const SUPPORTED_VERSIONS: &[u32] = &[1];
