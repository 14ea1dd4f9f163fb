//! Aggregator configuration
//!
//! Settings for the directory-wide report scan. Defaults reproduce the
//! behavior of the command-line tool (ten concurrent file tasks, links not
//! followed, no size cap); a YAML file can override them.
//!
//! ```yaml
//! version: 1
//! aggregator:
//!   max_concurrency: 4
//!   follow_links: false
//!   max_file_size: 10485760
//! ```

pub mod error;
pub mod io;

pub use error::{ConfigError, ConfigResult};

use io::{ConfigExportV1, SUPPORTED_VERSIONS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of files processed at the same time
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Upper bound accepted for `max_concurrency`
pub const MAX_CONCURRENCY_LIMIT: usize = 1024;

/// Directory scan settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregatorConfig {
    /// Maximum number of file tasks running at once (default: 10)
    pub max_concurrency: usize,

    /// Follow symbolic links while walking (default: false)
    pub follow_links: bool,

    /// Skip files larger than this many bytes (default: no limit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            follow_links: false,
            max_file_size: None,
        }
    }
}

impl AggregatorConfig {
    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n;
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Check field ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_concurrency == 0 || self.max_concurrency > MAX_CONCURRENCY_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_concurrency",
                self.max_concurrency,
                1,
                MAX_CONCURRENCY_LIMIT,
                "The scan needs at least one worker; very large pools only add open file handles.",
            ));
        }
        Ok(())
    }

    /// Load and validate a YAML configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML configuration text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        match export.version {
            None => return Err(ConfigError::MissingVersion),
            Some(v) if !SUPPORTED_VERSIONS.contains(&v) => {
                return Err(ConfigError::UnsupportedVersion {
                    found: v,
                    supported: SUPPORTED_VERSIONS.to_vec(),
                })
            }
            Some(_) => {}
        }

        export.aggregator.validate()?;
        Ok(export.aggregator)
    }

    /// Export as YAML schema v1
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            aggregator: self.clone(),
        };
        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}
