//! Configuration management and validation.
//!
//! Provides the configuration structure for the data file decoder: the
//! accepted format versions, input size limits and diagnostic verbosity.

use crate::constants::{
    DEFAULT_MAX_INPUT_BYTES, SUPPORTED_FORMAT_VERSION_MAX, SUPPORTED_FORMAT_VERSION_MIN,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::debug;

/// Configuration for decoding data files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Oldest format version accepted without a warning
    pub min_format_version: i32,

    /// Newest format version accepted without a warning
    pub max_format_version: i32,

    /// Maximum size of a file loaded through `parse_file`
    pub max_input_bytes: u64,

    /// Echo rejected lines to `tracing` at debug level
    pub trace_rejected_lines: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_format_version: SUPPORTED_FORMAT_VERSION_MIN,
            max_format_version: SUPPORTED_FORMAT_VERSION_MAX,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            trace_rejected_lines: true,
        }
    }
}

impl ParserConfig {
    /// Create configuration with a custom supported version range
    pub fn with_format_versions(mut self, versions: RangeInclusive<i32>) -> Self {
        self.min_format_version = *versions.start();
        self.max_format_version = *versions.end();
        self
    }

    /// Create configuration with a custom input size limit
    pub fn with_max_input_bytes(mut self, max_input_bytes: u64) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    /// Stop echoing rejected lines to the tracing output
    pub fn without_rejection_tracing(mut self) -> Self {
        self.trace_rejected_lines = false;
        self
    }

    /// Range of format versions accepted without a warning
    pub fn supported_format_versions(&self) -> RangeInclusive<i32> {
        self.min_format_version..=self.max_format_version
    }

    /// Check whether the given format version lies inside the supported range
    pub fn is_supported_format_version(&self, version: i32) -> bool {
        self.supported_format_versions().contains(&version)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.min_format_version > self.max_format_version {
            return Err(Error::configuration(format!(
                "Supported format version range is empty: {}..={}",
                self.min_format_version, self.max_format_version
            )));
        }

        if self.max_input_bytes == 0 {
            return Err(Error::configuration("Maximum input size must be positive"));
        }

        debug!(
            "Parser configuration valid: versions {}..={}, max input {} bytes",
            self.min_format_version, self.max_format_version, self.max_input_bytes
        );
        Ok(())
    }
}
