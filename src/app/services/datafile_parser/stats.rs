//! Parsing statistics and result structures for data file processing
//!
//! This module provides types for tracking how many lines of each section
//! were accepted, rejected or needed role correction.

use crate::app::models::DataFile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decoded data file with statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub data_file: DataFile,
    pub stats: ParseStats,
}

/// Line counts of a single section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionStats {
    /// Relevant lines encountered
    pub lines: usize,

    /// Lines that produced a record
    pub accepted: usize,

    /// Lines excluded from the result
    pub rejected: usize,
}

/// Parsing statistics for one document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseStats {
    /// Per-section line counts, keyed by section name
    pub sections: BTreeMap<String, SectionStats>,

    /// Client records whose effective type differs from the raw type
    pub reclassified_clients: usize,

    /// Client records kept without an effective type
    pub unresolved_clients: usize,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&mut self, section: &str) {
        let entry = self.sections.entry(section.to_string()).or_default();
        entry.lines += 1;
        entry.accepted += 1;
    }

    pub fn record_rejected(&mut self, section: &str) {
        let entry = self.sections.entry(section.to_string()).or_default();
        entry.lines += 1;
        entry.rejected += 1;
    }

    pub fn total_lines(&self) -> usize {
        self.sections.values().map(|s| s.lines).sum()
    }

    pub fn total_accepted(&self) -> usize {
        self.sections.values().map(|s| s.accepted).sum()
    }

    pub fn total_rejected(&self) -> usize {
        self.sections.values().map(|s| s.rejected).sum()
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_lines();
        if total == 0 {
            0.0
        } else {
            (self.total_accepted() as f64 / total as f64) * 100.0
        }
    }

    /// Check if parsing was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }
}
