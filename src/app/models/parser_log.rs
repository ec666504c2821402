//! Diagnostic log recorded while decoding a data file
//!
//! Every component that notices something abnormal appends a [`ParserLogEntry`],
//! whether or not the affected line ended up being rejected. Entries are never
//! modified or removed; callers inspect them to judge the fidelity of a result.

use std::error::Error as StdError;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// One diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserLogEntry {
    /// Section the message relates to
    pub section: String,

    /// Raw line that caused the message, if related to a single line
    pub line: Option<String>,

    /// Whether the line was excluded from the result
    pub is_line_rejected: bool,

    pub message: String,

    /// Rendered error chain that led to the message
    pub cause: Option<String>,
}

impl ParserLogEntry {
    /// Create an entry without a cause
    pub fn new(
        section: impl Into<String>,
        line: Option<&str>,
        is_line_rejected: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            line: line.map(str::to_string),
            is_line_rejected,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the error (and its sources) that caused this entry
    pub fn with_cause(mut self, cause: &(dyn StdError + 'static)) -> Self {
        let mut rendered = cause.to_string();
        let mut source = cause.source();
        while let Some(inner) = source {
            rendered.push_str(": ");
            rendered.push_str(&inner.to_string());
            source = inner.source();
        }
        self.cause = Some(rendered);
        self
    }
}

impl fmt::Display for ParserLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.section)?;
        if self.is_line_rejected {
            f.write_str("rejected: ")?;
        }
        f.write_str(&self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({})", cause)?;
        }
        if let Some(line) = &self.line {
            write!(f, " | {}", line)?;
        }
        Ok(())
    }
}

/// Append-only, thread-safe collection of log entries
#[derive(Debug, Default)]
pub struct ParserLogEntryCollector {
    entries: Mutex<Vec<ParserLogEntry>>,
}

impl ParserLogEntryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn add(&self, entry: ParserLogEntry) {
        self.lock().push(entry);
    }

    /// Copy of all entries in the order they were appended
    pub fn entries(&self) -> Vec<ParserLogEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of entries that rejected a line
    pub fn rejected_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|entry| entry.is_line_rejected)
            .count()
    }

    // A panic while holding the lock cannot leave a half-pushed entry behind,
    // so a poisoned lock still guards a consistent list.
    fn lock(&self) -> MutexGuard<'_, Vec<ParserLogEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clone for ParserLogEntryCollector {
    fn clone(&self) -> Self {
        Self {
            entries: Mutex::new(self.entries()),
        }
    }
}
