//! VATSIM Data File Library
//!
//! A Rust library for decoding the legacy, colon-delimited VATSIM network status
//! data file (`vatsim-data.txt`, format versions 8 and 9) into typed records.
//!
//! This library provides tools for:
//! - Splitting a status document into its `!NAME:` sections (and rewriting them in place)
//! - Decoding online clients, prefiled flight plans and ATC stations with per-role field rules
//! - Correcting the perceived role of ambiguous or corrupted client records
//! - Decoding FSD and voice server lists and the general metadata block
//! - Collecting a structured per-line diagnostic log alongside every result

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod datafile_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    ClientRecord, ClientType, DataFile, DataFileFormat, DataFileMetaData, FsdServer,
    ParserLogEntry, VoiceServer,
};
pub use app::services::datafile_parser::DataFileParser;
pub use config::ParserConfig;

/// Result type alias for data file decoding
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for data file decoding operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A single token or line does not follow the record grammar
    #[error("Format error in field '{field}': {message}")]
    Format { field: String, message: String },

    /// A section of the document is missing or unusable
    #[error("Structural error in section '{section}': {message}")]
    Structure { section: String, message: String },

    /// The effective role of a client record could not be determined
    #[error("Unable to classify client '{callsign}': {message}")]
    Classification { callsign: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Input exceeds the configured size limit
    #[error("Input of {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create a format error for the named field
    pub fn format(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a structural error for the named section
    pub fn structure(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Structure {
            section: section.into(),
            message: message.into(),
        }
    }

    /// Create a classification error for the given callsign
    pub fn classification(callsign: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Classification {
            callsign: callsign.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an input size error
    pub fn input_too_large(size: u64, limit: u64) -> Self {
        Self::InputTooLarge { size, limit }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check whether this error only affects a single line of a document
    pub fn is_line_local(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
