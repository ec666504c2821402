//! Decoder for legacy VATSIM data files
//!
//! This module turns one `vatsim-data.txt` status document into a [`DataFile`]:
//! general metadata, client records, FSD servers and voice servers, plus a log
//! of every line that was rejected or looked suspicious.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`parser`] - Orchestration of sections, record parsers and diagnostics
//! - [`sections`] - Splitting a document into `!NAME:` sections
//! - [`client_parser`] - CLIENTS and PREFILE lines with per-role field rules
//! - [`classifier`] - Effective client type correction
//! - [`server_parser`] / [`voice_server_parser`] - Infrastructure server lines
//! - [`general_parser`] - The `KEY = VALUE` metadata block
//! - [`field_parsers`] - Token decoders with sentinel handling
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use vatsim_datafile::DataFileParser;
//!
//! let document = "!GENERAL:\n\
//!                 VERSION = 9\n\
//!                 !SERVERS:\n\
//!                 EUROPE-C2:1.2.3.4:Europe:Europe Server:1:\n";
//!
//! let data_file = DataFileParser::default().parse(document);
//!
//! assert_eq!(data_file.metadata.version_format, 9);
//! assert_eq!(data_file.fsd_servers.len(), 1);
//! for entry in data_file.parser_log_entries() {
//!     println!("{}", entry);
//! }
//! ```
//!
//! [`DataFile`]: crate::app::models::DataFile

pub mod classifier;
pub mod client_parser;
pub mod field_parsers;
pub mod general_parser;
pub mod parser;
pub mod sections;
pub mod server_parser;
pub mod stats;
pub mod voice_server_parser;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use classifier::{CLASSIFICATION_RULES, ClassificationRule, Resolution};
pub use client_parser::{ClientParser, ClientSection};
pub use general_parser::GeneralSectionParser;
pub use parser::DataFileParser;
pub use sections::SectionLineExtractor;
pub use server_parser::FsdServerParser;
pub use stats::{ParseResult, ParseStats, SectionStats};
pub use voice_server_parser::VoiceServerParser;
