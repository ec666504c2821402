//! Core data file parser implementation
//!
//! This module provides the main parser orchestration: splitting the document
//! into sections, dispatching every relevant line to its record parser,
//! classifying client records and collecting all diagnostics on the result.

use std::path::Path;
use tracing::{debug, info, warn};

use super::classifier::apply_classification;
use super::client_parser::ClientParser;
use super::general_parser::GeneralSectionParser;
use super::sections::SectionLineExtractor;
use super::server_parser::FsdServerParser;
use super::stats::{ParseResult, ParseStats};
use super::voice_server_parser::VoiceServerParser;
use crate::app::models::{
    ClientRecord, DataFile, DataFileFormat, ParserLogEntry, ParserLogEntryCollector,
};
use crate::config::ParserConfig;
use crate::constants::sections;
use crate::{Error, Result};

/// Parser for legacy data files
///
/// Decoding a document never fails: malformed lines are logged on the result
/// and excluded, everything else is returned. Only loading a file from disk can
/// produce an error.
#[derive(Debug, Clone)]
pub struct DataFileParser {
    config: ParserConfig,
    online_parser: ClientParser,
    prefile_parser: ClientParser,
    fsd_server_parser: FsdServerParser,
    voice_server_parser: VoiceServerParser,
    general_parser: GeneralSectionParser,
}

impl Default for DataFileParser {
    fn default() -> Self {
        Self::with_valid_config(ParserConfig::default())
    }
}

impl DataFileParser {
    /// Create a new parser with the given configuration
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: ParserConfig) -> Self {
        Self {
            config,
            online_parser: ClientParser::online(),
            prefile_parser: ClientParser::prefile(),
            fsd_server_parser: FsdServerParser::new(),
            voice_server_parser: VoiceServerParser::new(),
            general_parser: GeneralSectionParser::new(),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Decode a complete document
    pub fn parse(&self, content: &str) -> DataFile {
        self.parse_with_stats(content).data_file
    }

    /// Decode a complete document and report line statistics
    pub fn parse_with_stats(&self, content: &str) -> ParseResult {
        let extractor = SectionLineExtractor::new(content);
        let mut data_file = DataFile::new(DataFileFormat::Legacy);
        let mut stats = ParseStats::new();

        if extractor.has_byte_order_mark() {
            debug!("Skipped leading byte order mark");
        }
        for line in extractor.preamble_lines() {
            data_file.log().add(ParserLogEntry::new(
                sections::PREAMBLE,
                Some(line),
                false,
                "content before the first section header ignored",
            ));
        }

        let general_lines = extractor.relevant_lines(sections::GENERAL);
        data_file.metadata = self.general_parser.parse(&general_lines, data_file.log());
        self.check_format_version(&data_file, !general_lines.is_empty());

        let mut clients = self.parse_clients(
            &extractor,
            sections::CLIENTS,
            &self.online_parser,
            data_file.log(),
            &mut stats,
        );
        clients.extend(self.parse_clients(
            &extractor,
            sections::PREFILE,
            &self.prefile_parser,
            data_file.log(),
            &mut stats,
        ));
        data_file.clients = clients;

        data_file.fsd_servers = self.parse_records(
            &extractor,
            sections::SERVERS,
            data_file.log(),
            &mut stats,
            |line| self.fsd_server_parser.parse(line),
        );
        data_file.voice_servers = self.parse_records(
            &extractor,
            sections::VOICE_SERVERS,
            data_file.log(),
            &mut stats,
            |line| self.voice_server_parser.parse(line),
        );

        info!(
            "Parsed {} clients, {} FSD servers, {} voice servers ({} lines rejected, {} log entries)",
            data_file.clients.len(),
            data_file.fsd_servers.len(),
            data_file.voice_servers.len(),
            stats.total_rejected(),
            data_file.log().len()
        );

        ParseResult { data_file, stats }
    }

    /// Read and decode a data file from disk
    ///
    /// The file must not exceed the configured size limit. The legacy format does
    /// not declare a character encoding; invalid UTF-8 is replaced and reported.
    pub fn parse_file(&self, path: &Path) -> Result<DataFile> {
        Ok(self.parse_file_with_stats(path)?.data_file)
    }

    /// Read and decode a data file from disk and report line statistics
    ///
    /// Replaced invalid UTF-8 is recorded as a log entry on the result.
    pub fn parse_file_with_stats(&self, path: &Path) -> Result<ParseResult> {
        info!("Parsing data file: {}", path.display());

        let (content, first_invalid_byte) = self.read_file(path)?;
        let result = self.parse_with_stats(&content);

        if let Some(offset) = first_invalid_byte {
            result.data_file.log().add(ParserLogEntry::new(
                sections::DOCUMENT,
                None,
                false,
                format!(
                    "input is not valid UTF-8 (first invalid byte at offset {}); \
                     invalid sequences were replaced",
                    offset
                ),
            ));
        }

        Ok(result)
    }

    /// Read a data file with the configured size limit, without decoding it
    pub fn load_file(&self, path: &Path) -> Result<String> {
        self.read_file(path).map(|(content, _)| content)
    }

    /// Returns the text and the offset of the first invalid UTF-8 byte, if any
    fn read_file(&self, path: &Path) -> Result<(String, Option<usize>)> {
        let size = std::fs::metadata(path)
            .map_err(|e| Error::io(format!("Failed to inspect file {}", path.display()), e))?
            .len();
        if size > self.config.max_input_bytes {
            return Err(Error::input_too_large(size, self.config.max_input_bytes));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| Error::io(format!("Failed to read file {}", path.display()), e))?;

        match String::from_utf8(bytes) {
            Ok(content) => Ok((content, None)),
            Err(e) => {
                let offset = e.utf8_error().valid_up_to();
                warn!(
                    "File {} is not valid UTF-8 (first invalid byte at {}); replacing invalid sequences",
                    path.display(),
                    offset
                );
                Ok((String::from_utf8_lossy(e.as_bytes()).into_owned(), Some(offset)))
            }
        }
    }

    fn check_format_version(&self, data_file: &DataFile, has_general_section: bool) {
        let version = data_file.metadata.version_format;

        if version < 0 {
            if has_general_section {
                data_file.log().add(ParserLogEntry::new(
                    sections::GENERAL,
                    None,
                    false,
                    "format version not reported",
                ));
            }
            return;
        }

        if !self.config.is_supported_format_version(version) {
            warn!(
                "Unsupported format version {} (supported: {:?})",
                version,
                self.config.supported_format_versions()
            );
            data_file.log().add(ParserLogEntry::new(
                sections::GENERAL,
                None,
                false,
                format!(
                    "format version {} is outside the supported range {}..={}; parsing anyway",
                    version, self.config.min_format_version, self.config.max_format_version
                ),
            ));
        }
    }

    fn parse_clients(
        &self,
        extractor: &SectionLineExtractor<'_>,
        section: &str,
        parser: &ClientParser,
        log: &ParserLogEntryCollector,
        stats: &mut ParseStats,
    ) -> Vec<ClientRecord> {
        let mut clients = self.parse_records(extractor, section, log, stats, |line| {
            parser.parse(line).map(|record| (line, record))
        });

        for (line, record) in &mut clients {
            let line: &str = line;
            let raw_client_type = record.raw_client_type;

            match apply_classification(record) {
                Ok(rule) => {
                    if record.effective_client_type != raw_client_type {
                        stats.reclassified_clients += 1;
                        log.add(ParserLogEntry::new(
                            section,
                            Some(line),
                            false,
                            format!(
                                "client {} treated as {} instead of {} ({})",
                                record.callsign,
                                record
                                    .effective_client_type
                                    .map_or("unknown".to_string(), |t| t.to_string()),
                                raw_client_type.map_or("unknown".to_string(), |t| t.to_string()),
                                rule
                            ),
                        ));
                    }
                }
                Err(e) => {
                    stats.unresolved_clients += 1;
                    debug!("Client {} kept without effective type: {}", record.callsign, e);
                    log.add(
                        ParserLogEntry::new(
                            section,
                            Some(line),
                            false,
                            format!(
                                "effective client type of {} could not be determined; record kept",
                                record.callsign
                            ),
                        )
                        .with_cause(&e),
                    );
                }
            }
        }

        clients.into_iter().map(|(_, record)| record).collect()
    }

    /// Run a line parser over all relevant lines of a section
    ///
    /// Failures are logged as rejected lines and never abort the section.
    fn parse_records<'a, T, F>(
        &self,
        extractor: &SectionLineExtractor<'a>,
        section: &str,
        log: &ParserLogEntryCollector,
        stats: &mut ParseStats,
        parse_line: F,
    ) -> Vec<T>
    where
        F: Fn(&'a str) -> Result<T>,
    {
        let mut records = Vec::new();

        for line in extractor.relevant_lines(section) {
            match parse_line(line) {
                Ok(record) => {
                    records.push(record);
                    stats.record_accepted(section);
                }
                Err(e) => {
                    stats.record_rejected(section);
                    if self.config.trace_rejected_lines {
                        debug!("Rejected {} line: {} ({})", section, line, e);
                    }
                    log.add(
                        ParserLogEntry::new(section, Some(line), true, "line rejected")
                            .with_cause(&e),
                    );
                }
            }
        }

        records
    }
}
