//! GENERAL section parsing and metadata extraction
//!
//! The GENERAL section is a block of `KEY = VALUE` lines in any order. Later
//! occurrences of a key overwrite earlier ones. Problems with single lines are
//! logged and the affected value stays at its sentinel.

use super::field_parsers::{parse_int_with_default, parse_timestamp};
use crate::app::models::{DataFileMetaData, ParserLogEntry, ParserLogEntryCollector};
use crate::constants::{MISSING_INT, general_keys, sections};
use crate::{Error, Result};
use chrono::Duration;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

static KEY_VALUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^=]*?)\s*=\s*(.*?)\s*$").expect("key/value pattern is valid")
});

/// Parser for the GENERAL section
#[derive(Debug, Clone, Default)]
pub struct GeneralSectionParser;

impl GeneralSectionParser {
    pub fn new() -> Self {
        Self
    }

    /// Decode the relevant lines of the GENERAL section
    ///
    /// Never fails: an empty section yields all-sentinel metadata and a log
    /// entry, unusable lines are logged and skipped.
    pub fn parse(&self, lines: &[&str], log: &ParserLogEntryCollector) -> DataFileMetaData {
        let mut metadata = DataFileMetaData::default();

        if lines.is_empty() {
            warn!("General section missing or empty; metadata unavailable");
            let cause = Error::structure(sections::GENERAL, "section missing or empty");
            log.add(
                ParserLogEntry::new(sections::GENERAL, None, false, "metadata unavailable")
                    .with_cause(&cause),
            );
            return metadata;
        }

        // Last occurrence of each key wins
        let mut values: HashMap<String, (&str, &str)> = HashMap::new();
        let mut key_order: Vec<String> = Vec::new();

        for &line in lines {
            let Some((key, value)) = split_key_value(line) else {
                log.add(ParserLogEntry::new(
                    sections::GENERAL,
                    Some(line),
                    true,
                    "line is not of the form 'KEY = VALUE'",
                ));
                continue;
            };

            if values.insert(key.clone(), (value, line)).is_some() {
                log.add(ParserLogEntry::new(
                    sections::GENERAL,
                    Some(line),
                    false,
                    format!("duplicate key '{}' overwrites earlier value", key),
                ));
            } else {
                key_order.push(key);
            }
        }

        for key in key_order {
            let Some(&(value, line)) = values.get(&key) else {
                continue;
            };

            match apply_value(&mut metadata, &key, value) {
                Ok(true) => {}
                Ok(false) => {
                    debug!("Ignoring unknown general key '{}'", key);
                    log.add(ParserLogEntry::new(
                        sections::GENERAL,
                        Some(line),
                        false,
                        format!("unknown key '{}'", key),
                    ));
                }
                Err(e) => {
                    log.add(
                        ParserLogEntry::new(
                            sections::GENERAL,
                            Some(line),
                            true,
                            format!("invalid value for key '{}'", key),
                        )
                        .with_cause(&e),
                    );
                }
            }
        }

        metadata
    }
}

fn split_key_value(line: &str) -> Option<(String, &str)> {
    let captures = KEY_VALUE_PATTERN.captures(line)?;
    let key = captures.get(1)?.as_str();
    if key.is_empty() {
        return None;
    }
    let value = captures.get(2).map_or("", |m| m.as_str());
    Some((key.to_uppercase(), value))
}

/// Store a value for a known key; returns `false` for unknown keys
fn apply_value(metadata: &mut DataFileMetaData, key: &str, value: &str) -> Result<bool> {
    match key {
        general_keys::VERSION => {
            metadata.version_format = parse_int_with_default(value, MISSING_INT, true, key)?;
        }
        general_keys::RELOAD => {
            metadata.minimum_data_file_retrieval_interval = Some(parse_minutes(value, key)?);
        }
        general_keys::ATIS_ALLOW_MIN => {
            metadata.minimum_atis_retrieval_interval = Some(parse_minutes(value, key)?);
        }
        general_keys::CONNECTED_CLIENTS => {
            metadata.number_of_connected_clients =
                parse_int_with_default(value, MISSING_INT, true, key)?;
        }
        general_keys::UNIQUE_USERS => {
            metadata.number_of_unique_connected_users =
                parse_int_with_default(value, MISSING_INT, true, key)?;
        }
        general_keys::UPDATE => {
            metadata.timestamp = parse_timestamp(value, true, key)?;
        }
        _ => return Ok(false),
    }

    Ok(true)
}

/// Parse an interval given in whole or fractional minutes, rounded to seconds
pub fn parse_minutes(value: &str, field_name: &str) -> Result<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::format(field_name, "mandatory field is empty"));
    }

    if let Ok(minutes) = value.parse::<i64>() {
        if minutes < 0 {
            return Err(Error::format(field_name, "interval must not be negative"));
        }
        if minutes > i64::from(i32::MAX) {
            return Err(Error::format(
                field_name,
                format!("interval '{}' is out of range", value),
            ));
        }
        return Ok(Duration::minutes(minutes));
    }

    let minutes = value.parse::<f64>().map_err(|e| {
        Error::format(
            field_name,
            format!("invalid interval format '{}' ({})", value, e),
        )
    })?;

    let seconds = (minutes * 60.0).round();
    if !seconds.is_finite() || seconds < 0.0 || seconds > i32::MAX as f64 {
        return Err(Error::format(
            field_name,
            format!("interval '{}' is out of range", value),
        ));
    }

    Ok(Duration::seconds(seconds as i64))
}
