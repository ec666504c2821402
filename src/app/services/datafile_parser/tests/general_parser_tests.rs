//! Tests for GENERAL section decoding

use crate::app::models::ParserLogEntryCollector;
use crate::app::services::datafile_parser::GeneralSectionParser;
use chrono::{Duration, TimeZone, Utc};

#[test]
fn test_parse_all_known_keys() {
    let log = ParserLogEntryCollector::new();
    let lines = [
        "VERSION = 8",
        "RELOAD = 1",
        "UPDATE = 20180126214000",
        "ATIS ALLOW MIN = 0.5",
        "CONNECTED CLIENTS = 1123",
        "UNIQUE USERS = 1089",
    ];

    let metadata = GeneralSectionParser::new().parse(&lines, &log);

    assert_eq!(metadata.version_format, 8);
    assert_eq!(
        metadata.minimum_data_file_retrieval_interval,
        Some(Duration::minutes(1))
    );
    assert_eq!(
        metadata.minimum_atis_retrieval_interval,
        Some(Duration::seconds(30))
    );
    assert_eq!(metadata.number_of_connected_clients, 1123);
    assert_eq!(metadata.number_of_unique_connected_users, 1089);
    assert_eq!(
        metadata.timestamp,
        Some(Utc.with_ymd_and_hms(2018, 1, 26, 21, 40, 0).unwrap())
    );
    assert!(log.is_empty());
}

#[test]
fn test_keys_in_any_order_and_case() {
    let log = ParserLogEntryCollector::new();
    let lines = ["unique users=3", "Version= 9"];

    let metadata = GeneralSectionParser::new().parse(&lines, &log);

    assert_eq!(metadata.version_format, 9);
    assert_eq!(metadata.number_of_unique_connected_users, 3);
    assert_eq!(metadata.number_of_connected_clients, -1);
    assert!(log.is_empty());
}

#[test]
fn test_last_duplicate_wins() {
    let log = ParserLogEntryCollector::new();
    let lines = ["VERSION = 8", "VERSION = 9"];

    let metadata = GeneralSectionParser::new().parse(&lines, &log);

    assert_eq!(metadata.version_format, 9);
    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].is_line_rejected);
    assert_eq!(entries[0].line.as_deref(), Some("VERSION = 9"));
}

#[test]
fn test_unknown_key_noted() {
    let log = ParserLogEntryCollector::new();
    let metadata = GeneralSectionParser::new().parse(&["VERSION = 9", "MOTD = hello"], &log);

    assert_eq!(metadata.version_format, 9);
    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].is_line_rejected);
    assert!(entries[0].message.contains("MOTD"));
}

#[test]
fn test_invalid_values_rejected() {
    let log = ParserLogEntryCollector::new();
    let lines = [
        "VERSION = nine",
        "RELOAD = -2",
        "UPDATE = yesterday",
        "CONNECTED CLIENTS = 12",
    ];

    let metadata = GeneralSectionParser::new().parse(&lines, &log);

    assert_eq!(metadata.version_format, -1);
    assert_eq!(metadata.minimum_data_file_retrieval_interval, None);
    assert_eq!(metadata.timestamp, None);
    assert_eq!(metadata.number_of_connected_clients, 12);

    assert_eq!(log.len(), 3);
    assert_eq!(log.rejected_count(), 3);
    assert!(log.entries().iter().all(|e| e.cause.is_some()));
}

#[test]
fn test_line_without_separator_rejected() {
    let log = ParserLogEntryCollector::new();
    let metadata = GeneralSectionParser::new().parse(&["VERSION 9"], &log);

    assert_eq!(metadata.version_format, -1);
    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].is_line_rejected);
    assert_eq!(entries[0].line.as_deref(), Some("VERSION 9"));
}

#[test]
fn test_empty_section() {
    let log = ParserLogEntryCollector::new();
    let metadata = GeneralSectionParser::new().parse(&[], &log);

    assert_eq!(metadata, Default::default());
    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "metadata unavailable");
    assert!(!entries[0].is_line_rejected);
    assert!(entries[0].cause.is_some());
}

#[test]
fn test_update_in_iso_format() {
    let log = ParserLogEntryCollector::new();
    let metadata =
        GeneralSectionParser::new().parse(&["UPDATE = 2018-01-26T21:40:00Z"], &log);

    assert_eq!(
        metadata.timestamp,
        Some(Utc.with_ymd_and_hms(2018, 1, 26, 21, 40, 0).unwrap())
    );
}
