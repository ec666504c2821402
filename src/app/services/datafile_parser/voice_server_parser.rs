//! Parsing of the VOICE SERVERS section
//!
//! Each line describes one voice server as `hostname:location:name:flag:type:`.
//! The type tag is kept as transmitted.

use super::field_parsers::{get_optional_token, parse_boolean_flag};
use crate::app::models::VoiceServer;
use crate::constants::FIELD_DELIMITER;
use crate::{Error, Result};

const MIN_SEGMENTS: usize = 5;

/// Parser for single lines of the VOICE SERVERS section
#[derive(Debug, Clone, Default)]
pub struct VoiceServerParser;

impl VoiceServerParser {
    pub fn new() -> Self {
        Self
    }

    /// Decode one line into a voice server
    pub fn parse(&self, line: &str) -> Result<VoiceServer> {
        let segments: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if segments.len() < MIN_SEGMENTS {
            return Err(Error::format(
                "line",
                format!(
                    "expected 'hostname:location:name:flag:type:', found {} fields",
                    segments.len()
                ),
            ));
        }

        let address = get_optional_token(segments[0], true, "hostname")?;
        let location = get_optional_token(segments[1], true, "location")?;
        let name = get_optional_token(segments[2], true, "name")?;

        Ok(VoiceServer {
            address: address.unwrap_or_default().to_string(),
            location: location.unwrap_or_default().to_string(),
            name: name.unwrap_or_default().to_string(),
            client_connection_allowed: parse_boolean_flag(segments[3], "client_connection_allowed")?,
            raw_server_type: segments[4].to_string(),
        })
    }
}
