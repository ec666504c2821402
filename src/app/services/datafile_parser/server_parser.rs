//! Parsing of the SERVERS section
//!
//! Each line describes one FSD server as `id:hostname:location:name:flag:`.
//! The trailing colon is mandatory; anything after it is ignored.

use super::field_parsers::{get_optional_token, parse_boolean_flag};
use crate::app::models::FsdServer;
use crate::constants::FIELD_DELIMITER;
use crate::{Error, Result};

/// Number of segments up to and including the one after the trailing colon
const MIN_SEGMENTS: usize = 6;

/// Parser for single lines of the SERVERS section
#[derive(Debug, Clone, Default)]
pub struct FsdServerParser;

impl FsdServerParser {
    pub fn new() -> Self {
        Self
    }

    /// Decode one line into an FSD server
    pub fn parse(&self, line: &str) -> Result<FsdServer> {
        let segments: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if segments.len() < MIN_SEGMENTS {
            return Err(Error::format(
                "line",
                format!(
                    "expected 'id:hostname:location:name:flag:', found {} fields",
                    segments.len()
                ),
            ));
        }

        let address = get_optional_token(segments[1], true, "hostname")?;
        let location = get_optional_token(segments[2], true, "location")?;
        let name = get_optional_token(segments[3], true, "name")?;

        Ok(FsdServer {
            id: segments[0].to_string(),
            address: address.unwrap_or_default().to_string(),
            location: location.unwrap_or_default().to_string(),
            name: name.unwrap_or_default().to_string(),
            client_connection_allowed: parse_boolean_flag(segments[4], "client_connection_allowed")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_server() {
        let server = FsdServerParser::new()
            .parse("GERMANY:88.198.19.202:Europe:Germany Server:1:")
            .unwrap();

        assert_eq!(server.id, "GERMANY");
        assert_eq!(server.address, "88.198.19.202");
        assert_eq!(server.location, "Europe");
        assert_eq!(server.name, "Germany Server");
        assert!(server.client_connection_allowed);
    }

    #[test]
    fn test_trailing_segments_are_ignored() {
        let server = FsdServerParser::new()
            .parse("USA-E:1.2.3.4:New York:USA East:0:ignored:")
            .unwrap();
        assert!(!server.client_connection_allowed);
        assert_eq!(server.name, "USA East");
    }

    #[test]
    fn test_missing_trailing_colon_rejected() {
        assert!(FsdServerParser::new().parse("A:host:loc:name:1").is_err());
    }

    #[test]
    fn test_mandatory_fields() {
        let parser = FsdServerParser::new();
        assert!(parser.parse("A::loc:name:1:").is_err());
        assert!(parser.parse("A:host::name:1:").is_err());
        assert!(parser.parse("A:host:loc::1:").is_err());
    }

    #[test]
    fn test_invalid_flag_rejected() {
        let parser = FsdServerParser::new();
        assert!(parser.parse("A:host:loc:name:yes:").is_err());
        assert!(parser.parse("A:host:loc:name::").is_err());
        assert!(parser.parse("A:host:loc:name:2:").is_err());
    }
}
