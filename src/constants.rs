//! Format constants for the legacy VATSIM data file
//!
//! This module contains section names, the canonical client field positions,
//! sentinel values and the other fixed values of the legacy format.

// =============================================================================
// Sections
// =============================================================================

/// Section names as they appear in `!NAME:` headers (matched case-insensitively)
pub mod sections {
    pub const GENERAL: &str = "GENERAL";
    pub const CLIENTS: &str = "CLIENTS";
    pub const PREFILE: &str = "PREFILE";
    pub const SERVERS: &str = "SERVERS";
    pub const VOICE_SERVERS: &str = "VOICE SERVERS";

    /// Log label for content found before the first header
    pub const PREAMBLE: &str = "PREAMBLE";

    /// Log label for problems with the document as a whole
    pub const DOCUMENT: &str = "DOCUMENT";
}

/// UTF-8 byte order mark some editors put at the start of a file
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Prefix of comment lines
pub const COMMENT_PREFIX: char = ';';

/// Field delimiter of all colon-separated record sections
pub const FIELD_DELIMITER: char = ':';

// =============================================================================
// Client Field Positions
// =============================================================================

/// Positions of the fields in a CLIENTS or PREFILE line (format versions 8 and 9)
pub mod client_fields {
    pub const CALLSIGN: usize = 0;
    pub const VATSIM_ID: usize = 1;
    pub const REAL_NAME: usize = 2;
    pub const CLIENT_TYPE: usize = 3;
    pub const FREQUENCY: usize = 4;
    pub const LATITUDE: usize = 5;
    pub const LONGITUDE: usize = 6;
    pub const ALTITUDE: usize = 7;
    pub const GROUND_SPEED: usize = 8;
    pub const PLANNED_AIRCRAFT: usize = 9;
    pub const PLANNED_TAS_CRUISE: usize = 10;
    pub const PLANNED_DEPARTURE_AIRPORT: usize = 11;
    pub const PLANNED_ALTITUDE: usize = 12;
    pub const PLANNED_DESTINATION_AIRPORT: usize = 13;
    pub const SERVER: usize = 14;
    pub const PROTOCOL_REVISION: usize = 15;
    pub const CONTROLLER_RATING: usize = 16;
    pub const TRANSPONDER: usize = 17;
    pub const FACILITY_TYPE: usize = 18;
    pub const VISUAL_RANGE: usize = 19;
    pub const PLANNED_REVISION: usize = 20;
    pub const PLANNED_FLIGHT_TYPE: usize = 21;
    pub const PLANNED_DEPARTURE_TIME: usize = 22;
    pub const PLANNED_ACTUAL_DEPARTURE_TIME: usize = 23;
    pub const PLANNED_HOURS_ENROUTE: usize = 24;
    pub const PLANNED_MINUTES_ENROUTE: usize = 25;
    pub const PLANNED_HOURS_FUEL: usize = 26;
    pub const PLANNED_MINUTES_FUEL: usize = 27;
    pub const PLANNED_ALTERNATE_AIRPORT: usize = 28;
    pub const PLANNED_REMARKS: usize = 29;
    pub const PLANNED_ROUTE: usize = 30;
    pub const PLANNED_DEPARTURE_AIRPORT_LATITUDE: usize = 31;
    pub const PLANNED_DEPARTURE_AIRPORT_LONGITUDE: usize = 32;
    pub const PLANNED_DESTINATION_AIRPORT_LATITUDE: usize = 33;
    pub const PLANNED_DESTINATION_AIRPORT_LONGITUDE: usize = 34;
    pub const ATIS_MESSAGE: usize = 35;
    pub const TIME_LAST_ATIS_RECEIVED: usize = 36;
    pub const TIME_LOGON: usize = 37;
    pub const HEADING: usize = 38;
    pub const QNH_INCH_MERCURY: usize = 39;
    pub const QNH_HECTOPASCAL: usize = 40;

    /// Number of fields carrying data
    pub const FIELD_COUNT: usize = 41;

    /// Field names used in diagnostics, indexed by position
    pub const NAMES: [&str; FIELD_COUNT] = [
        "callsign",
        "vatsim_id",
        "real_name",
        "client_type",
        "frequency",
        "latitude",
        "longitude",
        "altitude",
        "ground_speed",
        "planned_aircraft",
        "planned_tas_cruise",
        "planned_departure_airport",
        "planned_altitude",
        "planned_destination_airport",
        "server",
        "protocol_revision",
        "controller_rating",
        "transponder",
        "facility_type",
        "visual_range",
        "planned_revision",
        "planned_flight_type",
        "planned_departure_time",
        "planned_actual_departure_time",
        "planned_hours_enroute",
        "planned_minutes_enroute",
        "planned_hours_fuel",
        "planned_minutes_fuel",
        "planned_alternate_airport",
        "planned_remarks",
        "planned_route",
        "planned_departure_airport_latitude",
        "planned_departure_airport_longitude",
        "planned_destination_airport_latitude",
        "planned_destination_airport_longitude",
        "atis_message",
        "time_last_atis_received",
        "time_logon",
        "heading",
        "qnh_inch_mercury",
        "qnh_hectopascal",
    ];
}

/// Literal client type tokens
pub const CLIENT_TYPE_PILOT: &str = "PILOT";
pub const CLIENT_TYPE_ATC: &str = "ATC";

// =============================================================================
// Sentinels
// =============================================================================

/// Absent VATSIM ID, protocol version, ground speed, heading, transponder, ...
pub const MISSING_INT: i32 = -1;

/// Absent VATSIM ID (wider type)
pub const MISSING_ID: i64 = -1;

/// Absent altitude
pub const MISSING_ALTITUDE: i32 = 0;

/// Absent frequency
pub const MISSING_FREQUENCY_KHZ: i32 = -1;

// =============================================================================
// Frequencies and Timestamps
// =============================================================================

/// Lowest frequency of the band used by stations that are not actively serving
pub const PLACEHOLDER_FREQUENCY_MIN_KHZ: i32 = 199_000;

/// Highest frequency of the band used by stations that are not actively serving
pub const PLACEHOLDER_FREQUENCY_MAX_KHZ: i32 = 199_998;

/// Timestamp literal some clients send instead of leaving the field empty
pub const EPOCH_ZERO_TIMESTAMP: &str = "00010101000000";

/// Separator between lines of a controller message (ATIS)
pub const CONTROLLER_MESSAGE_LINE_SEPARATOR: &str = "^§";

// =============================================================================
// General Section Keys
// =============================================================================

pub mod general_keys {
    pub const VERSION: &str = "VERSION";
    pub const RELOAD: &str = "RELOAD";
    pub const UPDATE: &str = "UPDATE";
    pub const ATIS_ALLOW_MIN: &str = "ATIS ALLOW MIN";
    pub const CONNECTED_CLIENTS: &str = "CONNECTED CLIENTS";
    pub const UNIQUE_USERS: &str = "UNIQUE USERS";
}

// =============================================================================
// Defaults
// =============================================================================

/// Oldest format version this decoder is known to handle
pub const SUPPORTED_FORMAT_VERSION_MIN: i32 = 8;

/// Newest format version this decoder is known to handle
pub const SUPPORTED_FORMAT_VERSION_MAX: i32 = 9;

/// Default maximum size of a data file read from disk (16 MiB)
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;
