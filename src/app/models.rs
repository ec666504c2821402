//! Data models for decoded VATSIM data files
//!
//! This module contains the typed representation of one status document: client
//! records split by role, infrastructure servers, general metadata and the
//! diagnostic log. Absent values follow the sentinel conventions of the legacy
//! format (negative integers, `0` altitude, empty strings, `NaN`, `None`).

pub mod parser_log;

pub use parser_log::{ParserLogEntry, ParserLogEntryCollector};

use crate::constants::{
    CONTROLLER_MESSAGE_LINE_SEPARATOR, MISSING_ALTITUDE, MISSING_FREQUENCY_KHZ, MISSING_ID,
    MISSING_INT, PLACEHOLDER_FREQUENCY_MAX_KHZ, PLACEHOLDER_FREQUENCY_MIN_KHZ,
};
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Roles and Ratings
// =============================================================================

/// Role of a client on the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientType {
    /// Pilot connected to the network
    PilotConnected,
    /// Flight plan filed by a pilot who is not connected yet
    PilotPrefiled,
    /// Controller connected to the network
    AtcConnected,
    /// ATIS station; only the structured feed distinguishes these, the legacy
    /// type token never yields it
    Atis,
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClientType::PilotConnected => "pilot (connected)",
            ClientType::PilotPrefiled => "pilot (prefiled)",
            ClientType::AtcConnected => "ATC (connected)",
            ClientType::Atis => "ATIS",
        };
        f.write_str(name)
    }
}

/// Controller rating as assigned by the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerRating {
    /// Observer; also implied for every connected pilot
    Obs,
    S1,
    S2,
    S3,
    C1,
    C2,
    C3,
    I1,
    I2,
    I3,
    /// Supervisor
    Sup,
    /// Administrator
    Adm,
}

impl ControllerRating {
    /// Resolve a numeric rating ID as used by the legacy format
    pub fn from_legacy_id(id: i32) -> Result<Self> {
        match id {
            1 => Ok(Self::Obs),
            2 => Ok(Self::S1),
            3 => Ok(Self::S2),
            4 => Ok(Self::S3),
            5 => Ok(Self::C1),
            6 => Ok(Self::C2),
            7 => Ok(Self::C3),
            8 => Ok(Self::I1),
            9 => Ok(Self::I2),
            10 => Ok(Self::I3),
            11 => Ok(Self::Sup),
            12 => Ok(Self::Adm),
            _ => Err(Error::format(
                "controller_rating",
                format!("unknown controller rating ID {}", id),
            )),
        }
    }

    /// Numeric rating ID as used by the legacy format
    pub fn legacy_id(&self) -> i32 {
        match self {
            Self::Obs => 1,
            Self::S1 => 2,
            Self::S2 => 3,
            Self::S3 => 4,
            Self::C1 => 5,
            Self::C2 => 6,
            Self::C3 => 7,
            Self::I1 => 8,
            Self::I2 => 9,
            Self::I3 => 10,
            Self::Sup => 11,
            Self::Adm => 12,
        }
    }
}

/// Type of facility an ATC station provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilityType {
    Observer,
    FlightServiceStation,
    Delivery,
    Ground,
    Tower,
    ApproachDeparture,
    Center,
}

impl FacilityType {
    /// Resolve a numeric facility ID as used by the legacy format
    pub fn from_legacy_id(id: i32) -> Result<Self> {
        match id {
            0 => Ok(Self::Observer),
            1 => Ok(Self::FlightServiceStation),
            2 => Ok(Self::Delivery),
            3 => Ok(Self::Ground),
            4 => Ok(Self::Tower),
            5 => Ok(Self::ApproachDeparture),
            6 => Ok(Self::Center),
            _ => Err(Error::format(
                "facility_type",
                format!("unknown facility type ID {}", id),
            )),
        }
    }
}

/// Check whether a frequency lies in the band used by stations that are not
/// actively serving (199.000 - 199.998 MHz)
pub fn is_placeholder_frequency(frequency_khz: i32) -> bool {
    (PLACEHOLDER_FREQUENCY_MIN_KHZ..=PLACEHOLDER_FREQUENCY_MAX_KHZ).contains(&frequency_khz)
}

// =============================================================================
// Client Records
// =============================================================================

/// Live state of a connected client
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    /// Altitude in feet, `0` if absent
    pub altitude_feet: i32,

    /// Ground speed in knots, negative if absent
    pub ground_speed: i32,

    /// Heading in degrees, negative if absent
    pub heading: i32,

    /// Transponder code as decimal digits; may exceed four digits
    pub transponder_code: i32,

    /// Local QNH in inches of mercury, `NaN` if absent
    pub qnh_inch_mercury: f64,

    /// Local QNH in hectopascal, negative if absent
    pub qnh_hectopascal: i32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            altitude_feet: MISSING_ALTITUDE,
            ground_speed: MISSING_INT,
            heading: MISSING_INT,
            transponder_code: MISSING_INT,
            qnh_inch_mercury: f64::NAN,
            qnh_hectopascal: MISSING_INT,
        }
    }
}

impl Motion {
    pub fn has_heading(&self) -> bool {
        self.heading >= 0
    }

    pub fn has_transponder_code(&self) -> bool {
        self.transponder_code >= 0
    }

    pub fn has_qnh(&self) -> bool {
        !self.qnh_inch_mercury.is_nan() || self.qnh_hectopascal >= 0
    }
}

/// Flight plan filed by a pilot
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlan {
    pub aircraft_type: String,

    /// Planned true airspeed in cruise (knots), negative if absent
    pub true_airspeed_cruise: i32,

    pub departure_airport: String,

    /// Filed altitude exactly as entered by the pilot (`FL350`, `35000`, ...)
    pub raw_altitude: String,

    pub destination_airport: String,

    /// Revision counter of the flight plan, negative if absent
    pub revision: i32,

    /// Flight rules as entered (`I`, `V`, `Y`, `Z`, ...)
    pub flight_rules: String,

    /// Planned departure time as entered (usually HHMM), negative if absent
    pub raw_departure_time_planned: i32,

    /// Actual departure time as entered (usually HHMM), negative if absent
    pub raw_departure_time_actual: i32,

    pub time_enroute: Option<Duration>,
    pub time_fuel: Option<Duration>,
    pub alternate_airport: String,
    pub remarks: String,
    pub route: String,

    pub departure_airport_latitude: f64,
    pub departure_airport_longitude: f64,
    pub destination_airport_latitude: f64,
    pub destination_airport_longitude: f64,
}

impl Default for FlightPlan {
    fn default() -> Self {
        Self {
            aircraft_type: String::new(),
            true_airspeed_cruise: MISSING_INT,
            departure_airport: String::new(),
            raw_altitude: String::new(),
            destination_airport: String::new(),
            revision: MISSING_INT,
            flight_rules: String::new(),
            raw_departure_time_planned: MISSING_INT,
            raw_departure_time_actual: MISSING_INT,
            time_enroute: None,
            time_fuel: None,
            alternate_airport: String::new(),
            remarks: String::new(),
            route: String::new(),
            departure_airport_latitude: f64::NAN,
            departure_airport_longitude: f64::NAN,
            destination_airport_latitude: f64::NAN,
            destination_airport_longitude: f64::NAN,
        }
    }
}

/// Station information of a connected controller
#[derive(Debug, Clone, PartialEq)]
pub struct AtcStation {
    /// Served frequency in kHz, negative if absent
    pub served_frequency_khz: i32,

    pub facility_type: Option<FacilityType>,

    /// Visual range in nautical miles, negative if absent
    pub visual_range: i32,

    /// Controller message (ATIS) exactly as transmitted, lines joined by `^§`
    pub controller_message_raw: String,

    pub controller_message_last_updated: Option<DateTime<Utc>>,
}

impl Default for AtcStation {
    fn default() -> Self {
        Self {
            served_frequency_khz: MISSING_FREQUENCY_KHZ,
            facility_type: None,
            visual_range: MISSING_INT,
            controller_message_raw: String::new(),
            controller_message_last_updated: None,
        }
    }
}

impl AtcStation {
    /// Check whether the station is logged in without serving a real frequency
    pub fn is_on_placeholder_frequency(&self) -> bool {
        is_placeholder_frequency(self.served_frequency_khz)
    }

    pub fn has_controller_message(&self) -> bool {
        !self.controller_message_raw.is_empty()
    }

    /// Split the controller message into its individual lines
    ///
    /// The character encoding of the message is not documented by the network;
    /// the text is returned exactly as it was handed to the decoder.
    pub fn controller_message_lines(&self) -> Vec<&str> {
        if self.controller_message_raw.is_empty() {
            return Vec::new();
        }

        self.controller_message_raw
            .split(CONTROLLER_MESSAGE_LINE_SEPARATOR)
            .collect()
    }
}

/// Role-specific part of a client record, keyed by the raw client type
#[derive(Debug, Clone, PartialEq)]
pub enum ClientDetails {
    /// Connected pilot
    Pilot {
        motion: Motion,
        flight_plan: FlightPlan,
    },
    /// Prefiled flight plan
    Prefiled(FlightPlan),
    /// Connected controller
    Atc { motion: Motion, station: AtcStation },
    /// Connection without a client type ("ghost"); only live state is decoded
    Ghost(Motion),
}

/// One decoded line of the CLIENTS or PREFILE section
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRecord {
    pub callsign: String,

    /// VATSIM user ID, negative if absent
    pub vatsim_id: i64,

    pub real_name: String,

    /// Role as indicated by the type token; `None` only for ghost records
    pub raw_client_type: Option<ClientType>,

    /// Role after heuristic correction; `None` if it could not be resolved
    pub effective_client_type: Option<ClientType>,

    /// Latitude in degrees, `NaN` if absent (not range checked)
    pub latitude: f64,

    /// Longitude in degrees, `NaN` if absent (not range checked)
    pub longitude: f64,

    /// Identifier of the server the client is connected to, empty if absent
    pub server_id: String,

    /// Protocol revision of the client, negative if absent
    pub protocol_version: i32,

    pub controller_rating: Option<ControllerRating>,

    pub logon_time: Option<DateTime<Utc>>,

    pub details: ClientDetails,
}

impl ClientRecord {
    /// Create a record with all common attributes absent
    pub fn new(callsign: impl Into<String>, details: ClientDetails) -> Self {
        Self {
            callsign: callsign.into(),
            vatsim_id: MISSING_ID,
            real_name: String::new(),
            raw_client_type: None,
            effective_client_type: None,
            latitude: f64::NAN,
            longitude: f64::NAN,
            server_id: String::new(),
            protocol_version: MISSING_INT,
            controller_rating: None,
            logon_time: None,
            details,
        }
    }

    /// Live state, if the record describes a connection
    pub fn motion(&self) -> Option<&Motion> {
        match &self.details {
            ClientDetails::Pilot { motion, .. }
            | ClientDetails::Atc { motion, .. }
            | ClientDetails::Ghost(motion) => Some(motion),
            ClientDetails::Prefiled(_) => None,
        }
    }

    /// Flight plan, if the record belongs to a pilot
    pub fn flight_plan(&self) -> Option<&FlightPlan> {
        match &self.details {
            ClientDetails::Pilot { flight_plan, .. } | ClientDetails::Prefiled(flight_plan) => {
                Some(flight_plan)
            }
            ClientDetails::Atc { .. } | ClientDetails::Ghost(_) => None,
        }
    }

    /// Station information, if the record belongs to a controller
    pub fn atc_station(&self) -> Option<&AtcStation> {
        match &self.details {
            ClientDetails::Atc { station, .. } => Some(station),
            _ => None,
        }
    }

    pub fn has_position(&self) -> bool {
        !self.latitude.is_nan() && !self.longitude.is_nan()
    }

    /// Ghost records carry neither a client type nor a protocol version
    pub fn is_ghost(&self) -> bool {
        self.raw_client_type.is_none()
    }
}

// =============================================================================
// Servers
// =============================================================================

/// FSD server clients can connect to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsdServer {
    pub id: String,
    pub address: String,
    pub location: String,
    pub name: String,
    pub client_connection_allowed: bool,
}

/// Voice server used for radio communication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceServer {
    pub address: String,
    pub location: String,
    pub name: String,
    pub client_connection_allowed: bool,

    /// Server type tag as transmitted; not interpreted
    pub raw_server_type: String,
}

// =============================================================================
// Metadata and Snapshot
// =============================================================================

/// Document-wide information from the GENERAL section
#[derive(Debug, Clone, PartialEq)]
pub struct DataFileMetaData {
    /// Format version, negative if absent
    pub version_format: i32,

    /// Minimum interval between two retrievals of the data file
    pub minimum_data_file_retrieval_interval: Option<Duration>,

    /// Minimum interval between two retrievals of ATIS information
    pub minimum_atis_retrieval_interval: Option<Duration>,

    /// Number of connected clients reported by the server, negative if absent
    pub number_of_connected_clients: i32,

    /// Number of unique connected users reported by the server, negative if absent
    pub number_of_unique_connected_users: i32,

    /// Time the server generated the document
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for DataFileMetaData {
    fn default() -> Self {
        Self {
            version_format: MISSING_INT,
            minimum_data_file_retrieval_interval: None,
            minimum_atis_retrieval_interval: None,
            number_of_connected_clients: MISSING_INT,
            number_of_unique_connected_users: MISSING_INT,
            timestamp: None,
        }
    }
}

/// Variant of the status document a result was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataFileFormat {
    /// Sectioned, colon-delimited text (`vatsim-data.txt`)
    Legacy,
}

/// Complete result of decoding one status document
#[derive(Debug, Clone)]
pub struct DataFile {
    pub format: DataFileFormat,
    pub metadata: DataFileMetaData,
    pub clients: Vec<ClientRecord>,
    pub fsd_servers: Vec<FsdServer>,
    pub voice_servers: Vec<VoiceServer>,
    log: ParserLogEntryCollector,
}

impl DataFile {
    /// Create an empty result for the given format
    pub fn new(format: DataFileFormat) -> Self {
        Self {
            format,
            metadata: DataFileMetaData::default(),
            clients: Vec::new(),
            fsd_servers: Vec::new(),
            voice_servers: Vec::new(),
            log: ParserLogEntryCollector::new(),
        }
    }

    /// Collector receiving diagnostics for this result
    pub fn log(&self) -> &ParserLogEntryCollector {
        &self.log
    }

    /// Copy of all diagnostics recorded so far
    pub fn parser_log_entries(&self) -> Vec<ParserLogEntry> {
        self.log.entries()
    }

    /// Iterate over clients with the given effective role
    pub fn clients_of_type(&self, client_type: ClientType) -> impl Iterator<Item = &ClientRecord> {
        self.clients
            .iter()
            .filter(move |client| client.effective_client_type == Some(client_type))
    }
}
