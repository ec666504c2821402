//! Client record parsing for the CLIENTS and PREFILE sections
//!
//! Both sections share one line layout of 41 colon-terminated fields (see
//! [`crate::constants::client_fields`]). Which of those fields must, may or must
//! not be set depends on the role of the record: connected pilot, connected
//! controller, prefiled flight plan or a "ghost" connection without any client
//! type. A field that is not allowed for a role must be empty (numeric fields
//! may also be zero) and then decodes to its sentinel; anything else rejects
//! the line.
//!
//! The parser only decodes. The effective role is determined afterwards by
//! [`super::classifier`].

use super::field_parsers::{
    get_field, get_optional_token, parse_coordinate, parse_double, parse_duration_hours_minutes,
    parse_frequency_khz, parse_int_with_default, parse_long_with_default, parse_string,
    parse_timestamp,
};
use crate::app::models::{
    AtcStation, ClientDetails, ClientRecord, ClientType, ControllerRating, FacilityType,
    FlightPlan, Motion,
};
use crate::constants::client_fields::*;
use crate::constants::{
    CLIENT_TYPE_ATC, CLIENT_TYPE_PILOT, EPOCH_ZERO_TIMESTAMP, FIELD_DELIMITER, MISSING_ALTITUDE,
    MISSING_FREQUENCY_KHZ, MISSING_ID, MISSING_INT,
};
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};

/// Section a client line is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSection {
    /// CLIENTS: connected pilots, controllers and ghost connections
    Online,
    /// PREFILE: flight plans of pilots who are not connected yet
    Prefile,
}

/// Role a line is decoded as, derived from section and type token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    OnlinePilot,
    Atc,
    Prefiled,
    Ghost,
}

/// Whether a field has to be, may be or must not be set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Mandatory,
    Optional,
    Forbidden,
}

use Presence::{Forbidden, Mandatory, Optional};

/// Presence of each field group for one role
#[derive(Debug, Clone, Copy)]
struct FieldRules {
    vatsim_id: Presence,
    position: Presence,
    motion: Presence,
    flight_plan: Presence,
    server: Presence,
    protocol_version: Presence,
    frequency: Presence,
    facility_type: Presence,
    atc_station: Presence,
    logon_time: Presence,
}

impl FieldRules {
    fn for_role(role: Role) -> Self {
        match role {
            Role::OnlinePilot => Self {
                vatsim_id: Mandatory,
                position: Mandatory,
                motion: Optional,
                flight_plan: Optional,
                server: Mandatory,
                protocol_version: Mandatory,
                frequency: Forbidden,
                facility_type: Forbidden,
                atc_station: Forbidden,
                logon_time: Mandatory,
            },
            Role::Atc => Self {
                vatsim_id: Mandatory,
                position: Mandatory,
                motion: Optional,
                flight_plan: Forbidden,
                server: Mandatory,
                protocol_version: Mandatory,
                frequency: Mandatory,
                facility_type: Mandatory,
                atc_station: Optional,
                logon_time: Mandatory,
            },
            Role::Prefiled => Self {
                vatsim_id: Mandatory,
                position: Forbidden,
                motion: Forbidden,
                flight_plan: Optional,
                server: Forbidden,
                protocol_version: Forbidden,
                frequency: Forbidden,
                facility_type: Forbidden,
                atc_station: Forbidden,
                logon_time: Forbidden,
            },
            // Incomplete connections: whatever live state exists is kept, but
            // a protocol version would mean the type token was lost, not absent.
            Role::Ghost => Self {
                vatsim_id: Optional,
                position: Optional,
                motion: Optional,
                flight_plan: Forbidden,
                server: Optional,
                protocol_version: Forbidden,
                frequency: Forbidden,
                facility_type: Forbidden,
                atc_station: Forbidden,
                logon_time: Optional,
            },
        }
    }
}

/// Parser for single lines of the CLIENTS or PREFILE section
#[derive(Debug, Clone)]
pub struct ClientParser {
    section: ClientSection,
}

impl ClientParser {
    /// Create a parser for the given section
    pub fn new(section: ClientSection) -> Self {
        Self { section }
    }

    /// Parser for the CLIENTS section
    pub fn online() -> Self {
        Self::new(ClientSection::Online)
    }

    /// Parser for the PREFILE section
    pub fn prefile() -> Self {
        Self::new(ClientSection::Prefile)
    }

    pub fn section(&self) -> ClientSection {
        self.section
    }

    /// Decode one line into a client record
    ///
    /// The effective client type of the returned record is left unresolved.
    pub fn parse(&self, line: &str) -> Result<ClientRecord> {
        let reader = FieldReader::split(line)?;

        let callsign = reader.token(CALLSIGN);
        get_optional_token(callsign, true, NAMES[CALLSIGN])?;

        let raw_client_type = self.parse_raw_client_type(reader.token(CLIENT_TYPE))?;
        let role = match raw_client_type {
            Some(ClientType::PilotConnected) => Role::OnlinePilot,
            Some(ClientType::AtcConnected) => Role::Atc,
            Some(ClientType::PilotPrefiled) => Role::Prefiled,
            Some(ClientType::Atis) | None => Role::Ghost,
        };
        let rules = FieldRules::for_role(role);

        let details = match role {
            Role::OnlinePilot => ClientDetails::Pilot {
                motion: parse_motion(&reader, rules.motion)?,
                flight_plan: parse_flight_plan(&reader, rules.flight_plan)?,
            },
            Role::Atc => {
                // Flight plan fields are still checked so that a controller line
                // carrying a flight plan is rejected instead of losing it.
                parse_flight_plan(&reader, rules.flight_plan)?;
                ClientDetails::Atc {
                    motion: parse_motion(&reader, rules.motion)?,
                    station: parse_atc_station(&reader, &rules)?,
                }
            }
            Role::Prefiled => {
                parse_motion(&reader, rules.motion)?;
                ClientDetails::Prefiled(parse_flight_plan(&reader, rules.flight_plan)?)
            }
            Role::Ghost => {
                parse_flight_plan(&reader, rules.flight_plan)?;
                ClientDetails::Ghost(parse_motion(&reader, rules.motion)?)
            }
        };

        if role != Role::Atc {
            parse_atc_station(&reader, &rules)?;
        }

        let mut record = ClientRecord::new(callsign, details);
        record.raw_client_type = raw_client_type;
        record.vatsim_id = reader.long(VATSIM_ID, MISSING_ID, rules.vatsim_id)?;
        record.real_name = reader.string(REAL_NAME, Optional)?;
        record.latitude = reader.coordinate(LATITUDE, rules.position)?;
        record.longitude = reader.coordinate(LONGITUDE, rules.position)?;
        record.server_id = reader.string(SERVER, rules.server)?;
        record.protocol_version =
            reader.int(PROTOCOL_REVISION, MISSING_INT, rules.protocol_version)?;
        record.controller_rating = parse_controller_rating(reader.token(CONTROLLER_RATING), role)?;
        record.logon_time = reader.timestamp(TIME_LOGON, rules.logon_time)?;

        Ok(record)
    }

    fn parse_raw_client_type(&self, token: &str) -> Result<Option<ClientType>> {
        let token = token.trim();

        match (self.section, token) {
            (ClientSection::Online, "") => Ok(None),
            (ClientSection::Online, CLIENT_TYPE_PILOT) => Ok(Some(ClientType::PilotConnected)),
            (ClientSection::Online, CLIENT_TYPE_ATC) => Ok(Some(ClientType::AtcConnected)),
            (ClientSection::Prefile, "") => Ok(Some(ClientType::PilotPrefiled)),
            (ClientSection::Online, other) => Err(Error::format(
                NAMES[CLIENT_TYPE],
                format!("unknown client type '{}'", other),
            )),
            (ClientSection::Prefile, other) => Err(Error::format(
                NAMES[CLIENT_TYPE],
                format!("prefiled flight plans must not have a client type, found '{}'", other),
            )),
        }
    }
}

fn parse_motion(reader: &FieldReader<'_>, presence: Presence) -> Result<Motion> {
    Ok(Motion {
        altitude_feet: reader.int(ALTITUDE, MISSING_ALTITUDE, presence)?,
        ground_speed: reader.int(GROUND_SPEED, MISSING_INT, presence)?,
        heading: reader.int(HEADING, MISSING_INT, presence)?,
        transponder_code: reader.int(TRANSPONDER, MISSING_INT, presence)?,
        qnh_inch_mercury: reader.double(QNH_INCH_MERCURY, presence)?,
        qnh_hectopascal: reader.int(QNH_HECTOPASCAL, MISSING_INT, presence)?,
    })
}

fn parse_flight_plan(reader: &FieldReader<'_>, presence: Presence) -> Result<FlightPlan> {
    Ok(FlightPlan {
        aircraft_type: reader.string(PLANNED_AIRCRAFT, presence)?,
        true_airspeed_cruise: reader.int(PLANNED_TAS_CRUISE, MISSING_INT, presence)?,
        departure_airport: reader.string(PLANNED_DEPARTURE_AIRPORT, presence)?,
        raw_altitude: reader.string(PLANNED_ALTITUDE, presence)?,
        destination_airport: reader.string(PLANNED_DESTINATION_AIRPORT, presence)?,
        revision: reader.int(PLANNED_REVISION, MISSING_INT, presence)?,
        flight_rules: reader.string(PLANNED_FLIGHT_TYPE, presence)?,
        raw_departure_time_planned: reader.int(PLANNED_DEPARTURE_TIME, MISSING_INT, presence)?,
        raw_departure_time_actual: reader.int(
            PLANNED_ACTUAL_DEPARTURE_TIME,
            MISSING_INT,
            presence,
        )?,
        time_enroute: reader.duration(PLANNED_HOURS_ENROUTE, PLANNED_MINUTES_ENROUTE, presence)?,
        time_fuel: reader.duration(PLANNED_HOURS_FUEL, PLANNED_MINUTES_FUEL, presence)?,
        alternate_airport: reader.string(PLANNED_ALTERNATE_AIRPORT, presence)?,
        remarks: reader.string(PLANNED_REMARKS, presence)?,
        route: reader.string(PLANNED_ROUTE, presence)?,
        departure_airport_latitude: reader
            .coordinate(PLANNED_DEPARTURE_AIRPORT_LATITUDE, presence)?,
        departure_airport_longitude: reader
            .coordinate(PLANNED_DEPARTURE_AIRPORT_LONGITUDE, presence)?,
        destination_airport_latitude: reader
            .coordinate(PLANNED_DESTINATION_AIRPORT_LATITUDE, presence)?,
        destination_airport_longitude: reader
            .coordinate(PLANNED_DESTINATION_AIRPORT_LONGITUDE, presence)?,
    })
}

fn parse_atc_station(reader: &FieldReader<'_>, rules: &FieldRules) -> Result<AtcStation> {
    Ok(AtcStation {
        served_frequency_khz: reader.frequency(FREQUENCY, rules.frequency)?,
        facility_type: reader.facility_type(FACILITY_TYPE, rules.facility_type)?,
        visual_range: reader.int(VISUAL_RANGE, MISSING_INT, rules.atc_station)?,
        controller_message_raw: reader.string(ATIS_MESSAGE, rules.atc_station)?,
        controller_message_last_updated: reader
            .timestamp(TIME_LAST_ATIS_RECEIVED, rules.atc_station)?,
    })
}

/// Decode the controller rating according to the legacy conventions
///
/// Connected pilots always count as observers; the numeric field is checked for
/// syntax only. Prefiled and ghost records carry no rating, where `0` still
/// means "no rating" rather than a rating with ID 0. Controllers must carry a
/// known rating ID.
fn parse_controller_rating(token: &str, role: Role) -> Result<Option<ControllerRating>> {
    let field_name = NAMES[CONTROLLER_RATING];

    match role {
        Role::OnlinePilot => {
            parse_int_with_default(token, MISSING_INT, false, field_name)?;
            Ok(Some(ControllerRating::Obs))
        }
        Role::Prefiled | Role::Ghost => {
            ensure_absent(token, field_name, true)?;
            Ok(None)
        }
        Role::Atc => {
            let id = parse_int_with_default(token, MISSING_INT, true, field_name)?;
            ControllerRating::from_legacy_id(id).map(Some)
        }
    }
}

/// Fail unless a token is empty, or zero for fields whose sentinel has a zero
/// equivalent in the legacy format
fn ensure_absent(token: &str, field_name: &str, accept_zero: bool) -> Result<()> {
    let trimmed = token.trim();
    if trimmed.is_empty() || (accept_zero && is_zero_equivalent(trimmed)) {
        return Ok(());
    }

    Err(Error::format(
        field_name,
        format!("field must not be set for this client type, found '{}'", trimmed),
    ))
}

fn is_zero_equivalent(token: &str) -> bool {
    token == EPOCH_ZERO_TIMESTAMP || token.parse::<f64>().is_ok_and(|value| value == 0.0)
}

/// Positional access to the fields of one client line
struct FieldReader<'l> {
    fields: Vec<&'l str>,
}

impl<'l> FieldReader<'l> {
    /// Split a line into exactly [`FIELD_COUNT`] fields
    ///
    /// The trailing colon after the last field is expected but tolerated if
    /// missing.
    fn split(line: &'l str) -> Result<Self> {
        let mut fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();

        if fields.len() == FIELD_COUNT + 1 && fields[FIELD_COUNT].is_empty() {
            fields.pop();
        }

        if fields.len() != FIELD_COUNT {
            return Err(Error::format(
                "line",
                format!(
                    "expected {} colon-separated fields, found {}",
                    FIELD_COUNT,
                    fields.len()
                ),
            ));
        }

        Ok(Self { fields })
    }

    fn token(&self, index: usize) -> &'l str {
        get_field(&self.fields, index)
    }

    fn string(&self, index: usize, presence: Presence) -> Result<String> {
        if presence == Forbidden {
            ensure_absent(self.token(index), NAMES[index], false)?;
            return Ok(String::new());
        }
        parse_string(self.token(index), presence == Mandatory, NAMES[index])
    }

    fn int(&self, index: usize, default: i32, presence: Presence) -> Result<i32> {
        if presence == Forbidden {
            ensure_absent(self.token(index), NAMES[index], true)?;
            return Ok(default);
        }
        parse_int_with_default(self.token(index), default, presence == Mandatory, NAMES[index])
    }

    fn long(&self, index: usize, default: i64, presence: Presence) -> Result<i64> {
        if presence == Forbidden {
            ensure_absent(self.token(index), NAMES[index], true)?;
            return Ok(default);
        }
        parse_long_with_default(self.token(index), default, presence == Mandatory, NAMES[index])
    }

    fn double(&self, index: usize, presence: Presence) -> Result<f64> {
        if presence == Forbidden {
            ensure_absent(self.token(index), NAMES[index], true)?;
            return Ok(f64::NAN);
        }
        parse_double(self.token(index), presence == Mandatory, NAMES[index])
    }

    fn coordinate(&self, index: usize, presence: Presence) -> Result<f64> {
        if presence == Forbidden {
            ensure_absent(self.token(index), NAMES[index], true)?;
            return Ok(f64::NAN);
        }
        parse_coordinate(self.token(index), presence == Mandatory, NAMES[index])
    }

    fn frequency(&self, index: usize, presence: Presence) -> Result<i32> {
        if presence == Forbidden {
            ensure_absent(self.token(index), NAMES[index], true)?;
            return Ok(MISSING_FREQUENCY_KHZ);
        }
        parse_frequency_khz(self.token(index), presence == Mandatory, NAMES[index])
    }

    fn facility_type(&self, index: usize, presence: Presence) -> Result<Option<FacilityType>> {
        if presence == Forbidden {
            ensure_absent(self.token(index), NAMES[index], true)?;
            return Ok(None);
        }

        let id = parse_int_with_default(
            self.token(index),
            MISSING_INT,
            presence == Mandatory,
            NAMES[index],
        )?;
        if id == MISSING_INT && self.token(index).trim().is_empty() {
            return Ok(None);
        }
        FacilityType::from_legacy_id(id).map(Some)
    }

    fn duration(
        &self,
        hours_index: usize,
        minutes_index: usize,
        presence: Presence,
    ) -> Result<Option<Duration>> {
        if presence == Forbidden {
            ensure_absent(self.token(hours_index), NAMES[hours_index], true)?;
            ensure_absent(self.token(minutes_index), NAMES[minutes_index], true)?;
            return Ok(None);
        }
        parse_duration_hours_minutes(
            self.token(hours_index),
            self.token(minutes_index),
            presence == Mandatory,
            NAMES[hours_index],
        )
    }

    fn timestamp(&self, index: usize, presence: Presence) -> Result<Option<DateTime<Utc>>> {
        if presence == Forbidden {
            ensure_absent(self.token(index), NAMES[index], true)?;
            return Ok(None);
        }
        parse_timestamp(self.token(index), presence == Mandatory, NAMES[index])
    }
}
