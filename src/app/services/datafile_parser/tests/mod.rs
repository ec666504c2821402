//! Test utilities for data file parser testing
//!
//! This module provides builders for client lines and complete documents
//! used across the different test modules.

use crate::constants::client_fields::*;

mod general_parser_tests;

/// Builder for a single CLIENTS or PREFILE line
#[derive(Debug, Clone)]
pub struct ClientLine {
    fields: Vec<String>,
}

impl ClientLine {
    /// Line with all fields empty
    pub fn empty() -> Self {
        Self {
            fields: vec![String::new(); FIELD_COUNT],
        }
    }

    /// Replace the value at a field position
    pub fn set(mut self, index: usize, value: &str) -> Self {
        self.fields[index] = value.to_string();
        self
    }

    /// Join all fields, including the trailing colon
    pub fn build(&self) -> String {
        let mut line = self.fields.join(":");
        line.push(':');
        line
    }

    /// Connected pilot with a complete flight plan
    pub fn online_pilot() -> Self {
        Self::empty()
            .set(CALLSIGN, "DLH123")
            .set(VATSIM_ID, "1234567")
            .set(REAL_NAME, "Jane Doe EDDF")
            .set(CLIENT_TYPE, "PILOT")
            .set(LATITUDE, "50.03")
            .set(LONGITUDE, "8.57")
            .set(ALTITUDE, "35000")
            .set(GROUND_SPEED, "450")
            .set(PLANNED_AIRCRAFT, "B738")
            .set(PLANNED_TAS_CRUISE, "460")
            .set(PLANNED_DEPARTURE_AIRPORT, "EDDF")
            .set(PLANNED_ALTITUDE, "FL350")
            .set(PLANNED_DESTINATION_AIRPORT, "EDDM")
            .set(SERVER, "GERMANY")
            .set(PROTOCOL_REVISION, "100")
            .set(CONTROLLER_RATING, "1")
            .set(TRANSPONDER, "2000")
            .set(PLANNED_REVISION, "1")
            .set(PLANNED_FLIGHT_TYPE, "I")
            .set(PLANNED_DEPARTURE_TIME, "1200")
            .set(PLANNED_ACTUAL_DEPARTURE_TIME, "1210")
            .set(PLANNED_HOURS_ENROUTE, "1")
            .set(PLANNED_MINUTES_ENROUTE, "5")
            .set(PLANNED_HOURS_FUEL, "3")
            .set(PLANNED_MINUTES_FUEL, "0")
            .set(PLANNED_ALTERNATE_AIRPORT, "EDDN")
            .set(PLANNED_REMARKS, "/v/")
            .set(PLANNED_ROUTE, "ANEKI Y163 NATOR")
            .set(PLANNED_DEPARTURE_AIRPORT_LATITUDE, "0")
            .set(PLANNED_DEPARTURE_AIRPORT_LONGITUDE, "0")
            .set(PLANNED_DESTINATION_AIRPORT_LATITUDE, "0")
            .set(PLANNED_DESTINATION_AIRPORT_LONGITUDE, "0")
            .set(TIME_LOGON, "20180126213000")
            .set(HEADING, "123")
            .set(QNH_INCH_MERCURY, "29.92")
            .set(QNH_HECTOPASCAL, "1013")
    }

    /// Connected controller with ATIS
    pub fn atc() -> Self {
        Self::empty()
            .set(CALLSIGN, "EDDF_TWR")
            .set(VATSIM_ID, "7654321")
            .set(REAL_NAME, "John Smith")
            .set(CLIENT_TYPE, "ATC")
            .set(FREQUENCY, "119.900")
            .set(LATITUDE, "50.03")
            .set(LONGITUDE, "8.57")
            .set(ALTITUDE, "0")
            .set(GROUND_SPEED, "0")
            .set(PLANNED_TAS_CRUISE, "0")
            .set(SERVER, "GERMANY")
            .set(PROTOCOL_REVISION, "100")
            .set(CONTROLLER_RATING, "5")
            .set(TRANSPONDER, "0")
            .set(FACILITY_TYPE, "4")
            .set(VISUAL_RANGE, "50")
            .set(PLANNED_REVISION, "0")
            .set(PLANNED_DEPARTURE_TIME, "0")
            .set(PLANNED_ACTUAL_DEPARTURE_TIME, "0")
            .set(PLANNED_HOURS_ENROUTE, "0")
            .set(PLANNED_MINUTES_ENROUTE, "0")
            .set(PLANNED_HOURS_FUEL, "0")
            .set(PLANNED_MINUTES_FUEL, "0")
            .set(ATIS_MESSAGE, "EDDF_TWR^§Frankfurt Tower")
            .set(TIME_LAST_ATIS_RECEIVED, "20180126213500")
            .set(TIME_LOGON, "20180126200000")
            .set(HEADING, "0")
            .set(QNH_INCH_MERCURY, "0")
            .set(QNH_HECTOPASCAL, "0")
    }

    /// Prefiled flight plan
    pub fn prefile() -> Self {
        Self::empty()
            .set(CALLSIGN, "BAW456")
            .set(VATSIM_ID, "1111111")
            .set(REAL_NAME, "Alex Roe")
            .set(PLANNED_AIRCRAFT, "A320")
            .set(PLANNED_TAS_CRUISE, "430")
            .set(PLANNED_DEPARTURE_AIRPORT, "EGLL")
            .set(PLANNED_ALTITUDE, "36000")
            .set(PLANNED_DESTINATION_AIRPORT, "LFPG")
            .set(PLANNED_REVISION, "2")
            .set(PLANNED_FLIGHT_TYPE, "I")
            .set(PLANNED_DEPARTURE_TIME, "1830")
            .set(PLANNED_ACTUAL_DEPARTURE_TIME, "0")
            .set(PLANNED_HOURS_ENROUTE, "0")
            .set(PLANNED_MINUTES_ENROUTE, "55")
            .set(PLANNED_HOURS_FUEL, "2")
            .set(PLANNED_MINUTES_FUEL, "30")
            .set(PLANNED_ALTERNATE_AIRPORT, "LFPO")
            .set(PLANNED_REMARKS, "/t/")
            .set(PLANNED_ROUTE, "MID UL612 BOGNA")
    }

    /// Connection without client type and protocol version
    pub fn ghost() -> Self {
        Self::empty()
            .set(CALLSIGN, "GHOST1")
            .set(LATITUDE, "51.47")
            .set(LONGITUDE, "-0.46")
            .set(ALTITUDE, "0")
            .set(GROUND_SPEED, "0")
            .set(TRANSPONDER, "1200")
            .set(TIME_LOGON, "20180126213000")
            .set(HEADING, "270")
            .set(QNH_INCH_MERCURY, "29.92")
            .set(QNH_HECTOPASCAL, "1013")
    }
}

/// Complete document with every section
pub fn create_test_document() -> String {
    format!(
        "; Created at 26/01/2018 21:40:00 UTC\n\
         ;\n\
         !GENERAL:\n\
         VERSION = 9\n\
         RELOAD = 2\n\
         UPDATE = 20180126214000\n\
         ATIS ALLOW MIN = 5\n\
         CONNECTED CLIENTS = 3\n\
         UNIQUE USERS = 3\n\
         ;\n\
         !VOICE SERVERS:\n\
         voice.example.org:Frankfurt:Europe-C:1:R:\n\
         ;\n\
         !CLIENTS:\n\
         {}\n\
         {}\n\
         ;\n\
         !SERVERS:\n\
         GERMANY:88.198.19.202:Europe:Germany Server:1:\n\
         USA-E:1.2.3.4:New York:USA East:0:\n\
         ;\n\
         !PREFILE:\n\
         {}\n",
        ClientLine::online_pilot().build(),
        ClientLine::atc().build(),
        ClientLine::prefile().build(),
    )
}
