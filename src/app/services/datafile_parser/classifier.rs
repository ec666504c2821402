//! Effective client type classification
//!
//! The type token of a client line is not always trustworthy. Pilots connecting
//! with controller permissions show up as ATC, and incomplete connections carry
//! no type at all. After decoding, each record is run through an ordered list of
//! rules; the first rule whose predicate matches determines the effective type.
//! If no rule matches, the effective type stays unresolved and the record is
//! kept as it is.

use crate::app::models::{ClientDetails, ClientRecord, ClientType, ControllerRating};
use crate::{Error, Result};
use tracing::debug;

/// Outcome of a matching rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub effective_client_type: Option<ClientType>,

    /// Rating to assign if the record does not carry one
    pub assigned_rating: Option<ControllerRating>,
}

/// One step of the classification cascade
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub name: &'static str,
    pub applies: fn(&ClientRecord) -> bool,
    pub resolve: fn(&ClientRecord) -> Resolution,
}

/// Rules in evaluation order
pub const CLASSIFICATION_RULES: [ClassificationRule; 3] = [
    ClassificationRule {
        name: "raw_type_consistent",
        applies: is_raw_type_consistent,
        resolve: keep_raw_type,
    },
    ClassificationRule {
        name: "pilot_on_atc_placeholder_frequency",
        applies: is_pilot_on_atc_placeholder_frequency,
        resolve: resolve_connected_pilot,
    },
    ClassificationRule {
        name: "ghost_pilot",
        applies: is_ghost_pilot,
        resolve: resolve_ghost_pilot,
    },
];

/// Find the first matching rule and its resolution
pub fn classify(record: &ClientRecord) -> Option<(&'static ClassificationRule, Resolution)> {
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| (rule.applies)(record))
        .map(|rule| (rule, (rule.resolve)(record)))
}

/// Classify a record and store the effective type (and assigned rating)
///
/// Returns the name of the matching rule. If no rule resolves the record, its
/// effective type is cleared and a classification error describing the record
/// is returned; the record itself remains usable.
pub fn apply_classification(record: &mut ClientRecord) -> Result<&'static str> {
    let Some((rule, resolution)) = classify(record) else {
        record.effective_client_type = None;
        return Err(Error::classification(
            &record.callsign,
            describe_unresolved(record),
        ));
    };

    record.effective_client_type = resolution.effective_client_type;
    if record.controller_rating.is_none() {
        record.controller_rating = resolution.assigned_rating;
    }

    debug!(
        "Classified {} as {:?} by rule {}",
        record.callsign, record.effective_client_type, rule.name
    );

    if record.effective_client_type.is_none() {
        return Err(Error::classification(
            &record.callsign,
            format!("rule {} did not yield a client type", rule.name),
        ));
    }

    Ok(rule.name)
}

/// Raw type is set and nothing on the record contradicts it
pub fn is_raw_type_consistent(record: &ClientRecord) -> bool {
    record.raw_client_type.is_some() && !is_pilot_on_atc_placeholder_frequency(record)
}

/// Controller login without a real frequency or ATIS, but moving like an aircraft
///
/// Observer-rated pilots and supervisors flying with controller permissions
/// appear this way.
pub fn is_pilot_on_atc_placeholder_frequency(record: &ClientRecord) -> bool {
    if record.raw_client_type != Some(ClientType::AtcConnected) {
        return false;
    }

    match &record.details {
        ClientDetails::Atc { motion, station } => {
            station.is_on_placeholder_frequency()
                && (motion.heading > 0 || motion.ground_speed > 0)
                && !station.has_controller_message()
        }
        _ => false,
    }
}

/// No type and no protocol version, but position, logon time and some live state
pub fn is_ghost_pilot(record: &ClientRecord) -> bool {
    if record.raw_client_type.is_some() || record.protocol_version >= 0 {
        return false;
    }

    let Some(motion) = record.motion() else {
        return false;
    };

    record.has_position()
        && record.logon_time.is_some()
        && (motion.has_heading() || motion.has_qnh() || motion.has_transponder_code())
}

fn keep_raw_type(record: &ClientRecord) -> Resolution {
    Resolution {
        effective_client_type: record.raw_client_type,
        assigned_rating: None,
    }
}

fn resolve_connected_pilot(_record: &ClientRecord) -> Resolution {
    Resolution {
        effective_client_type: Some(ClientType::PilotConnected),
        assigned_rating: None,
    }
}

// Pilots implicitly carry an observer rating; reconstructed ones get it too.
fn resolve_ghost_pilot(_record: &ClientRecord) -> Resolution {
    Resolution {
        effective_client_type: Some(ClientType::PilotConnected),
        assigned_rating: Some(ControllerRating::Obs),
    }
}

fn describe_unresolved(record: &ClientRecord) -> String {
    match record.raw_client_type {
        Some(raw) => format!("raw type {} is contradicted by other fields", raw),
        None if record.protocol_version >= 0 => {
            "client type missing although a protocol version is present".to_string()
        }
        None => "client type missing and remaining fields do not identify a pilot".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{AtcStation, FlightPlan, Motion};
    use chrono::{TimeZone, Utc};

    fn atc_record(frequency_khz: i32, heading: i32, ground_speed: i32, message: &str) -> ClientRecord {
        let mut record = ClientRecord::new(
            "EDDF_OBS",
            ClientDetails::Atc {
                motion: Motion {
                    heading,
                    ground_speed,
                    ..Motion::default()
                },
                station: AtcStation {
                    served_frequency_khz: frequency_khz,
                    controller_message_raw: message.to_string(),
                    ..AtcStation::default()
                },
            },
        );
        record.raw_client_type = Some(ClientType::AtcConnected);
        record.controller_rating = Some(ControllerRating::Sup);
        record
    }

    fn ghost_record() -> ClientRecord {
        let mut record = ClientRecord::new(
            "GHOST1",
            ClientDetails::Ghost(Motion {
                heading: 270,
                transponder_code: 2000,
                qnh_inch_mercury: 29.92,
                qnh_hectopascal: 1013,
                ..Motion::default()
            }),
        );
        record.latitude = 50.0;
        record.longitude = 8.5;
        record.logon_time = Some(Utc.with_ymd_and_hms(2018, 1, 1, 12, 0, 0).unwrap());
        record
    }

    #[test]
    fn test_rules_evaluated_in_fixed_order() {
        let names: Vec<_> = CLASSIFICATION_RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(
            names,
            vec!["raw_type_consistent", "pilot_on_atc_placeholder_frequency", "ghost_pilot"]
        );
    }

    #[test]
    fn test_consistent_raw_type_is_kept() {
        let mut record = atc_record(118_500, 0, 0, "");
        let rule = apply_classification(&mut record).unwrap();

        assert_eq!(rule, "raw_type_consistent");
        assert_eq!(record.effective_client_type, Some(ClientType::AtcConnected));
    }

    #[test]
    fn test_prefile_keeps_raw_type() {
        let mut record = ClientRecord::new("DLH1", ClientDetails::Prefiled(FlightPlan::default()));
        record.raw_client_type = Some(ClientType::PilotPrefiled);

        apply_classification(&mut record).unwrap();
        assert_eq!(record.effective_client_type, Some(ClientType::PilotPrefiled));
        assert_eq!(record.controller_rating, None);
    }

    #[test]
    fn test_atc_on_placeholder_frequency_moving_is_pilot() {
        let mut record = atc_record(199_998, 0, 1, "");
        assert!(is_pilot_on_atc_placeholder_frequency(&record));
        assert!(!is_raw_type_consistent(&record));

        let rule = apply_classification(&mut record).unwrap();
        assert_eq!(rule, "pilot_on_atc_placeholder_frequency");
        assert_eq!(record.effective_client_type, Some(ClientType::PilotConnected));
        assert_eq!(record.raw_client_type, Some(ClientType::AtcConnected));
        assert_eq!(record.controller_rating, Some(ControllerRating::Sup));
    }

    #[test]
    fn test_atc_on_placeholder_frequency_with_heading_is_pilot() {
        let record = atc_record(199_000, 90, 0, "");
        assert!(is_pilot_on_atc_placeholder_frequency(&record));
    }

    #[test]
    fn test_atc_on_placeholder_frequency_stationary_stays_atc() {
        let mut record = atc_record(199_998, 0, 0, "");
        apply_classification(&mut record).unwrap();
        assert_eq!(record.effective_client_type, Some(ClientType::AtcConnected));
    }

    #[test]
    fn test_atc_on_placeholder_frequency_with_message_stays_atc() {
        let record = atc_record(199_998, 10, 10, "Observing only");
        assert!(!is_pilot_on_atc_placeholder_frequency(&record));
        assert!(is_raw_type_consistent(&record));
    }

    #[test]
    fn test_atc_on_real_frequency_moving_stays_atc() {
        let record = atc_record(121_725, 10, 10, "");
        assert!(!is_pilot_on_atc_placeholder_frequency(&record));
    }

    #[test]
    fn test_ghost_with_collateral_fields_becomes_pilot() {
        let mut record = ghost_record();
        assert!(is_ghost_pilot(&record));

        let rule = apply_classification(&mut record).unwrap();
        assert_eq!(rule, "ghost_pilot");
        assert_eq!(record.effective_client_type, Some(ClientType::PilotConnected));
        assert_eq!(record.controller_rating, Some(ControllerRating::Obs));
        assert_eq!(record.vatsim_id, -1);
        assert!(record.server_id.is_empty());
    }

    #[test]
    fn test_ghost_without_position_is_unresolved() {
        let mut record = ghost_record();
        record.latitude = f64::NAN;

        let err = apply_classification(&mut record).unwrap_err();
        assert!(matches!(err, Error::Classification { .. }));
        assert_eq!(record.effective_client_type, None);
        assert_eq!(record.controller_rating, None);
    }

    #[test]
    fn test_ghost_without_logon_time_is_unresolved() {
        let mut record = ghost_record();
        record.logon_time = None;
        assert!(!is_ghost_pilot(&record));
        assert!(classify(&record).is_none());
    }

    #[test]
    fn test_ghost_without_live_state_is_unresolved() {
        let mut record = ghost_record();
        record.details = ClientDetails::Ghost(Motion::default());
        assert!(!is_ghost_pilot(&record));
    }

    #[test]
    fn test_record_with_protocol_version_is_not_ghost_pilot() {
        let mut record = ghost_record();
        record.protocol_version = 100;
        assert!(!is_ghost_pilot(&record));

        let err = apply_classification(&mut record).unwrap_err();
        assert!(err.to_string().contains("protocol version"));
    }
}
