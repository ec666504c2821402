//! Field parsing utilities for data file records
//!
//! This module provides helper functions for converting single tokens of a
//! record into typed values. Each decoder knows the sentinel used for an absent
//! value and whether an empty token is acceptable for the current role.

use crate::constants::{EPOCH_ZERO_TIMESTAMP, MISSING_FREQUENCY_KHZ};
use crate::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Get a field by position, treating positions beyond the end of the line as empty
pub fn get_field<'a>(fields: &[&'a str], index: usize) -> &'a str {
    fields.get(index).copied().unwrap_or("")
}

/// Get the trimmed token if it is not empty
///
/// Fails if the token is empty although the field is mandatory.
pub fn get_optional_token<'a>(token: &'a str, mandatory: bool, field_name: &str) -> Result<Option<&'a str>> {
    let trimmed = token.trim();
    if !trimmed.is_empty() {
        return Ok(Some(trimmed));
    }

    if mandatory {
        return Err(Error::format(field_name, "mandatory field is empty"));
    }

    Ok(None)
}

/// Parse a string field; absent strings stay empty
pub fn parse_string(token: &str, mandatory: bool, field_name: &str) -> Result<String> {
    get_optional_token(token, mandatory, field_name)?;
    Ok(token.to_string())
}

/// Parse a signed base-10 integer, returning `default` for an empty token
pub fn parse_int_with_default(
    token: &str,
    default: i32,
    mandatory: bool,
    field_name: &str,
) -> Result<i32> {
    match get_optional_token(token, mandatory, field_name)? {
        None => Ok(default),
        Some(value) => value.parse::<i32>().map_err(|e| {
            Error::format(
                field_name,
                format!("invalid integer format '{}' ({})", value, e),
            )
        }),
    }
}

/// Parse a signed base-10 integer that may exceed 32 bits (user IDs)
pub fn parse_long_with_default(
    token: &str,
    default: i64,
    mandatory: bool,
    field_name: &str,
) -> Result<i64> {
    match get_optional_token(token, mandatory, field_name)? {
        None => Ok(default),
        Some(value) => value.parse::<i64>().map_err(|e| {
            Error::format(
                field_name,
                format!("invalid integer format '{}' ({})", value, e),
            )
        }),
    }
}

/// Parse a floating point value, returning `NaN` for an empty token
///
/// Scientific notation is accepted. Values are not range checked.
pub fn parse_double(token: &str, mandatory: bool, field_name: &str) -> Result<f64> {
    match get_optional_token(token, mandatory, field_name)? {
        None => Ok(f64::NAN),
        Some(value) => value.parse::<f64>().map_err(|e| {
            Error::format(
                field_name,
                format!("invalid floating point format '{}' ({})", value, e),
            )
        }),
    }
}

/// Parse a latitude or longitude in degrees
///
/// Out-of-range values are passed through unchanged; judging them is left to
/// the caller.
pub fn parse_coordinate(token: &str, mandatory: bool, field_name: &str) -> Result<f64> {
    parse_double(token, mandatory, field_name)
}

/// Parse a frequency given in MHz into kHz, rounded to the nearest kilohertz
///
/// Returns a negative value for an empty token. Zero, negative and
/// non-finite frequencies are invalid.
pub fn parse_frequency_khz(token: &str, mandatory: bool, field_name: &str) -> Result<i32> {
    let Some(value) = get_optional_token(token, mandatory, field_name)? else {
        return Ok(MISSING_FREQUENCY_KHZ);
    };

    let megahertz = value.parse::<f64>().map_err(|e| {
        Error::format(
            field_name,
            format!("invalid frequency format '{}' ({})", value, e),
        )
    })?;

    let kilohertz = (megahertz * 1000.0).round();
    if !kilohertz.is_finite() || kilohertz <= 0.0 || kilohertz > f64::from(i32::MAX) {
        return Err(Error::format(
            field_name,
            format!("frequency '{}' is out of range", value),
        ));
    }

    Ok(kilohertz as i32)
}

/// Parse a duration given as separate hour and minute tokens
///
/// Both tokens empty means absent; exactly one empty token is inconsistent.
/// Minutes may exceed 59. If one part is negative and the other positive, the
/// positive part is negated so that garbage input cannot produce a positive
/// duration.
pub fn parse_duration_hours_minutes(
    hours_token: &str,
    minutes_token: &str,
    mandatory: bool,
    field_name: &str,
) -> Result<Option<Duration>> {
    let hours_token = hours_token.trim();
    let minutes_token = minutes_token.trim();

    match (hours_token.is_empty(), minutes_token.is_empty()) {
        (true, true) => {
            if mandatory {
                return Err(Error::format(field_name, "mandatory duration is empty"));
            }
            return Ok(None);
        }
        (true, false) | (false, true) => {
            return Err(Error::format(
                field_name,
                format!(
                    "inconsistent duration: hours '{}', minutes '{}'",
                    hours_token, minutes_token
                ),
            ));
        }
        (false, false) => {}
    }

    let mut hours = i64::from(parse_int_with_default(hours_token, 0, true, field_name)?);
    let mut minutes = i64::from(parse_int_with_default(minutes_token, 0, true, field_name)?);

    if hours < 0 && minutes > 0 {
        minutes = -minutes;
    } else if minutes < 0 && hours > 0 {
        hours = -hours;
    }

    Ok(Some(Duration::minutes(hours * 60 + minutes)))
}

/// Parse a timestamp in compact `yyyyMMddHHmmss` or ISO-8601 form
///
/// Timestamps without zone information are taken as UTC. The epoch-zero
/// literal `00010101000000` means absent.
pub fn parse_timestamp(
    token: &str,
    mandatory: bool,
    field_name: &str,
) -> Result<Option<DateTime<Utc>>> {
    let Some(value) = get_optional_token(token, mandatory, field_name)? else {
        return Ok(None);
    };

    if value == EPOCH_ZERO_TIMESTAMP {
        if mandatory {
            return Err(Error::format(field_name, "mandatory timestamp is epoch zero"));
        }
        return Ok(None);
    }

    let parsed = if is_compact_timestamp(value) {
        parse_compact_timestamp(value)
    } else if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        Some(dt.with_timezone(&Utc))
    } else if let Ok(naive_dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Some(DateTime::<Utc>::from_naive_utc_and_offset(naive_dt, Utc))
    } else {
        None
    };

    parsed.map(Some).ok_or_else(|| {
        Error::format(
            field_name,
            format!(
                "invalid timestamp format '{}' (expected 'yyyyMMddHHmmss' or ISO-8601)",
                value
            ),
        )
    })
}

/// Parse a connection flag which must be exactly `0` or `1`
pub fn parse_boolean_flag(token: &str, field_name: &str) -> Result<bool> {
    match token {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(Error::format(
            field_name,
            format!("expected '0' or '1', found '{}'", other),
        )),
    }
}

fn is_compact_timestamp(value: &str) -> bool {
    value.len() == 14 && value.bytes().all(|b| b.is_ascii_digit())
}

fn parse_compact_timestamp(value: &str) -> Option<DateTime<Utc>> {
    // Digits only, so slicing on byte offsets is safe
    let number = |range: std::ops::Range<usize>| value[range].parse::<u32>().ok();

    let year = i32::try_from(number(0..4)?).ok()?;
    let naive_dt = NaiveDate::from_ymd_opt(year, number(4..6)?, number(6..8)?)?.and_hms_opt(
        number(8..10)?,
        number(10..12)?,
        number(12..14)?,
    )?;

    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive_dt, Utc))
}
