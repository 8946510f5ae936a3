//! Parsing of user-entered dates and times.
//!
//! Observation and death dates arrive as free text (`2024-03-01 14:30`, `1 March 2024`, ...).
//! They are parsed into naive local values and re-rendered in the fixed formats the REST API
//! expects. Missing time components default to midnight.

use crate::constants::{DEATH_DATE_FORMAT, OBS_DATETIME_FORMAT};
use crate::{OmrsError, OmrsResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// Parse a human date/time string.
///
/// RFC 3339 input keeps its wall-clock time and drops the offset.
///
/// # Errors
///
/// Returns [`OmrsError::InvalidInput`] if no supported format matches.
pub fn parse_datetime(input: &str) -> OmrsResult<NaiveDateTime> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| parse_date_only(input).and_then(|d| d.and_hms_opt(0, 0, 0)))
        .ok_or_else(|| {
            OmrsError::InvalidInput(format!(
                "unrecognised date/time '{}' (use YYYY-MM-DD[ HH:MM[:SS]])",
                input
            ))
        })
}

/// Parse a human date string. A time component, if given, is accepted and dropped.
///
/// # Errors
///
/// Returns [`OmrsError::InvalidInput`] if no supported format matches.
pub fn parse_date(input: &str) -> OmrsResult<NaiveDate> {
    parse_datetime(input).map(|dt| dt.date())
}

fn parse_date_only(input: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

/// Render an observation timestamp as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_obs_datetime(dt: &NaiveDateTime) -> String {
    dt.format(OBS_DATETIME_FORMAT).to_string()
}

/// Render a death date as `YYYY-MM-DD`.
pub fn format_death_date(date: &NaiveDate) -> String {
    date.format(DEATH_DATE_FORMAT).to_string()
}
