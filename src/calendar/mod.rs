//! Conversion of extracted events into Google Calendar event bodies
//!
//! Only the mapping lives here; credentials and submission belong to the caller.

use chrono_tz::Tz;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::event::{Event, EventRecord};

/// Zone stamped on emitted events unless configured otherwise
pub const DEFAULT_TIME_ZONE: &str = "America/Toronto";

/// Custom error type for calendar conversion
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Missing or invalid event field: {0}")]
    MissingField(String),
    #[error("Unknown time zone: {0}")]
    InvalidTimeZone(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleEvent {
    pub summary: String,
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

impl GoogleEvent {
    pub fn from_event(event: &Event, time_zone: &str) -> Result<Self, CalendarError> {
        from_record(&EventRecord::from(event), time_zone)
    }
}

fn validate_time_zone(time_zone: &str) -> Result<Tz, CalendarError> {
    Tz::from_str(time_zone).map_err(|_| CalendarError::InvalidTimeZone(time_zone.to_string()))
}

fn format_date_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:00",
        year, month, day, hour, minute
    )
}

fn from_record(record: &EventRecord, time_zone: &str) -> Result<GoogleEvent, CalendarError> {
    let zone = validate_time_zone(time_zone)?.name().to_string();

    Ok(GoogleEvent {
        summary: record.activity.clone(),
        location: record.location.clone(),
        start: EventDateTime {
            date_time: format_date_time(
                record.start_year,
                record.start_month,
                record.start_day,
                record.start_hour,
                record.start_minute,
            ),
            time_zone: zone.clone(),
        },
        end: EventDateTime {
            date_time: format_date_time(
                record.end_year,
                record.end_month,
                record.end_day,
                record.end_hour,
                record.end_minute,
            ),
            time_zone: zone,
        },
    })
}

fn integer_field<T: TryFrom<i64>>(dict: &Value, key: &str) -> Result<T, CalendarError> {
    dict.get(key)
        .and_then(Value::as_i64)
        .and_then(|value| T::try_from(value).ok())
        .ok_or_else(|| CalendarError::MissingField(key.to_string()))
}

/// Build a calendar event body from the key/value form of an [`Event`]
///
/// `location` may be absent or null; every other field is required.
pub fn json_to_google_event(dict: &Value, time_zone: &str) -> Result<GoogleEvent, CalendarError> {
    let activity = dict
        .get("activity")
        .and_then(Value::as_str)
        .ok_or_else(|| CalendarError::MissingField("activity".to_string()))?;
    let location = dict
        .get("location")
        .and_then(Value::as_str)
        .map(str::to_string);

    let record = EventRecord {
        activity: activity.to_string(),
        location,
        start_year: integer_field(dict, "start_year")?,
        start_month: integer_field(dict, "start_month")?,
        start_day: integer_field(dict, "start_day")?,
        start_hour: integer_field(dict, "start_hour")?,
        start_minute: integer_field(dict, "start_minute")?,
        end_year: integer_field(dict, "end_year")?,
        end_month: integer_field(dict, "end_month")?,
        end_day: integer_field(dict, "end_day")?,
        end_hour: integer_field(dict, "end_hour")?,
        end_minute: integer_field(dict, "end_minute")?,
    };

    let event = from_record(&record, time_zone)?;
    debug!(
        "Converted '{}' to calendar event starting {}",
        event.summary, event.start.date_time
    );
    Ok(event)
}
