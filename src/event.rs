//! Event types produced by the schedule parser
//!
//! An [`Event`] is the only output of the extraction pipeline. [`EventRecord`] is its flat
//! key/value form, which is what downstream adapters and the API server hand around.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar event extracted from a sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub activity: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub start_hour: u32,
    pub start_minute: u32,
    pub end_date: NaiveDate,
    pub end_hour: u32,
    pub end_minute: u32,
}

/// Flat record form of an [`Event`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub activity: String,
    pub location: Option<String>,
    pub start_year: i32,
    pub start_month: u32,
    pub start_day: u32,
    pub start_hour: u32,
    pub start_minute: u32,
    pub end_year: i32,
    pub end_month: u32,
    pub end_day: u32,
    pub end_hour: u32,
    pub end_minute: u32,
}

impl Event {
    /// Build an event that starts and ends on the same day
    pub fn on_day(
        activity: &str,
        date: NaiveDate,
        (start_hour, start_minute): (u32, u32),
        (end_hour, end_minute): (u32, u32),
    ) -> Self {
        Self {
            activity: activity.to_string(),
            location: None,
            start_date: date,
            start_hour,
            start_minute,
            end_date: date,
            end_hour,
            end_minute,
        }
    }

    /// Build an event from two absolute instants
    pub fn between(activity: &str, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            activity: activity.to_string(),
            location: None,
            start_date: start.date(),
            start_hour: start.hour(),
            start_minute: start.minute(),
            end_date: end.date(),
            end_hour: end.hour(),
            end_minute: end.minute(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.activity.trim().is_empty()
    }

    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            activity: self.activity.clone(),
            location: self.location.clone(),
            start_year: self.start_date.year(),
            start_month: self.start_date.month(),
            start_day: self.start_date.day(),
            start_hour: self.start_hour,
            start_minute: self.start_minute,
            end_year: self.end_date.year(),
            end_month: self.end_date.month(),
            end_day: self.end_date.day(),
            end_hour: self.end_hour,
            end_minute: self.end_minute,
        }
    }

    /// Start rendered as e.g. `3:30 PM 2024-01-02`
    pub fn start_time_str(&self) -> String {
        format_twelve_hour(self.start_hour, self.start_minute, self.start_date)
    }

    /// End rendered as e.g. `4:30 PM 2024-01-02`
    pub fn end_time_str(&self) -> String {
        format_twelve_hour(self.end_hour, self.end_minute, self.end_date)
    }
}

fn format_twelve_hour(hour: u32, minute: u32, date: NaiveDate) -> String {
    let (display_hour, meridiem) = match hour {
        0 => (12, "AM"),
        12 => (12, "PM"),
        h if h > 12 => (h - 12, "PM"),
        h => (h, "AM"),
    };

    let mut time_str = display_hour.to_string();
    if minute > 0 {
        time_str.push_str(&format!(":{:02}", minute));
    }
    format!("{} {} {}", time_str, meridiem, date.format("%Y-%m-%d"))
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.activity.is_empty() {
            parts.push(format!("Activity: {}", self.activity));
        }
        if let Some(location) = &self.location {
            parts.push(format!("Location: {}", location));
        }
        parts.push(format!("Start: {}", self.start_time_str()));
        parts.push(format!("End: {}", self.end_time_str()));

        write!(f, "Event({})", parts.join(", "))
    }
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        event.to_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_display_twelve_hour() {
        let mut event = Event::on_day("meeting", day(2024, 1, 2), (15, 0), (16, 30));
        event.location = Some("office".to_string());
        assert_eq!(
            event.to_string(),
            "Event(Activity: meeting, Location: office, Start: 3 PM 2024-01-02, End: 4:30 PM 2024-01-02)"
        );
    }

    #[test]
    fn test_midnight_and_noon_rendering() {
        let event = Event::on_day("party", day(2024, 5, 1), (0, 5), (12, 0));
        assert_eq!(event.start_time_str(), "12:05 AM 2024-05-01");
        assert_eq!(event.end_time_str(), "12 PM 2024-05-01");
    }

    #[test]
    fn test_record_fields() {
        let start = day(2024, 12, 31).and_hms_opt(23, 30, 0).unwrap();
        let end = day(2025, 1, 1).and_hms_opt(0, 30, 0).unwrap();
        let record = Event::between("call mom", start, end).to_record();

        assert_eq!(record.start_year, 2024);
        assert_eq!(record.end_year, 2025);
        assert_eq!(record.end_month, 1);
        assert_eq!((record.end_hour, record.end_minute), (0, 30));
        assert_eq!(record.location, None);
    }

    #[test]
    fn test_is_valid() {
        let mut event = Event::on_day("lunch", day(2024, 1, 1), (12, 0), (13, 0));
        assert!(event.is_valid());
        event.activity = "   ".to_string();
        assert!(!event.is_valid());
    }
}
