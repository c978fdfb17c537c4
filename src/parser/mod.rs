//! VoiceCal schedule parser
//!
//! Rule-based extraction of calendar events from one free-text sentence. Each stage is a
//! plain function over the lowercased sentence; no state survives between calls.

pub mod activity;
pub mod date_resolver;
pub mod location;
pub mod materializer;
pub mod time_parser;
pub mod time_period;
pub mod time_scanner;
pub mod vocabulary;

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use log::debug;

use crate::event::{Event, EventRecord};

pub use date_resolver::{resolve_date, DateInfo, DateSource};
pub use materializer::{materialize_events, Extraction};
pub use time_parser::parse_time_string;
pub use time_period::{detect_time_period, Meridiem};
pub use time_scanner::{extract_all_time_mentions, MentionType, PatternTag, TimeMention};

/// Zone "now" is taken in when no reference time is given
pub const DEFAULT_TZ: Tz = chrono_tz::America::Toronto;

/// Extracts events relative to a fixed reference time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleParser {
    reference: NaiveDateTime,
}

impl ScheduleParser {
    pub fn new(reference: NaiveDateTime) -> Self {
        Self { reference }
    }

    /// Parser anchored at the current wall-clock time in `time_zone`
    pub fn now(time_zone: Tz) -> Self {
        Self::new(Utc::now().with_timezone(&time_zone).naive_local())
    }

    /// Run the full pipeline over one sentence
    pub fn parse(&self, sentence: &str) -> Vec<Event> {
        let sentence_lower = sentence.trim().to_lowercase();
        debug!("Parsing '{}' against {}", sentence_lower, self.reference);

        let date_info = resolve_date(&sentence_lower, self.reference);
        let time_mentions = extract_all_time_mentions(&sentence_lower);
        let locations = location::extract_locations(&sentence_lower, &time_mentions);
        let activity = activity::extract_clean_activity(
            &sentence_lower,
            &date_info,
            &locations,
            &time_mentions,
        );

        let events = materialize_events(&Extraction {
            sentence_lower: &sentence_lower,
            reference: self.reference,
            date_info: &date_info,
            activity: &activity,
            locations: &locations,
            time_mentions: &time_mentions,
        });
        debug!("Extracted {} event(s)", events.len());
        events
    }
}

/// Extract events from `sentence`; `None` means now in [`DEFAULT_TZ`]
pub fn parse_schedule_to_events(sentence: &str, reference: Option<NaiveDateTime>) -> Vec<Event> {
    let parser = match reference {
        Some(reference) => ScheduleParser::new(reference),
        None => ScheduleParser::now(DEFAULT_TZ),
    };
    parser.parse(sentence)
}

/// Same as [`parse_schedule_to_events`], flattened to key/value records
pub fn get_all_events_as_dicts(
    sentence: &str,
    reference: Option<NaiveDateTime>,
) -> Vec<EventRecord> {
    parse_schedule_to_events(sentence, reference)
        .iter()
        .map(EventRecord::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let parser = ScheduleParser::new(at(2024, 1, 1, 8, 0));
        assert_eq!(
            parser.parse("MEETING TOMORROW AT 3PM"),
            parser.parse("meeting tomorrow at 3pm")
        );
    }

    #[test]
    fn test_dicts_match_events() {
        let reference = Some(at(2024, 1, 1, 8, 0));
        let records = get_all_events_as_dicts("Dentist on 24 November at 10.30 am", reference);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].activity, "dentist");
        assert_eq!((records[0].start_month, records[0].start_day), (11, 24));
        assert_eq!((records[0].start_hour, records[0].start_minute), (10, 30));
        assert_eq!((records[0].end_hour, records[0].end_minute), (11, 30));
    }

    #[test]
    fn test_default_reference_is_now() {
        let events = parse_schedule_to_events("water the plants", None);
        assert_eq!(events.len(), 1);
        assert_eq!((events[0].start_hour, events[0].end_hour), (9, 10));
    }
}
