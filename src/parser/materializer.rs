//! Event materialization
//!
//! Three policies, tried in order: a clock offset (`in 2 hours`) makes one event relative to
//! the reference time, a sentence without time mentions makes one default-hours event, and
//! otherwise every mention makes its own event on the resolved date.

use chrono::{Duration, NaiveDateTime};
use log::{debug, warn};

use super::date_resolver::DateInfo;
use super::time_parser::parse_time_string;
use super::time_period::detect_time_period;
use super::time_scanner::{MentionType, TimeMention};
use super::vocabulary::{TimeUnit, RELATIVE_TIME_PATTERNS};
use crate::event::Event;

/// Start and end used when a sentence names no time at all
pub const DEFAULT_START: (u32, u32) = (9, 0);
pub const DEFAULT_END: (u32, u32) = (10, 0);

/// Everything the earlier stages extracted from one sentence
pub struct Extraction<'a> {
    pub sentence_lower: &'a str,
    pub reference: NaiveDateTime,
    pub date_info: &'a DateInfo,
    pub activity: &'a str,
    pub locations: &'a [String],
    pub time_mentions: &'a [TimeMention],
}

/// Turn the extracted pieces into events
pub fn materialize_events(extraction: &Extraction<'_>) -> Vec<Event> {
    if extraction.activity.trim().is_empty() {
        debug!("No activity, nothing to materialize");
        return Vec::new();
    }

    if let Some(event) = relative_time_event(extraction) {
        debug!("Relative time offset produced {}", event);
        return vec![event];
    }

    if extraction.time_mentions.is_empty() {
        let mut event = Event::on_day(
            extraction.activity,
            extraction.date_info.date,
            DEFAULT_START,
            DEFAULT_END,
        );
        event.location = extraction.locations.first().cloned();
        debug!("No time mentions, using default hours: {}", event);
        return vec![event];
    }

    extraction
        .time_mentions
        .iter()
        .enumerate()
        .filter_map(|(index, mention)| {
            let mut event = mention_event(extraction, mention)?;
            event.location = extraction.locations.get(index).cloned();
            Some(event)
        })
        .collect()
}

fn relative_offset(sentence_lower: &str) -> Option<Duration> {
    RELATIVE_TIME_PATTERNS.iter().find_map(|(regex, unit)| {
        let amount = regex
            .captures(sentence_lower)?
            .get(1)?
            .as_str()
            .parse::<i64>()
            .ok()?;
        match unit {
            TimeUnit::Hours => Duration::try_hours(amount),
            TimeUnit::Minutes => Duration::try_minutes(amount),
        }
    })
}

fn relative_time_event(extraction: &Extraction<'_>) -> Option<Event> {
    let offset = relative_offset(extraction.sentence_lower)?;
    let start = extraction.reference.checked_add_signed(offset)?;
    let end = start.checked_add_signed(Duration::hours(1))?;

    let mut event = Event::between(extraction.activity, start, end);
    event.location = extraction.locations.first().cloned();
    Some(event)
}

fn mention_event(extraction: &Extraction<'_>, mention: &TimeMention) -> Option<Event> {
    let sentence = extraction.sentence_lower;

    // A range looks around each of its sides, a single time around its whole match
    let start_span = match mention.kind {
        MentionType::Single => mention.span(),
        MentionType::Range => mention.time_span.clone(),
    };
    let start_context = detect_time_period(sentence, start_span);
    let Some(start) = parse_time_string(&mention.time, 0, start_context) else {
        warn!(
            "Dropping mention '{}': unparsable start time",
            mention.full_match
        );
        return None;
    };

    let end = match (mention.kind, &mention.end_time, &mention.end_time_span) {
        (MentionType::Range, Some(end_time), Some(end_span)) => {
            let end_context = detect_time_period(sentence, end_span.clone());
            match parse_time_string(end_time, 0, end_context) {
                Some(end) => end,
                None => {
                    warn!(
                        "Dropping mention '{}': unparsable end time",
                        mention.full_match
                    );
                    return None;
                }
            }
        }
        _ => ((start.0 + 1) % 24, start.1),
    };

    debug!(
        "Mention '{}' -> {:?} to {:?}",
        mention.full_match, start, end
    );
    Some(Event::on_day(
        extraction.activity,
        extraction.date_info.date,
        start,
        end,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::date_resolver::resolve_date;
    use crate::parser::time_scanner::extract_all_time_mentions;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap()
    }

    fn materialize(sentence: &str, activity: &str, locations: &[String]) -> Vec<Event> {
        let date_info = resolve_date(sentence, reference());
        let mentions = extract_all_time_mentions(sentence);
        materialize_events(&Extraction {
            sentence_lower: sentence,
            reference: reference(),
            date_info: &date_info,
            activity,
            locations,
            time_mentions: &mentions,
        })
    }

    fn times(event: &Event) -> ((u32, u32), (u32, u32)) {
        ((event.start_hour, event.start_minute), (event.end_hour, event.end_minute))
    }

    #[test]
    fn test_relative_hours() {
        let events = materialize("in 2 hours call mom", "call mom", &[]);
        assert_eq!(events.len(), 1);
        assert_eq!(times(&events[0]), ((12, 15), (13, 15)));
        assert_eq!(events[0].start_date, reference().date());
    }

    #[test]
    fn test_relative_minutes_short_circuit_mentions() {
        let places = vec!["office".to_string()];
        let events = materialize("in 30 mins stand up at 4pm", "stand up", &places);
        assert_eq!(events.len(), 1);
        assert_eq!(times(&events[0]), ((10, 45), (11, 45)));
        assert_eq!(events[0].location.as_deref(), Some("office"));
    }

    #[test]
    fn test_relative_offset_crosses_midnight() {
        let events = materialize("in 14 hours flight", "flight", &[]);
        assert_eq!(
            events[0].start_date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(times(&events[0]), ((0, 15), (1, 15)));
    }

    #[test]
    fn test_default_hours_without_mentions() {
        let places = vec!["gym".to_string(), "park".to_string()];
        let events = materialize("workout at the gym", "workout", &places);
        assert_eq!(events.len(), 1);
        assert_eq!(times(&events[0]), (DEFAULT_START, DEFAULT_END));
        assert_eq!(events[0].location.as_deref(), Some("gym"));
    }

    #[test]
    fn test_range_sides_use_their_own_context() {
        let events = materialize(
            "study from 7 to 11 before heading out tonight",
            "study",
            &[],
        );
        assert_eq!(events.len(), 1);
        assert_eq!(times(&events[0]), ((7, 0), (23, 0)));
    }

    #[test]
    fn test_single_mention_context_covers_whole_match() {
        // The period word sits within reach of `at` but not of the digit
        let events = materialize("evening, then a long walk and at 7", "walk", &[]);
        assert_eq!(times(&events[0]), ((19, 0), (20, 0)));
    }

    #[test]
    fn test_range_with_explicit_end() {
        let events = materialize("lunch from 12 to 1pm", "lunch", &[]);
        assert_eq!(times(&events[0]), ((12, 0), (13, 0)));
    }

    #[test]
    fn test_single_mention_wraps_midnight() {
        let events = materialize("party at 11pm", "party", &[]);
        assert_eq!(times(&events[0]), ((23, 0), (0, 0)));
        assert_eq!(events[0].start_date, events[0].end_date);
    }

    #[test]
    fn test_one_event_per_mention_with_indexed_locations() {
        let places = vec!["gym".to_string()];
        let events = materialize("gym at 7am and dinner at 8pm", "gym dinner", &places);
        assert_eq!(events.len(), 2);
        assert_eq!(times(&events[0]), ((7, 0), (8, 0)));
        assert_eq!(times(&events[1]), ((20, 0), (21, 0)));
        assert_eq!(events[0].location.as_deref(), Some("gym"));
        assert_eq!(events[1].location, None);
    }

    #[test]
    fn test_unparsable_mentions_are_dropped() {
        let events = materialize("meet at 25", "meet", &[]);
        assert!(events.is_empty());
        assert!(materialize("study from 10 to 25", "study", &[]).is_empty());
    }

    #[test]
    fn test_blank_activity_yields_nothing() {
        assert!(materialize("at 3pm", "  ", &[]).is_empty());
    }
}
