//! Calendar date resolution
//!
//! Picks the single date an extracted sentence refers to. The first matching rule wins:
//! relative offsets (`in 3 days`), then an explicit day and month (`24 november`,
//! `november 24`), then `tomorrow`/`today` and weekday names. With no cue at all the
//! reference date is used.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use log::{debug, warn};

use super::vocabulary::{
    month_number, DateUnit, DAY_MONTH, MONTH_DAY, RELATIVE_DATE_PATTERNS, WEEKDAYS,
};

/// Which rule produced the resolved date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    RelativeOffset,
    Explicit,
    Tomorrow,
    Today,
    Weekday,
    Default,
}

/// The date every event from one sentence is stamped with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInfo {
    pub date: NaiveDate,
    pub source: DateSource,
}

impl DateInfo {
    fn new(date: NaiveDate, source: DateSource) -> Self {
        Self { date, source }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// Resolve the event date of a lowercased sentence against `reference`
pub fn resolve_date(sentence_lower: &str, reference: NaiveDateTime) -> DateInfo {
    let today = reference.date();

    let info = relative_date(sentence_lower, today)
        .map(|date| DateInfo::new(date, DateSource::RelativeOffset))
        .or_else(|| {
            explicit_date(sentence_lower, today)
                .map(|date| DateInfo::new(date, DateSource::Explicit))
        })
        .unwrap_or_else(|| keyword_date(sentence_lower, today));

    debug!("Resolved date {} via {:?}", info.date, info.source);
    info
}

fn relative_date(sentence_lower: &str, today: NaiveDate) -> Option<NaiveDate> {
    for (pattern, unit) in RELATIVE_DATE_PATTERNS.iter() {
        let Some(caps) = pattern.captures(sentence_lower) else {
            continue;
        };
        let Ok(amount) = caps[1].parse::<i64>() else {
            continue;
        };

        // Months are approximated as 30 days
        let days = match unit {
            DateUnit::Days => Some(amount),
            DateUnit::Weeks => amount.checked_mul(7),
            DateUnit::Months => amount.checked_mul(30),
        };
        return days
            .and_then(Duration::try_days)
            .and_then(|offset| today.checked_add_signed(offset));
    }
    None
}

fn explicit_date(sentence_lower: &str, today: NaiveDate) -> Option<NaiveDate> {
    let day_first = DAY_MONTH
        .captures(sentence_lower)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()));
    let month_first = MONTH_DAY
        .captures(sentence_lower)
        .map(|caps| (caps[2].to_string(), caps[1].to_string()));

    for (day_str, month_name) in day_first.into_iter().chain(month_first) {
        let (Ok(day), Some(month)) = (day_str.parse::<u32>(), month_number(&month_name)) else {
            continue;
        };
        if !(1..=31).contains(&day) {
            continue;
        }

        let Some(date) = NaiveDate::from_ymd_opt(today.year(), month, day) else {
            warn!("Ignoring invalid date: {} {}", day, month_name);
            continue;
        };

        if date < today {
            // Already passed this year
            match NaiveDate::from_ymd_opt(today.year() + 1, month, day) {
                Some(next_year) => return Some(next_year),
                None => {
                    warn!(
                        "Ignoring date with no next-year equivalent: {} {}",
                        day, month_name
                    );
                    continue;
                }
            }
        }
        return Some(date);
    }
    None
}

fn keyword_date(sentence_lower: &str, today: NaiveDate) -> DateInfo {
    if sentence_lower.contains("tomorrow") || sentence_lower.contains("tmrw") {
        return DateInfo::new(today + Duration::days(1), DateSource::Tomorrow);
    }
    if sentence_lower.contains("today") {
        return DateInfo::new(today, DateSource::Today);
    }

    for (offset, name) in WEEKDAYS.iter().enumerate() {
        if sentence_lower.contains(name) {
            let current = today.weekday().num_days_from_monday() as i64;
            let mut days_ahead = offset as i64 - current;
            if days_ahead <= 0 {
                days_ahead += 7;
            }
            return DateInfo::new(today + Duration::days(days_ahead), DateSource::Weekday);
        }
    }

    DateInfo::new(today, DateSource::Default)
}
